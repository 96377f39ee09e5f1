use std::fs;

use mskeys::output::{format_output, write_output, OutputFormat};
use mskeys::ProductKeyRecord;

fn records() -> Vec<ProductKeyRecord> {
    vec![
        ProductKeyRecord {
            location: r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion".to_string(),
            value_name: "DigitalProductId".to_string(),
            key: "FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8".to_string(),
        },
        ProductKeyRecord {
            location: r"HKLM\SOFTWARE\Microsoft\Office\16.0\Registration".to_string(),
            value_name: "DigitalProductId".to_string(),
            key: "P8QRT-VWXY2-3467B-CDFGH-JK9MM".to_string(),
        },
    ]
}

#[test]
fn json_report_lists_records() {
    let out = format_output(&records(), OutputFormat::Json, false).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

    let array = parsed.as_array().unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(array[0]["key"], "FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8");
    assert_eq!(array[1]["location"], r"HKLM\SOFTWARE\Microsoft\Office\16.0\Registration");
    assert_eq!(array[1]["value_name"], "DigitalProductId");
}

#[test]
fn quiet_json_report_lists_keys() {
    let out = format_output(&records(), OutputFormat::Json, true).unwrap();
    let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
    assert_eq!(
        parsed,
        vec!["FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8", "P8QRT-VWXY2-3467B-CDFGH-JK9MM"]
    );
}

#[test]
fn verbose_text_separates_records_with_blank_lines() {
    let out = format_output(&records(), OutputFormat::Text, false).unwrap();
    assert_eq!(out.matches("Key: ").count(), 2);
    assert!(out.contains("Key: FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8\n\nPath: "));
    assert!(out.ends_with("\n\n"));
}

#[test]
fn report_is_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.txt");

    let out = format_output(&records(), OutputFormat::Text, true).unwrap();
    write_output(&path, &out).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8\nP8QRT-VWXY2-3467B-CDFGH-JK9MM\n"
    );
}

#[test]
fn writing_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("keys.txt");
    assert!(write_output(&path, "x").is_err());
}
