use std::fs;
use std::path::PathBuf;

use mskeys::errors::{KeyError, KeyResult};
use mskeys::locator::CANONICAL_OFFSET;
use mskeys::product_key::encode_product_key;
use mskeys::source::{BlobFileSource, HexSource, MemorySource};
use mskeys::{collect_records, try_collect_records, Candidate, KeySource};

const KEY: &str = "FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8";

fn digital_product_id(key: &str) -> Vec<u8> {
    let mut blob = vec![0u8; 164];
    blob[0] = 0xA4;
    let segment = encode_product_key(key).unwrap();
    blob[CANONICAL_OFFSET..CANONICAL_OFFSET + 15].copy_from_slice(&segment);
    blob
}

struct FailingSource;

impl KeySource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn candidates(&self) -> KeyResult<Vec<Candidate>> {
        Err(KeyError::SourceError {
            source_name: "failing".to_string(),
            message: "access denied".to_string(),
        })
    }
}

#[test]
fn records_keep_source_and_candidate_order() {
    let memory = MemorySource::new(vec![
        Candidate::Encoded {
            location: r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion".to_string(),
            value_name: "DigitalProductId".to_string(),
            data: digital_product_id(KEY),
        },
        Candidate::Encoded {
            location: r"HKLM\SOFTWARE\Microsoft\Office\16.0\Registration".to_string(),
            value_name: "digitalproductid".to_string(),
            data: vec![0u8; 164],
        },
        Candidate::Plain {
            location: r"HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion".to_string(),
            value_name: "OA3xOriginalProductKey".to_string(),
            key: "NKJFK-GPHP7-G8C3J-P6JXR-HQRJR".to_string(),
        },
    ]);

    let records = collect_records(&[&memory]);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].key, KEY);
    assert_eq!(records[0].value_name, "DigitalProductId");
    assert_eq!(records[1].key, "NKJFK-GPHP7-G8C3J-P6JXR-HQRJR");
    assert_eq!(records[1].value_name, "OA3xOriginalProductKey");
}

#[test]
fn failing_source_is_skipped() {
    let mut memory = MemorySource::default();
    memory.push(Candidate::Encoded {
        location: "memory".to_string(),
        value_name: "DigitalProductId".to_string(),
        data: digital_product_id(KEY),
    });

    let records = collect_records(&[&FailingSource, &memory]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, KEY);
}

#[test]
fn strict_collection_reports_failing_source() {
    let memory = MemorySource::default();
    let result = try_collect_records(&[&memory, &FailingSource]);
    assert!(matches!(result, Err(KeyError::SourceError { .. })));
}

#[test]
fn blob_files_are_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DigitalProductId.bin");
    fs::write(&path, digital_product_id(KEY)).unwrap();

    let source = BlobFileSource::new(vec![path.clone()]);
    let records = try_collect_records(&[&source]).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location, path.display().to_string());
    assert_eq!(records[0].key, KEY);
}

#[test]
fn missing_blob_file_is_an_error() {
    let source = BlobFileSource::new(vec![PathBuf::from("does/not/exist.bin")]);
    match source.candidates() {
        Err(KeyError::SourceError { source_name, message }) => {
            assert_eq!(source_name, "blob-file");
            assert!(message.contains("exist.bin"));
        }
        other => panic!("expected SourceError, got {:?}", other),
    }
}

#[test]
fn hex_blobs_are_decoded() {
    let hex: String = digital_product_id(KEY)
        .iter()
        .map(|b| format!("{b:02x},"))
        .collect();

    let source = HexSource::new(vec![hex]);
    let records = try_collect_records(&[&source]).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location, "hex argument #1");
    assert_eq!(records[0].key, KEY);
}

#[test]
fn invalid_hex_is_an_error() {
    let source = HexSource::new(vec!["not hex".to_string()]);
    assert!(matches!(source.candidates(), Err(KeyError::InvalidHex(_))));
}
