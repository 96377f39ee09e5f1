use std::io;

use log::debug;
use winreg::enums::{RegType, HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_32KEY, KEY_WOW64_64KEY};
use winreg::RegKey;

use super::{hklm_location, join_key_path, OA3_PATH, OA3_VALUE_NAME};
use crate::source::Candidate;

/// Open `path` under HKLM, trying the default view, then the 64-bit and
/// 32-bit views. The last failure is returned.
fn open_key(path: &str) -> io::Result<RegKey> {
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    hklm.open_subkey_with_flags(path, KEY_READ)
        .or_else(|_| hklm.open_subkey_with_flags(path, KEY_READ | KEY_WOW64_64KEY))
        .or_else(|_| hklm.open_subkey_with_flags(path, KEY_READ | KEY_WOW64_32KEY))
}

/// Collect encoded candidates from `path` and its direct subkeys.
pub fn scan_path(path: &str, value_name: &str) -> Vec<Candidate> {
    let key = match open_key(path) {
        Ok(key) => key,
        Err(e) => {
            debug!("cannot open HKLM\\{}: {}", path, e);
            return Vec::new();
        }
    };

    let mut candidates = scan_key(&key, path, value_name);

    for subkey in key.enum_keys().filter_map(Result::ok) {
        let full_path = join_key_path(path, &subkey);
        match open_key(&full_path) {
            Ok(child) => candidates.extend(scan_key(&child, &full_path, value_name)),
            Err(e) => debug!("cannot open HKLM\\{}: {}", full_path, e),
        }
    }

    candidates
}

/// Binary values of `key` whose name matches `value_name` in any case.
fn scan_key(key: &RegKey, path: &str, value_name: &str) -> Vec<Candidate> {
    key.enum_values()
        .filter_map(Result::ok)
        .filter(|(name, _)| name.eq_ignore_ascii_case(value_name))
        .filter_map(|(name, value)| {
            if !matches!(value.vtype, RegType::REG_BINARY) || value.bytes.is_empty() {
                debug!("ignoring non-binary or empty {} at HKLM\\{}", name, path);
                return None;
            }
            Some(Candidate::Encoded {
                location: hklm_location(path),
                value_name: name,
                data: value.bytes.to_vec(),
            })
        })
        .collect()
}

/// The OA3 firmware key, if the machine has one.
pub fn read_oa3_key() -> Option<Candidate> {
    let key = open_key(OA3_PATH).ok()?;
    let value: String = key.get_value(OA3_VALUE_NAME).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    Some(Candidate::Plain {
        location: hklm_location(OA3_PATH),
        value_name: OA3_VALUE_NAME.to_string(),
        key: value,
    })
}
