//! Registry key source.
//!
//! Reads `DigitalProductId` blobs and the OA3 firmware key string from
//! `HKEY_LOCAL_MACHINE`. Only Windows has a registry; elsewhere the source
//! yields nothing.

#[cfg(target_os = "windows")]
mod windows;

use crate::config::{get_config, ScanConfig};
use crate::errors::KeyResult;
use crate::source::{Candidate, KeySource};

/// Key holding the OA3 firmware key string.
pub const OA3_PATH: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// String value with the key embedded in firmware (OEM activation 3.0).
pub const OA3_VALUE_NAME: &str = "OA3xOriginalProductKey";

/// Render a path under HKLM for display.
pub fn hklm_location(path: &str) -> String {
    format!(r"HKLM\{}", path.trim_matches('\\'))
}

/// Join a parent key path and a subkey name.
pub fn join_key_path(parent: &str, child: &str) -> String {
    format!(r"{}\{}", parent.trim_end_matches('\\'), child)
}

/// Scans the configured registry paths.
#[derive(Debug, Clone)]
pub struct RegistrySource {
    paths: Vec<String>,
    value_name: String,
    include_oa3: bool,
}

impl RegistrySource {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            paths: config.paths.clone(),
            value_name: config.value_name.clone(),
            include_oa3: config.include_oa3,
        }
    }

    /// Build from the process-wide configuration.
    pub fn from_global_config() -> KeyResult<Self> {
        Ok(Self::new(&get_config()?.scan))
    }
}

impl KeySource for RegistrySource {
    fn name(&self) -> &str {
        "registry"
    }

    fn candidates(&self) -> KeyResult<Vec<Candidate>> {
        #[cfg(target_os = "windows")]
        {
            let mut candidates = Vec::new();
            for path in &self.paths {
                candidates.extend(windows::scan_path(path, &self.value_name));
            }
            if self.include_oa3 {
                candidates.extend(windows::read_oa3_key());
            }
            Ok(candidates)
        }
        #[cfg(not(target_os = "windows"))]
        {
            log::debug!(
                "registry not available on this platform, skipping {} of {} paths (oa3: {})",
                self.value_name,
                self.paths.len(),
                self.include_oa3
            );
            Ok(Vec::new())
        }
    }
}
