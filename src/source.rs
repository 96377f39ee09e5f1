//! Key sources and record collection.
//!
//! A [`KeySource`] supplies candidates: raw blobs that go through the
//! locator, and plain strings that already are keys. [`collect_records`]
//! turns candidates from several sources into [`ProductKeyRecord`]s.

use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::DEFAULT_VALUE_NAME;
use crate::errors::{KeyError, KeyResult};
use crate::locator::locate_key;

/// One value offered by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A binary blob that may contain an encoded segment.
    Encoded {
        location: String,
        value_name: String,
        data: Vec<u8>,
    },
    /// A key stored as text, passed through as-is.
    Plain {
        location: String,
        value_name: String,
        key: String,
    },
}

/// A key found by a scan, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductKeyRecord {
    pub location: String,
    pub value_name: String,
    pub key: String,
}

/// Supplier of candidate blobs and strings.
pub trait KeySource {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Produce this source's candidates in a stable order.
    fn candidates(&self) -> KeyResult<Vec<Candidate>>;
}

/// Resolve a single candidate into a record, if it holds a key.
pub fn resolve_candidate(candidate: Candidate) -> Option<ProductKeyRecord> {
    match candidate {
        Candidate::Encoded {
            location,
            value_name,
            data,
        } => {
            let Some(key) = locate_key(&data) else {
                debug!("no decodable key in {} ({} bytes) at {}", value_name, data.len(), location);
                return None;
            };
            Some(ProductKeyRecord {
                location,
                value_name,
                key: key.into_string(),
            })
        }
        Candidate::Plain {
            location,
            value_name,
            key,
        } => {
            if key.trim().is_empty() {
                return None;
            }
            Some(ProductKeyRecord {
                location,
                value_name,
                key,
            })
        }
    }
}

/// Collect records from every source, in order.
///
/// A source that fails is logged and skipped; the others still contribute.
pub fn collect_records(sources: &[&dyn KeySource]) -> Vec<ProductKeyRecord> {
    let mut records = Vec::new();

    for source in sources {
        let candidates = match source.candidates() {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("skipping source {}: {}", source.name(), e);
                continue;
            }
        };

        debug!("source {} offered {} candidates", source.name(), candidates.len());
        records.extend(candidates.into_iter().filter_map(resolve_candidate));
    }

    info!("found {} product keys", records.len());
    records
}

/// Collect records from every source, stopping at the first failing one.
pub fn try_collect_records(sources: &[&dyn KeySource]) -> KeyResult<Vec<ProductKeyRecord>> {
    let mut records = Vec::new();

    for source in sources {
        let candidates = source.candidates()?;
        debug!("source {} offered {} candidates", source.name(), candidates.len());
        records.extend(candidates.into_iter().filter_map(resolve_candidate));
    }

    info!("found {} product keys", records.len());
    Ok(records)
}

/// Candidates held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    candidates: Vec<Candidate>,
}

impl MemorySource {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }
}

impl KeySource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn candidates(&self) -> KeyResult<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}

/// Raw `DigitalProductId` blobs saved to files.
#[derive(Debug, Clone)]
pub struct BlobFileSource {
    paths: Vec<PathBuf>,
}

impl BlobFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl KeySource for BlobFileSource {
    fn name(&self) -> &str {
        "blob-file"
    }

    fn candidates(&self) -> KeyResult<Vec<Candidate>> {
        self.paths
            .iter()
            .map(|path| {
                let data = fs::read(path).map_err(|e| KeyError::SourceError {
                    source_name: self.name().to_string(),
                    message: format!("cannot read {}: {e}", path.display()),
                })?;
                Ok(Candidate::Encoded {
                    location: path.display().to_string(),
                    value_name: DEFAULT_VALUE_NAME.to_string(),
                    data,
                })
            })
            .collect()
    }
}

/// Hex-encoded blobs, e.g. copied out of a `.reg` export.
#[derive(Debug, Clone)]
pub struct HexSource {
    blobs: Vec<String>,
}

impl HexSource {
    pub fn new(blobs: Vec<String>) -> Self {
        Self { blobs }
    }
}

/// Decode hex, ignoring whitespace, commas and line continuations.
pub fn parse_hex_blob(input: &str) -> KeyResult<Vec<u8>> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '\\')
        .collect();
    hex::decode(&digits).map_err(|e| KeyError::InvalidHex(e.to_string()))
}

impl KeySource for HexSource {
    fn name(&self) -> &str {
        "hex"
    }

    fn candidates(&self) -> KeyResult<Vec<Candidate>> {
        self.blobs
            .iter()
            .enumerate()
            .map(|(idx, blob)| {
                Ok(Candidate::Encoded {
                    location: format!("hex argument #{}", idx + 1),
                    value_name: DEFAULT_VALUE_NAME.to_string(),
                    data: parse_hex_blob(blob)?,
                })
            })
            .collect()
    }
}
