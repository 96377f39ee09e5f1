//! Key locator: finds the encoded segment inside a `DigitalProductId` blob.
//!
//! The legacy layout keeps the segment at byte 52. When that window does not
//! decode, every window from byte 40 up to the last full window is tried in
//! ascending order and the first one that decodes wins. Several windows can
//! decode by coincidence; the lowest offset is taken as the answer.

use log::debug;

use crate::decoder::decode_segment;
use crate::product_key::{ProductKey, SEGMENT_LEN};

/// Offset of the segment in the legacy blob layout.
pub const CANONICAL_OFFSET: usize = 52;

/// First offset tried by the fallback scan.
pub const SCAN_START: usize = 40;

/// Smallest buffer that contains the canonical window.
pub const MIN_BUFFER_LEN: usize = CANONICAL_OFFSET + SEGMENT_LEN;

/// How a key was found in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The segment sat at [`CANONICAL_OFFSET`].
    Canonical,
    /// The segment was found by the fallback scan at this offset.
    Scanned(usize),
}

impl Placement {
    pub fn offset(&self) -> usize {
        match self {
            Placement::Canonical => CANONICAL_OFFSET,
            Placement::Scanned(offset) => *offset,
        }
    }
}

/// Locate and decode the product key in `buffer`.
///
/// Returns `None` if the buffer is shorter than [`MIN_BUFFER_LEN`] or no
/// window decodes. That is the normal result on digitally-licensed systems.
///
/// # Example
///
/// ```rust
/// use mskeys::locator::{locate_key, CANONICAL_OFFSET};
/// use mskeys::product_key::encode_product_key;
///
/// let mut blob = vec![0u8; 164];
/// let segment = encode_product_key("FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8").unwrap();
/// blob[CANONICAL_OFFSET..CANONICAL_OFFSET + 15].copy_from_slice(&segment);
///
/// let key = locate_key(&blob).unwrap();
/// assert_eq!(key.as_str(), "FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8");
/// assert!(locate_key(&[0u8; 200]).is_none());
/// ```
pub fn locate_key(buffer: &[u8]) -> Option<ProductKey> {
    locate_key_with_placement(buffer).map(|(key, _)| key)
}

/// Like [`locate_key`], also reporting where the segment was found.
pub fn locate_key_with_placement(buffer: &[u8]) -> Option<(ProductKey, Placement)> {
    if buffer.len() < MIN_BUFFER_LEN {
        debug!(
            "buffer of {} bytes is shorter than {} bytes, skipping",
            buffer.len(),
            MIN_BUFFER_LEN
        );
        return None;
    }

    let canonical = &buffer[CANONICAL_OFFSET..CANONICAL_OFFSET + SEGMENT_LEN];
    if let Some(key) = decode_segment(canonical) {
        return Some((key, Placement::Canonical));
    }

    debug!(
        "no key at offset {}, scanning offsets {}..={}",
        CANONICAL_OFFSET,
        SCAN_START,
        buffer.len() - SEGMENT_LEN
    );

    buffer
        .windows(SEGMENT_LEN)
        .enumerate()
        .skip(SCAN_START)
        .find_map(|(offset, window)| {
            decode_segment(window).map(|key| {
                debug!("found key at offset {}", offset);
                (key, Placement::Scanned(offset))
            })
        })
}
