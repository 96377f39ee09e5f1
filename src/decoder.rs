//! Segment decoder: 15 bytes to a 25-character product key.
//!
//! The segment is a 120-bit unsigned integer stored least-significant byte
//! first. It is converted to base 24 by repeated long division over the byte
//! array, so no 128-bit arithmetic is needed.

use crate::product_key::{
    ProductKey, DISPLAY_LEN, GROUP_LEN, KEY_CHARS, KEY_CHAR_COUNT, SEGMENT_LEN,
};

/// Divide the multi-precision value in `work` by 24 in place.
///
/// Walks from the most significant byte (index 14) down to index 0 and
/// returns the final remainder, which is the next base-24 digit.
fn divide_by_base(work: &mut [u8; SEGMENT_LEN]) -> u8 {
    // acc < 24 * 256, so a u16 never overflows here
    let mut acc: u16 = 0;
    for byte in work.iter_mut().rev() {
        acc = (acc << 8) | u16::from(*byte);
        *byte = (acc / 24) as u8;
        acc %= 24;
    }
    acc as u8
}

/// Decode a 15-byte segment into a grouped product key.
///
/// Returns `None` when:
/// - `segment` is not exactly 15 bytes long
/// - the segment is all zeros (there is no key to show)
/// - the value needs more than 25 base-24 digits, so the full rendering
///   would be longer than the 29-character display form
///
/// The caller's bytes are never modified; the division runs on a private copy.
/// There is no checksum, so arbitrary bytes inside the valid range still
/// decode to a well-formed but meaningless key.
///
/// # Example
///
/// ```rust
/// use mskeys::decoder::decode_segment;
///
/// let segment = [1u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
/// let key = decode_segment(&segment).unwrap();
/// assert_eq!(key.as_str(), "BBBBB-BBBBB-BBBBB-BBBBB-BBBBC");
///
/// assert!(decode_segment(&[1u8; 14]).is_none());
/// ```
pub fn decode_segment(segment: &[u8]) -> Option<ProductKey> {
    let mut work: [u8; SEGMENT_LEN] = segment.try_into().ok()?;
    if work.iter().all(|&b| b == 0) {
        return None;
    }

    let mut out = [0u8; DISPLAY_LEN];
    let mut pos = DISPLAY_LEN;

    // Digits come out least significant first, so the buffer fills from the end.
    for remaining in (0..KEY_CHAR_COUNT).rev() {
        let digit = divide_by_base(&mut work);
        pos -= 1;
        out[pos] = KEY_CHARS[usize::from(digit)];

        if remaining % GROUP_LEN == 0 && remaining != 0 {
            pos -= 1;
            out[pos] = b'-';
        }
    }

    if pos != 0 {
        return None;
    }

    // Anything left over would need a 26th digit.
    if work.iter().any(|&b| b != 0) {
        return None;
    }

    let display: String = out.iter().map(|&b| b as char).collect();
    Some(ProductKey::from_display(display))
}
