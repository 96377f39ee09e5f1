//! Product key representation and format checks.
//!
//! A product key is 25 characters over a 24-symbol alphabet, shown as five
//! groups of five joined by hyphens: `XXXXX-XXXXX-XXXXX-XXXXX-XXXXX`.
//!
//! # Features
//!
//! - Fixed alphabet `BCDFGHJKMPQRTVWXY2346789` (no vowels, no 0/1, no S, Z, L, N)
//! - Format validation of the grouped display form
//! - Parsing of grouped or ungrouped keys
//! - Encoding a key back into its 15-byte segment
//!
//! # Example
//!
//! ```rust
//! use mskeys::product_key::{encode_product_key, validate_product_key_format};
//! use mskeys::decoder::decode_segment;
//!
//! let segment = encode_product_key("FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8").unwrap();
//! let key = decode_segment(&segment).unwrap();
//! assert!(validate_product_key_format(key.as_str()));
//! ```

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Symbols a product key is drawn from, indexed by base-24 digit value.
pub const KEY_CHARS: &[u8; 24] = b"BCDFGHJKMPQRTVWXY2346789";

/// Number of key characters, excluding hyphens.
pub const KEY_CHAR_COUNT: usize = 25;

/// Characters per hyphen-separated group.
pub const GROUP_LEN: usize = 5;

/// Length of the grouped display form (25 characters plus 4 hyphens).
pub const DISPLAY_LEN: usize = KEY_CHAR_COUNT + KEY_CHAR_COUNT / GROUP_LEN - 1;

/// Size of an encoded segment in bytes.
pub const SEGMENT_LEN: usize = 15;

lazy_static! {
    static ref DISPLAY_PATTERN: Regex = Regex::new(
        r"^[BCDFGHJKMPQRTVWXY2346789]{5}(-[BCDFGHJKMPQRTVWXY2346789]{5}){4}$"
    )
    .expect("display pattern is a valid regex");
}

/// A decoded product key in its grouped display form.
///
/// Values are only built by the decoder or by [`parse_product_key`], so the
/// wrapped string always has exactly 25 alphabet characters and 4 hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    pub(crate) fn from_display(display: String) -> Self {
        debug_assert_eq!(display.len(), DISPLAY_LEN);
        Self(display)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The five 5-character groups, most significant first.
    pub fn groups(&self) -> Vec<&str> {
        self.0.split('-').collect()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ProductKey> for String {
    fn from(key: ProductKey) -> Self {
        key.0
    }
}

/// Position of `ch` in [`KEY_CHARS`], i.e. its base-24 digit value.
pub fn digit_of(ch: u8) -> Option<u8> {
    KEY_CHARS.iter().position(|&c| c == ch).map(|idx| idx as u8)
}

/// Validate that a string is a key in grouped display form.
///
/// # Example
///
/// ```rust
/// use mskeys::product_key::validate_product_key_format;
///
/// assert!(validate_product_key_format("BCDFG-HJKMP-QRTVW-XY234-6789B"));
/// assert!(!validate_product_key_format("BCDFGHJKMPQRTVWXY23466789B"));
/// assert!(!validate_product_key_format("ABCDE-HJKMP-QRTVW-XY234-6789B"));
/// ```
pub fn validate_product_key_format(key: &str) -> bool {
    DISPLAY_PATTERN.is_match(key)
}

/// Parse a key typed by a user.
///
/// Accepts the grouped form or the 25 bare characters, in either case.
/// Returns `None` if any character is outside the alphabet or the grouping
/// is wrong.
pub fn parse_product_key(input: &str) -> Option<ProductKey> {
    let upper = input.trim().to_ascii_uppercase();

    let bare: String = if upper.contains('-') {
        if !validate_product_key_format(&upper) {
            return None;
        }
        upper.chars().filter(|&c| c != '-').collect()
    } else {
        upper
    };

    if bare.len() != KEY_CHAR_COUNT || !bare.bytes().all(|b| digit_of(b).is_some()) {
        return None;
    }

    Some(ProductKey::from_display(group(bare.as_bytes())))
}

/// Encode a key back into its 15-byte little-endian segment.
///
/// This is the inverse of [`crate::decoder::decode_segment`]: each character
/// multiplies the running value by 24 and adds its digit.
///
/// The round trip is not total. `BBBBB-BBBBB-BBBBB-BBBBB-BBBBB` encodes to an
/// all-zero segment, which the decoder rejects as holding no key.
pub fn encode_product_key(input: &str) -> Option<[u8; SEGMENT_LEN]> {
    let key = parse_product_key(input)?;
    let mut segment = [0u8; SEGMENT_LEN];

    for ch in key.as_str().bytes().filter(|&b| b != b'-') {
        let mut carry = u16::from(digit_of(ch)?);
        for byte in segment.iter_mut() {
            // 255 * 24 + 23 fits comfortably in a u16
            let value = u16::from(*byte) * 24 + carry;
            *byte = (value & 0xFF) as u8;
            carry = value >> 8;
        }
        if carry != 0 {
            return None;
        }
    }

    Some(segment)
}

/// Join 25 key characters into the grouped display form.
fn group(chars: &[u8]) -> String {
    chars
        .chunks(GROUP_LEN)
        .map(|chunk| chunk.iter().map(|&b| b as char).collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_len_is_twenty_nine() {
        assert_eq!(DISPLAY_LEN, 29);
    }

    #[test]
    fn alphabet_excludes_ambiguous_characters() {
        for ch in b"AEIOU01SZLN" {
            assert!(!KEY_CHARS.contains(ch), "alphabet contains {}", *ch as char);
        }
        assert_eq!(KEY_CHARS.len(), 24);
    }

    #[test]
    fn validate_format_accepts_grouped_key() {
        assert!(validate_product_key_format("FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8"));
    }

    #[test]
    fn validate_format_rejects_wrong_grouping() {
        assert!(!validate_product_key_format("FCKG-WRHQQ2-YXRKT-8TG6W-2B7Q8"));
        assert!(!validate_product_key_format("FCKGW-RHQQ2-YXRKT-8TG6W"));
        assert!(!validate_product_key_format("FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8-"));
    }

    #[test]
    fn validate_format_rejects_lowercase_and_foreign_characters() {
        assert!(!validate_product_key_format("fckgw-rhqq2-yxrkt-8tg6w-2b7q8"));
        // S, E and 1 are outside the alphabet
        assert!(!validate_product_key_format("TEST1-TEST2-TEST3-TEST4-TEST5"));
    }

    #[test]
    fn parse_accepts_bare_and_lowercase() {
        let key = parse_product_key("fckgwrhqq2yxrkt8tg6w2b7q8").unwrap();
        assert_eq!(key.as_str(), "FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8");
        assert_eq!(key.groups(), vec!["FCKGW", "RHQQ2", "YXRKT", "8TG6W", "2B7Q8"]);
    }

    #[test]
    fn parse_rejects_invalid_input() {
        assert!(parse_product_key("").is_none());
        assert!(parse_product_key("FCKGW-RHQQ2").is_none());
        assert!(parse_product_key("FCKGWRHQQ2YXRKT8TG6W2B7Q").is_none());
        assert!(parse_product_key("AAAAA-AAAAA-AAAAA-AAAAA-AAAAA").is_none());
    }

    #[test]
    fn encode_known_key() {
        let segment = encode_product_key("FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8").unwrap();
        assert_eq!(
            segment,
            [70, 64, 75, 204, 249, 69, 236, 192, 225, 128, 184, 241, 213, 200, 0]
        );
    }

    #[test]
    fn encode_all_zero_digits() {
        assert_eq!(
            encode_product_key("BBBBB-BBBBB-BBBBB-BBBBB-BBBBB"),
            Some([0u8; SEGMENT_LEN])
        );
        assert!(crate::decoder::decode_segment(&[0u8; SEGMENT_LEN]).is_none());
    }

    #[test]
    fn encode_largest_key_fits() {
        let segment = encode_product_key("99999-99999-99999-99999-99999").unwrap();
        assert_eq!(
            segment,
            [255, 255, 255, 255, 255, 255, 255, 255, 255, 23, 85, 177, 50, 42, 6]
        );
    }

    #[test]
    fn digit_values_follow_alphabet_order() {
        assert_eq!(digit_of(b'B'), Some(0));
        assert_eq!(digit_of(b'9'), Some(23));
        assert_eq!(digit_of(b'A'), None);
    }
}
