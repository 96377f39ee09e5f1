//! mskeys - recover Windows and Office product keys
//!
//! The core turns a `DigitalProductId` blob into the 25-character product key
//! it encodes:
//!
//! - [`decoder`] converts one 15-byte segment to a key by base-24 long division
//! - [`locator`] finds the segment inside a blob (byte 52, then a scan from 40)
//!
//! Around it sit the sources that supply blobs ([`source`], [`registry`]),
//! report rendering ([`output`]) and configuration ([`config`]).
//!
//! # Features
//!
//! - `cli` - The `mskeys` command-line tool. Enabled by default.
//!
//! # Example
//!
//! ```rust
//! use mskeys::{locate_key, product_key::encode_product_key};
//!
//! let mut blob = vec![0u8; 164];
//! let segment = encode_product_key("FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8").unwrap();
//! blob[52..67].copy_from_slice(&segment);
//!
//! assert_eq!(locate_key(&blob).unwrap().as_str(), "FCKGW-RHQQ2-YXRKT-8TG6W-2B7Q8");
//! ```

// Decoding core
pub mod decoder;
pub mod locator;
pub mod product_key;

// Collaborator layer
pub mod config;
pub mod errors;
pub mod output;
pub mod registry;
pub mod source;

pub use decoder::decode_segment;
pub use locator::locate_key;
pub use product_key::ProductKey;
pub use source::{collect_records, try_collect_records, Candidate, KeySource, ProductKeyRecord};
