//! # vsa-compare
//!
//! Validates a regenerated vcfstatsalive snapshot against a golden document.
//!
//! ## Main Components
//!
//! - **`keyset`**: exact key-set validation with declared, derived and
//!   data-dependent key policies
//! - **`sections`**: one comparator per statistical section
//! - **`schema`**: the key schemas of each section
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use vsa_compare::compare_indel_size;
//!
//! let expected = json!({"-1": 4, "2": 1});
//! let observed = json!({"-1": 4, "2": 2});
//!
//! let err = compare_indel_size(&expected, &observed).unwrap_err();
//! assert_eq!(err.key(), "2");
//! ```
pub mod error;
pub mod keyset;
pub mod schema;
pub mod sections;

// re-export things
pub use error::*;
pub use keyset::{KeyPolicy, KeySet, regular_bin_keys};
pub use schema::{CompareOptions, VariantTypeSchema};
pub use sections::*;
