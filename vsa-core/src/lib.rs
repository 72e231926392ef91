//! # vsa-core
//!
//! Document model shared by the vcfstatsalive regression certifier.
//!
//! A vcfstatsalive snapshot is one JSON object with two numeric scalars and five
//! nested statistical sections. This crate knows the names of those sections, how
//! to load a snapshot from disk into an immutable [`StatsDocument`], and how to
//! classify JSON values for type-fidelity checks. Comparison logic lives in
//! `vsa-compare`; subprocess capture lives in `vsa-capture`.
//!
//! ## Example
//!
//! ```no_run
//! use vsa_core::models::Section;
//! use vsa_core::store;
//!
//! let expected = store::load("data/platinum-exome.json").unwrap();
//! let af_hist = expected.section(Section::AlleleFrequency);
//! assert!(af_hist.is_some());
//! ```
pub mod consts;
pub mod errors;
pub mod models;
pub mod store;
pub mod utils;

// re-exports
pub use errors::LoadError;
pub use models::{Section, StatsDocument};
pub use utils::JsonKind;
