//! # vsa-capture
//!
//! Runs the vcfstatsalive reporter as a black-box subprocess and isolates the one
//! authoritative snapshot from its unbounded, line-oriented output.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use vsa_capture::{ExitPolicy, Reporter};
//!
//! let reporter = Reporter::new("../vcfstatsalive")
//!     .with_timeout(Some(Duration::from_secs(120)))
//!     .with_exit_policy(ExitPolicy::RequireSuccess);
//!
//! let snapshot = reporter
//!     .capture_to(
//!         Path::new("data/platinum-exome.vcf.gz"),
//!         Path::new("output/platinum-exome.json"),
//!     )
//!     .unwrap();
//! assert!(!snapshot.ends_with(';'));
//! ```
pub mod capture;
pub mod error;

pub use capture::*;
pub use error::*;
