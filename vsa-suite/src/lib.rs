//! # vsa-suite
//!
//! Certification runs for the vcfstatsalive reporter.
//!
//! A run resets the output directory, regenerates one artifact per registered
//! dataset through the reporter, then checks every section of every artifact
//! against the dataset's golden document. Each (dataset, section) pair is an
//! independent case, so one run reports every divergence at once.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use vsa_suite::{RegressionSuite, SuiteConfig};
//!
//! let config = SuiteConfig::from_path(Path::new("vsa-regress.toml")).unwrap();
//! let report = RegressionSuite::new(config).unwrap().run().unwrap();
//! println!("{}", report);
//! ```
pub mod config;
pub mod orchestrator;
pub mod report;

// re-exports
pub use config::{ConfigError, DatasetConfig, NegativeControl, SuiteConfig};
pub use orchestrator::{Regeneration, RegressionSuite, SuiteError, SuiteResult};
pub use report::{CaseFailure, CaseKind, CaseReport, SuiteReport};
