use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use vsa_core::{JsonKind, Section};

/// Which of the two compared documents a failure was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Expected,
    Observed,
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Expected => write!(f, "expected"),
            Side::Observed => write!(f, "observed"),
        }
    }
}

/// Coarse classification used when aggregating and reporting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    KeyMismatch,
    ValueMismatch,
}

///
/// First divergence found by a section comparator. `key` is qualified within
/// the section, e.g. `regularBins.3` or `A[2]`.
///
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{section}: key '{key}' is missing from the {side} document")]
    MissingKey {
        section: Section,
        key: String,
        side: Side,
    },

    #[error("{section}: unexpected key '{key}' in the {side} document")]
    UnexpectedKey {
        section: Section,
        key: String,
        side: Side,
    },

    #[error("{section}: '{key}' has {found} elements in the {side} document, expected {required}")]
    ArityMismatch {
        section: Section,
        key: String,
        side: Side,
        required: usize,
        found: usize,
    },

    #[error("{section}: '{key}' must be {required} in the {side} document, found {found}")]
    TypeMismatch {
        section: Section,
        key: String,
        side: Side,
        required: JsonKind,
        found: Value,
    },

    #[error("{section}: '{key}' expected {expected}, observed {observed}")]
    ValueMismatch {
        section: Section,
        key: String,
        expected: Value,
        observed: Value,
    },

    #[error("{section}: bounds of '{key}' span {bins} bins in the expected document, at most {limit} allowed")]
    RangeTooLarge {
        section: Section,
        key: String,
        bins: u64,
        limit: u64,
    },
}

impl ValidationError {
    pub fn section(&self) -> Section {
        match self {
            ValidationError::MissingKey { section, .. }
            | ValidationError::UnexpectedKey { section, .. }
            | ValidationError::ArityMismatch { section, .. }
            | ValidationError::TypeMismatch { section, .. }
            | ValidationError::ValueMismatch { section, .. }
            | ValidationError::RangeTooLarge { section, .. } => *section,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ValidationError::MissingKey { key, .. }
            | ValidationError::UnexpectedKey { key, .. }
            | ValidationError::ArityMismatch { key, .. }
            | ValidationError::TypeMismatch { key, .. }
            | ValidationError::ValueMismatch { key, .. }
            | ValidationError::RangeTooLarge { key, .. } => key,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationError::MissingKey { .. }
            | ValidationError::UnexpectedKey { .. }
            | ValidationError::ArityMismatch { .. } => FailureKind::KeyMismatch,
            ValidationError::TypeMismatch { .. }
            | ValidationError::ValueMismatch { .. }
            | ValidationError::RangeTooLarge { .. } => FailureKind::ValueMismatch,
        }
    }

    /// Key-set and arity divergences; never reached value comparison.
    pub fn is_structural(&self) -> bool {
        self.kind() == FailureKind::KeyMismatch
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
