//! Exact key-set validation, the precondition of every section comparator.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use vsa_core::{JsonKind, Section};

use crate::error::{Result, Side, ValidationError};

pub type KeySet = BTreeSet<String>;

///
/// Where the valid keys of an object come from.
///
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPolicy<'a> {
    /// A static schema.
    Declared(&'a [&'a str]),
    /// Computed from other fields, see [`regular_bin_keys`].
    Derived(KeySet),
    /// The expected document's own keys are the ground truth. Only for
    /// sections with no schema at all (indel sizes, sparse histograms); a
    /// key the reporter stops emitting still fails, because it is present
    /// in expected and absent from observed.
    FromExpected,
}

impl KeyPolicy<'_> {
    pub fn resolve(&self, expected: &Map<String, Value>) -> KeySet {
        match self {
            KeyPolicy::Declared(keys) => keys.iter().map(|k| k.to_string()).collect(),
            KeyPolicy::Derived(keys) => keys.clone(),
            KeyPolicy::FromExpected => expected.keys().cloned().collect(),
        }
    }
}

///
/// Location of an object inside a section, used to qualify failing keys.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub section: Section,
    path: String,
}

impl Scope {
    pub fn new(section: Section) -> Self {
        Scope {
            section,
            path: String::new(),
        }
    }

    pub fn child(&self, key: &str) -> Self {
        Scope {
            section: self.section,
            path: self.qualify(key),
        }
    }

    pub fn qualify(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Name of the object itself in failure messages.
    pub fn name(&self) -> String {
        if self.path.is_empty() {
            self.section.name().to_string()
        } else {
            self.path.clone()
        }
    }
}

///
/// Both objects of a validated pair plus the effective key set they share.
///
#[derive(Debug)]
pub struct CheckedPair<'v> {
    pub keys: KeySet,
    pub expected: &'v Map<String, Value>,
    pub observed: &'v Map<String, Value>,
}

impl<'v> CheckedPair<'v> {
    /// Expected and observed values of a key from `self.keys`.
    pub fn values(&self, key: &str) -> (&'v Value, &'v Value) {
        (&self.expected[key], &self.observed[key])
    }
}

///
/// Require `expected` and `observed` to be objects holding exactly the key
/// set produced by `policy`.
///
/// Declared keys are checked against expected, then observed; keys outside
/// the effective set are reported last. Passing implies
/// `|expected| == |observed| == |keys|`.
///
pub fn validate<'v>(
    scope: &Scope,
    policy: &KeyPolicy,
    expected: &'v Value,
    observed: &'v Value,
) -> Result<CheckedPair<'v>> {
    let expected = as_object(scope, expected, Side::Expected)?;
    let observed = as_object(scope, observed, Side::Observed)?;
    let keys = policy.resolve(expected);

    for (side, map) in [(Side::Expected, expected), (Side::Observed, observed)] {
        if let Some(key) = keys.iter().find(|k| !map.contains_key(k.as_str())) {
            return Err(ValidationError::MissingKey {
                section: scope.section,
                key: scope.qualify(key),
                side,
            });
        }
    }

    for (side, map) in [(Side::Expected, expected), (Side::Observed, observed)] {
        if let Some(key) = map.keys().find(|k| !keys.contains(k.as_str())) {
            return Err(ValidationError::UnexpectedKey {
                section: scope.section,
                key: scope.qualify(key),
                side,
            });
        }
    }

    Ok(CheckedPair {
        keys,
        expected,
        observed,
    })
}

fn as_object<'v>(scope: &Scope, value: &'v Value, side: Side) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| ValidationError::TypeMismatch {
        section: scope.section,
        key: scope.name(),
        side,
        required: JsonKind::Object,
        found: value.clone(),
    })
}

/// Largest `regularBins` key set a quality histogram may declare.
pub const MAX_REGULAR_BINS: u64 = 100_000;

///
/// Number of keys [`regular_bin_keys`] yields for the given bounds, saturating
/// at `u64::MAX`.
///
pub fn regular_bin_count(lower: i64, upper: i64) -> u64 {
    let span = i128::from(upper) - i128::from(lower) + 2;
    u64::try_from(span.max(0)).unwrap_or(u64::MAX)
}

///
/// Valid `regularBins` keys of a quality histogram with the given bounds: every
/// offset from `lower - 1` through `upper` inclusive, as decimal strings. That is
/// `upper - lower + 2` keys; an inverted range yields an empty set. Callers
/// check [`regular_bin_count`] against [`MAX_REGULAR_BINS`] first.
///
pub fn regular_bin_keys(lower: i64, upper: i64) -> KeySet {
    (lower.saturating_sub(1)..=upper)
        .map(|i| i.to_string())
        .collect()
}
