//! One comparator per statistical section of a vcfstatsalive snapshot.
//!
//! Every comparator validates its key set first and only then compares
//! values, so a structurally wrong section is always reported as a key
//! mismatch. Comparators are pure and return the first divergence found.

use log::debug;
use serde_json::Value;

use vsa_core::consts::{
    AF_HIST_BINS, LOG_AF_HIST_LOWER_BOUND, LOG_AF_HIST_UPPER_BOUND, QUAL_HIST_LOWER_BOUND,
    QUAL_HIST_UPPER_BOUND, REGULAR_BINS, SPECTRUM_WIDTH, TOTAL_RECORDS, TS_TV_RATIO,
    USING_LOG_SCALE_AF,
};
use vsa_core::utils::numbers_equal;
use vsa_core::{JsonKind, Section, StatsDocument};

use crate::error::{Result, Side, ValidationError};
use crate::keyset::{
    KeyPolicy, MAX_REGULAR_BINS, Scope, regular_bin_count, regular_bin_keys, validate,
};
use crate::schema::{
    AF_HIST_KEYS, AF_HIST_LOG_KEYS, CompareOptions, MUT_SPEC_KEYS, QUAL_DIST_KEYS,
    QUAL_DIST_SCALARS, TOP_LEVEL_KEYS, VariantTypeSchema,
};

///
/// Compare one section of two documents.
///
/// A section absent from either root fails with a missing key named after the
/// section.
///
pub fn compare_section(
    section: Section,
    expected: &StatsDocument,
    observed: &StatsDocument,
    options: &CompareOptions,
) -> Result<()> {
    let e = extract(section, expected, Side::Expected)?;
    let o = extract(section, observed, Side::Observed)?;

    let result = match section {
        Section::TopLevel => compare_top_level(e, o),
        Section::AlleleFrequency => compare_allele_frequency(e, o),
        Section::MutationSpectrum => compare_mutation_spectrum(e, o),
        Section::VariantType => compare_variant_types(e, o, options.variant_types),
        Section::QualityDistribution => compare_quality_distribution(e, o),
        Section::IndelSize => compare_indel_size(e, o),
    };

    debug!(
        "{} vs {} [{}]: {}",
        expected.location().display(),
        observed.location().display(),
        section,
        if result.is_ok() { "ok" } else { "failed" }
    );
    result
}

///
/// Run every section comparator. Sections are independent: a failure in one
/// never hides the outcome of another.
///
pub fn compare_documents(
    expected: &StatsDocument,
    observed: &StatsDocument,
    options: &CompareOptions,
) -> Vec<(Section, Result<()>)> {
    Section::ALL
        .iter()
        .map(|&section| (section, compare_section(section, expected, observed, options)))
        .collect()
}

fn extract(section: Section, document: &StatsDocument, side: Side) -> Result<&Value> {
    document
        .section(section)
        .ok_or_else(|| ValidationError::MissingKey {
            section,
            key: section.name().to_string(),
            side,
        })
}

// ──────────────────────────────────────────────
// Section comparators
// ──────────────────────────────────────────────

/// Root key set plus the two scalars; nested sections have their own comparators.
pub fn compare_top_level(expected: &Value, observed: &Value) -> Result<()> {
    let scope = Scope::new(Section::TopLevel);
    let pair = validate(&scope, &KeyPolicy::Declared(TOP_LEVEL_KEYS), expected, observed)?;

    for key in [TOTAL_RECORDS, TS_TV_RATIO] {
        let (e, o) = pair.values(key);
        check_value(&scope, key, e, o, JsonKind::Float)?;
    }
    Ok(())
}

pub fn compare_allele_frequency(expected: &Value, observed: &Value) -> Result<()> {
    let scope = Scope::new(Section::AlleleFrequency);

    // the log-scale bounds are only written when the golden histogram is log scaled
    let log_scale = expected
        .get(USING_LOG_SCALE_AF)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let keys = if log_scale { AF_HIST_LOG_KEYS } else { AF_HIST_KEYS };
    let pair = validate(&scope, &KeyPolicy::Declared(keys), expected, observed)?;

    let (e, o) = pair.values(USING_LOG_SCALE_AF);
    require_kind(&scope, USING_LOG_SCALE_AF, e, Side::Expected, JsonKind::Boolean)?;
    check_value(&scope, USING_LOG_SCALE_AF, e, o, JsonKind::Boolean)?;

    if log_scale {
        for key in [LOG_AF_HIST_LOWER_BOUND, LOG_AF_HIST_UPPER_BOUND] {
            let (e, o) = pair.values(key);
            check_value(&scope, key, e, o, JsonKind::Float)?;
        }
    }

    // only non-empty buckets are written, so the golden histogram defines the keys
    let (e, o) = pair.values(AF_HIST_BINS);
    compare_counts(&scope.child(AF_HIST_BINS), &KeyPolicy::FromExpected, e, o)
}

pub fn compare_mutation_spectrum(expected: &Value, observed: &Value) -> Result<()> {
    let scope = Scope::new(Section::MutationSpectrum);
    let pair = validate(&scope, &KeyPolicy::Declared(MUT_SPEC_KEYS), expected, observed)?;

    for base in MUT_SPEC_KEYS {
        let (e, o) = pair.values(base);
        let e = spectrum_row(&scope, base, e, Side::Expected)?;
        let o = spectrum_row(&scope, base, o, Side::Observed)?;

        for (i, (e, o)) in e.iter().zip(o).enumerate() {
            check_value(&scope, &format!("{}[{}]", base, i), e, o, JsonKind::Integer)?;
        }
    }
    Ok(())
}

pub fn compare_variant_types(
    expected: &Value,
    observed: &Value,
    schema: VariantTypeSchema,
) -> Result<()> {
    let scope = Scope::new(Section::VariantType);
    compare_counts(&scope, &KeyPolicy::Declared(schema.keys()), expected, observed)
}

pub fn compare_quality_distribution(expected: &Value, observed: &Value) -> Result<()> {
    let scope = Scope::new(Section::QualityDistribution);
    let pair = validate(&scope, &KeyPolicy::Declared(QUAL_DIST_KEYS), expected, observed)?;

    for key in QUAL_DIST_SCALARS {
        let (e, o) = pair.values(key);
        check_value(&scope, key, e, o, JsonKind::Integer)?;
    }

    let lower = expected_bound(&scope, pair.expected.get(QUAL_HIST_LOWER_BOUND), QUAL_HIST_LOWER_BOUND)?;
    let upper = expected_bound(&scope, pair.expected.get(QUAL_HIST_UPPER_BOUND), QUAL_HIST_UPPER_BOUND)?;

    let count = regular_bin_count(lower, upper);
    if count > MAX_REGULAR_BINS {
        return Err(ValidationError::RangeTooLarge {
            section: scope.section,
            key: scope.qualify(REGULAR_BINS),
            bins: count,
            limit: MAX_REGULAR_BINS,
        });
    }
    let bins = KeyPolicy::Derived(regular_bin_keys(lower, upper));

    let (e, o) = pair.values(REGULAR_BINS);
    compare_counts(&scope.child(REGULAR_BINS), &bins, e, o)
}

///
/// Indel sizes have no schema at all: the keys are whatever signed sizes the
/// dataset happens to contain, so the golden document is the ground truth.
///
pub fn compare_indel_size(expected: &Value, observed: &Value) -> Result<()> {
    let scope = Scope::new(Section::IndelSize);
    compare_counts(&scope, &KeyPolicy::FromExpected, expected, observed)
}

// ──────────────────────────────────────────────
// Value policies
// ──────────────────────────────────────────────

/// Key-validate a flat `key -> integer` map and compare every count.
fn compare_counts(scope: &Scope, policy: &KeyPolicy, expected: &Value, observed: &Value) -> Result<()> {
    let pair = validate(scope, policy, expected, observed)?;
    for key in &pair.keys {
        let (e, o) = pair.values(key);
        check_value(scope, key, e, o, JsonKind::Integer)?;
    }
    Ok(())
}

fn spectrum_row<'v>(scope: &Scope, base: &str, value: &'v Value, side: Side) -> Result<&'v [Value]> {
    let row = value.as_array().ok_or_else(|| ValidationError::TypeMismatch {
        section: scope.section,
        key: scope.qualify(base),
        side,
        required: JsonKind::Array,
        found: value.clone(),
    })?;

    if row.len() != SPECTRUM_WIDTH {
        return Err(ValidationError::ArityMismatch {
            section: scope.section,
            key: scope.qualify(base),
            side,
            required: SPECTRUM_WIDTH,
            found: row.len(),
        });
    }
    Ok(row)
}

fn expected_bound(scope: &Scope, value: Option<&Value>, key: &str) -> Result<i64> {
    let value = value.unwrap_or(&Value::Null);
    value.as_i64().ok_or_else(|| ValidationError::TypeMismatch {
        section: scope.section,
        key: scope.qualify(key),
        side: Side::Expected,
        required: JsonKind::Integer,
        found: value.clone(),
    })
}

///
/// `Float` accepts any JSON number; every other kind must match exactly, so a
/// boolean written as `1` or a count written as `1.0` is rejected.
///
fn require_kind(scope: &Scope, key: &str, value: &Value, side: Side, required: JsonKind) -> Result<()> {
    let found = JsonKind::of(value);
    let accepted = match required {
        JsonKind::Float => found.is_number(),
        _ => found == required,
    };

    if accepted {
        Ok(())
    } else {
        Err(ValidationError::TypeMismatch {
            section: scope.section,
            key: scope.qualify(key),
            side,
            required,
            found: value.clone(),
        })
    }
}

/// Type-check the observed value, then require it to equal the expected one.
fn check_value(scope: &Scope, key: &str, expected: &Value, observed: &Value, required: JsonKind) -> Result<()> {
    require_kind(scope, key, observed, Side::Observed, required)?;

    let equal = match required {
        JsonKind::Integer | JsonKind::Float => numbers_equal(expected, observed),
        _ => expected == observed,
    };

    if equal {
        Ok(())
    } else {
        Err(ValidationError::ValueMismatch {
            section: scope.section,
            key: scope.qualify(key),
            expected: expected.clone(),
            observed: observed.clone(),
        })
    }
}
