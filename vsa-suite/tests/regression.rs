use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

use vsa_compare::{FailureKind, ValidationError};
use vsa_core::{Section, store};
use vsa_suite::{CaseFailure, CaseKind, RegressionSuite, SuiteConfig};

#[fixture]
fn path_to_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests/data")
}

fn load_config(path: &Path, output: &TempDir) -> SuiteConfig {
    let mut config = SuiteConfig::try_from(path).unwrap();
    config.output_dir = output.path().join("output");
    config
}

#[rstest]
#[case("regression.toml")]
#[case("regression.yaml")]
fn test_bundled_suite_passes(path_to_data: PathBuf, #[case] file: &str) {
    let output = tempfile::tempdir().unwrap();
    let config = load_config(&path_to_data.join(file), &output);

    let report = RegressionSuite::new(config).unwrap().run().unwrap();

    // two datasets plus one negative control, six sections each
    assert_eq!(report.cases.len(), 3 * Section::ALL.len());
    assert!(report.is_success(), "{}", report);
}

#[rstest]
fn test_artifact_is_final_snapshot(path_to_data: PathBuf) {
    let output = tempfile::tempdir().unwrap();
    let config = load_config(&path_to_data.join("regression.toml"), &output);
    let suite = RegressionSuite::new(config).unwrap();
    suite.run().unwrap();

    let observed = store::load(output.path().join("output/platinum-exome.json")).unwrap();
    let expected = store::load(path_to_data.join("platinum-exome.json")).unwrap();

    assert_eq!(observed.root(), expected.root());
}

#[rstest]
fn test_defective_document_fails_exactly_its_sections(path_to_data: PathBuf) {
    let output = tempfile::tempdir().unwrap();
    let mut config = load_config(&path_to_data.join("regression.toml"), &output);
    config.datasets.truncate(1);
    config.datasets[0].negative_control = None;
    // the defective document becomes the golden one
    config.reference_dir = output.path().join("reference");
    std::fs::create_dir_all(&config.reference_dir).unwrap();
    std::fs::copy(
        path_to_data.join("bad-results.json"),
        config.reference_dir.join("platinum-exome.json"),
    )
    .unwrap();

    let report = RegressionSuite::new(config).unwrap().run().unwrap();
    let failed: Vec<Section> = report.failures().map(|c| c.section).collect();

    assert_eq!(
        failed,
        vec![
            Section::AlleleFrequency,
            Section::MutationSpectrum,
            Section::QualityDistribution
        ]
    );

    let mut_spec = report
        .cases_for("platinum-exome")
        .find(|c| c.section == Section::MutationSpectrum)
        .unwrap();
    match &mut_spec.failure {
        Some(CaseFailure::Validation { error }) => {
            assert_eq!(error.kind(), FailureKind::ValueMismatch);
            assert_eq!(error.key(), "C[1]");
        }
        other => panic!("unexpected failure: {:?}", other),
    }

    let qual_dist = report
        .cases_for("platinum-exome")
        .find(|c| c.section == Section::QualityDistribution)
        .unwrap();
    assert!(matches!(
        &qual_dist.failure,
        Some(CaseFailure::Validation { error: ValidationError::MissingKey { key, .. } })
            if key == "regularBins.3"
    ));
}

#[rstest]
fn test_misdeclared_negative_control_fails(path_to_data: PathBuf) {
    let output = tempfile::tempdir().unwrap();
    let mut config = load_config(&path_to_data.join("regression.toml"), &output);
    if let Some(control) = config.datasets[0].negative_control.as_mut() {
        control.defective_sections = vec![Section::AlleleFrequency, Section::VariantType];
    }

    let report = RegressionSuite::new(config).unwrap().run().unwrap();
    let failures: Vec<(Section, CaseKind)> =
        report.failures().map(|c| (c.section, c.kind)).collect();

    assert_eq!(
        failures,
        vec![
            (Section::MutationSpectrum, CaseKind::NegativeControl),
            (Section::VariantType, CaseKind::NegativeControl),
            (Section::QualityDistribution, CaseKind::NegativeControl),
        ]
    );
}

#[rstest]
fn test_broken_dataset_does_not_hide_siblings(path_to_data: PathBuf) {
    let output = tempfile::tempdir().unwrap();
    let mut config = load_config(&path_to_data.join("regression.toml"), &output);
    config.datasets[0].input = path_to_data.join("no-such-input.snapshots");

    let report = RegressionSuite::new(config).unwrap().run().unwrap();

    assert!(
        report
            .cases_for("platinum-exome")
            .filter(|c| c.kind == CaseKind::Regression)
            .all(|c| matches!(c.failure, Some(CaseFailure::Regeneration { .. })))
    );
    assert!(report.cases_for("trio-logaf").all(|c| c.passed()));
}

#[rstest]
fn test_single_mut_spec_bump_fails_only_that_case(path_to_data: PathBuf) {
    let output = tempfile::tempdir().unwrap();
    let mut config = load_config(&path_to_data.join("regression.toml"), &output);

    let golden = store::load(path_to_data.join("platinum-exome.json")).unwrap();
    let mut bumped = golden.root().clone();
    bumped["mut_spec"]["G"][3] = serde_json::json!(58);
    let stream = output.path().join("bumped.snapshots");
    std::fs::write(&stream, format!("{};\n", bumped)).unwrap();
    config.datasets[0].input = stream;

    let report = RegressionSuite::new(config).unwrap().run().unwrap();
    let failures: Vec<String> = report.failures().map(|c| c.name()).collect();

    assert_eq!(failures, vec!["platinum-exome/mut_spec".to_string()]);
}
