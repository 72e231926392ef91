use std::fs::{create_dir_all, remove_dir_all};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;
use thiserror::Error;

use vsa_capture::CaptureError;
use vsa_compare::compare_documents;
use vsa_core::{LoadError, Section, StatsDocument, store};

use crate::config::{ConfigError, DatasetConfig, NegativeControl, SuiteConfig};
use crate::report::{CaseFailure, CaseKind, CaseReport, SuiteReport};

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Can't reset output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type SuiteResult<T> = std::result::Result<T, SuiteError>;

///
/// Result of running the reporter for one dataset.
///
#[derive(Debug)]
pub struct Regeneration {
    pub dataset: String,
    pub artifact: PathBuf,
    pub error: Option<CaptureError>,
}

impl Regeneration {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

///
/// Drives a whole certification run: reset the output directory, regenerate
/// every artifact, then compare every section of every dataset against its
/// golden document.
///
pub struct RegressionSuite {
    config: SuiteConfig,
}

impl RegressionSuite {
    pub fn new(config: SuiteConfig) -> SuiteResult<Self> {
        config.validate()?;
        Ok(RegressionSuite { config })
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn run(&self) -> SuiteResult<SuiteReport> {
        self.reset_output_dir()?;
        let regenerated = self.regenerate_with(|_| {});
        Ok(self.evaluate(&regenerated))
    }

    ///
    /// Remove every artifact of previous runs and recreate the directory.
    ///
    pub fn reset_output_dir(&self) -> SuiteResult<()> {
        let path = &self.config.output_dir;
        let wrap = |source| SuiteError::OutputDir {
            path: path.clone(),
            source,
        };

        match remove_dir_all(path) {
            Ok(()) => debug!("Removed previous artifacts in {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(wrap(e)),
        }
        create_dir_all(path).map_err(wrap)
    }

    ///
    /// Run the reporter for every dataset, in parallel when configured. A
    /// failing dataset never stops its siblings. `on_done` is called once per
    /// dataset as it finishes.
    ///
    pub fn regenerate_with<F>(&self, on_done: F) -> Vec<Regeneration>
    where
        F: Fn(&Regeneration) + Sync,
    {
        let regenerate = |dataset: &DatasetConfig| {
            let regeneration = self.regenerate_one(dataset);
            on_done(&regeneration);
            regeneration
        };

        if self.config.parallel {
            self.config.datasets.par_iter().map(regenerate).collect()
        } else {
            self.config.datasets.iter().map(regenerate).collect()
        }
    }

    fn regenerate_one(&self, dataset: &DatasetConfig) -> Regeneration {
        let artifact = self.config.observed_path(dataset);
        let reporter = self.config.reporter_for(dataset);

        let error = match reporter.capture_to(&dataset.input, &artifact) {
            Ok(_) => None,
            Err(e) => {
                warn!("Regeneration of '{}' failed: {}", dataset.id, e);
                Some(e)
            }
        };

        Regeneration {
            dataset: dataset.id.clone(),
            artifact,
            error,
        }
    }

    ///
    /// Build one case per (dataset, section), plus one per section of every
    /// negative control.
    ///
    pub fn evaluate(&self, regenerated: &[Regeneration]) -> SuiteReport {
        let mut report = SuiteReport::default();

        for dataset in &self.config.datasets {
            let expected = store::load(self.config.expected_path(dataset));
            let regeneration = regenerated.iter().find(|r| r.dataset == dataset.id);

            for case in self.regression_cases(dataset, regeneration, &expected) {
                report.push(case);
            }

            if let Some(control) = &dataset.negative_control {
                for case in self.control_cases(dataset, control, &expected) {
                    report.push(case);
                }
            }
        }

        info!(
            "{} cases: {} passed, {} failed",
            report.cases.len(),
            report.passed(),
            report.failed()
        );
        report
    }

    fn regression_cases(
        &self,
        dataset: &DatasetConfig,
        regeneration: Option<&Regeneration>,
        expected: &Result<StatsDocument, LoadError>,
    ) -> Vec<CaseReport> {
        let case = |section: Section, failure: Option<CaseFailure>| CaseReport {
            dataset: dataset.id.clone(),
            section,
            kind: CaseKind::Regression,
            failure,
        };

        let observed_path = match regeneration {
            Some(Regeneration { error: None, artifact, .. }) => artifact.clone(),
            Some(Regeneration { error: Some(e), .. }) => {
                let failure = CaseFailure::Regeneration {
                    message: e.to_string(),
                };
                return every_section(|section| case(section, Some(failure.clone())));
            }
            None => {
                let failure = CaseFailure::Regeneration {
                    message: format!("dataset '{}' was not regenerated", dataset.id),
                };
                return every_section(|section| case(section, Some(failure.clone())));
            }
        };

        let (expected, observed) = match load_pair(expected, &observed_path) {
            Ok(pair) => pair,
            Err(failure) => return every_section(|section| case(section, Some(failure.clone()))),
        };

        compare_documents(expected, &observed, &self.config.compare_options())
            .into_iter()
            .map(|(section, result)| {
                case(
                    section,
                    result.err().map(|error| CaseFailure::Validation { error }),
                )
            })
            .collect()
    }

    fn control_cases(
        &self,
        dataset: &DatasetConfig,
        control: &NegativeControl,
        expected: &Result<StatsDocument, LoadError>,
    ) -> Vec<CaseReport> {
        let case = |section: Section, failure: Option<CaseFailure>| CaseReport {
            dataset: dataset.id.clone(),
            section,
            kind: CaseKind::NegativeControl,
            failure,
        };

        let (expected, defective) = match load_pair(expected, &control.document) {
            Ok(pair) => pair,
            Err(failure) => return every_section(|section| case(section, Some(failure.clone()))),
        };

        compare_documents(expected, &defective, &self.config.compare_options())
            .into_iter()
            .map(|(section, result)| {
                let declared = control.defective_sections.contains(&section);
                let failure = match (declared, result) {
                    (true, Ok(())) => Some(CaseFailure::ControlAccepted),
                    (true, Err(error)) => {
                        debug!("Negative control rejected {}: {}", section, error);
                        None
                    }
                    (false, Ok(())) => None,
                    (false, Err(error)) => Some(CaseFailure::ControlRejected { error }),
                };
                case(section, failure)
            })
            .collect()
    }
}

fn every_section<F: Fn(Section) -> CaseReport>(case: F) -> Vec<CaseReport> {
    Section::ALL.iter().map(|&section| case(section)).collect()
}

fn load_pair<'e>(
    expected: &'e Result<StatsDocument, LoadError>,
    other: &Path,
) -> Result<(&'e StatsDocument, StatsDocument), CaseFailure> {
    let expected = expected.as_ref().map_err(|e| CaseFailure::Load {
        message: e.to_string(),
    })?;
    let other = store::load(other).map_err(|e| CaseFailure::Load {
        message: e.to_string(),
    })?;
    Ok((expected, other))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs::write;
    use tempfile::TempDir;

    use vsa_capture::ExitPolicy;
    use vsa_compare::{CompareOptions, VariantTypeSchema};

    const GOLDEN: &str = r#"{"TotalRecords": 3, "TsTvRatio": 2.0,
        "af_hist": {"usingLogScaleAF": false, "afHistBins": {"0": 3}},
        "mut_spec": {"A": [0, 1, 0, 0], "C": [0, 0, 0, 1], "G": [1, 0, 0, 0], "T": [0, 0, 0, 0]},
        "var_type": {"SNP": 3, "INS": 0, "DEL": 0, "OTHER": 0},
        "qual_dist": {"qualHistLowerBound": 1, "qualHistUpperBound": 2, "lowerBin": 0,
                      "upperBin": 1, "regularBins": {"0": 0, "1": 1, "2": 1}},
        "indel_size": {}}"#;

    #[fixture]
    fn workspace() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        create_dir_all(dir.path().join("data")).unwrap();
        write(dir.path().join("data/tiny.json"), GOLDEN).unwrap();
        let snapshots = format!("{{}};\n{};\n", GOLDEN.replace('\n', " "));
        write(dir.path().join("data/tiny.snapshots"), snapshots).unwrap();
        dir
    }

    fn config(dir: &TempDir) -> SuiteConfig {
        let mut config = SuiteConfig {
            reporter: PathBuf::from("cat"),
            reporter_args: vec![],
            reference_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            timeout_secs: 30,
            exit_policy: ExitPolicy::RequireSuccess,
            variant_types: VariantTypeSchema::Classic,
            parallel: false,
            datasets: vec![DatasetConfig {
                id: "tiny".to_string(),
                input: PathBuf::from("data/tiny.snapshots"),
                reporter_args: vec![],
                negative_control: None,
            }],
        };
        config.resolve_paths(dir.path());
        config
    }

    #[rstest]
    fn test_run_passes_every_section(workspace: TempDir) {
        let suite = RegressionSuite::new(config(&workspace)).unwrap();
        let report = suite.run().unwrap();

        assert_eq!(report.cases.len(), Section::ALL.len());
        assert!(report.is_success(), "{}", report);
        assert!(workspace.path().join("output/tiny.json").exists());
    }

    #[rstest]
    fn test_reset_output_dir_removes_stale_artifacts(workspace: TempDir) {
        let suite = RegressionSuite::new(config(&workspace)).unwrap();
        let stale = workspace.path().join("output/stale.json");
        create_dir_all(stale.parent().unwrap()).unwrap();
        write(&stale, "{}").unwrap();

        suite.reset_output_dir().unwrap();

        assert!(!stale.exists());
        assert!(workspace.path().join("output").is_dir());
    }

    #[rstest]
    fn test_output_dir_shared_with_references_is_refused(workspace: TempDir) {
        let mut config = config(&workspace);
        config.output_dir = workspace.path().join("data");

        let result = RegressionSuite::new(config);

        assert!(matches!(
            result,
            Err(SuiteError::Config(ConfigError::OutputOverlapsInputs { .. }))
        ));
        assert!(workspace.path().join("data/tiny.json").exists());
    }

    #[rstest]
    fn test_regeneration_failure_fails_every_case(workspace: TempDir) {
        let mut config = config(&workspace);
        config.datasets[0].input = workspace.path().join("data/absent.snapshots");
        let suite = RegressionSuite::new(config).unwrap();

        let report = suite.run().unwrap();

        assert_eq!(report.failed(), Section::ALL.len());
        assert!(report.failures().all(|c| matches!(
            c.failure,
            Some(CaseFailure::Regeneration { .. })
        )));
    }

    #[rstest]
    fn test_missing_golden_document_is_load_failure(workspace: TempDir) {
        std::fs::remove_file(workspace.path().join("data/tiny.json")).unwrap();
        let suite = RegressionSuite::new(config(&workspace)).unwrap();

        let report = suite.run().unwrap();

        assert!(report.failures().all(|c| matches!(c.failure, Some(CaseFailure::Load { .. }))));
        assert_eq!(report.failed(), Section::ALL.len());
    }

    #[rstest]
    fn test_unregenerated_dataset_fails(workspace: TempDir) {
        let suite = RegressionSuite::new(config(&workspace)).unwrap();
        let report = suite.evaluate(&[]);

        assert_eq!(report.failed(), Section::ALL.len());
    }

    #[rstest]
    fn test_negative_control_cases(workspace: TempDir) {
        let defective = GOLDEN.replace(r#""SNP": 3"#, r#""SNP": 4"#);
        write(workspace.path().join("data/bad.json"), defective).unwrap();

        let mut config = config(&workspace);
        config.datasets[0].negative_control = Some(NegativeControl {
            document: workspace.path().join("data/bad.json"),
            defective_sections: vec![Section::VariantType, Section::IndelSize],
        });
        let suite = RegressionSuite::new(config).unwrap();

        let report = suite.run().unwrap();
        let failures: Vec<&CaseReport> = report.failures().collect();

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].section, Section::IndelSize);
        assert_eq!(failures[0].kind, CaseKind::NegativeControl);
        assert_eq!(failures[0].failure, Some(CaseFailure::ControlAccepted));
    }

    #[rstest]
    fn test_parallel_regeneration_reports_each_dataset(workspace: TempDir) {
        let mut config = config(&workspace);
        let mut second = config.datasets[0].clone();
        second.id = "tiny-copy".to_string();
        write(workspace.path().join("data/tiny-copy.json"), GOLDEN).unwrap();
        config.datasets.push(second);
        config.parallel = true;

        let suite = RegressionSuite::new(config).unwrap();
        suite.reset_output_dir().unwrap();
        let regenerated = suite.regenerate_with(|_| {});

        assert_eq!(regenerated.len(), 2);
        assert!(regenerated.iter().all(Regeneration::succeeded));
        assert!(suite.evaluate(&regenerated).is_success());
    }

    #[rstest]
    fn test_compare_options_follow_config(workspace: TempDir) {
        let mut config = config(&workspace);
        config.variant_types = VariantTypeSchema::Extended;
        assert_eq!(
            config.compare_options(),
            CompareOptions {
                variant_types: VariantTypeSchema::Extended
            }
        );
    }
}
