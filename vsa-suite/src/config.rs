use std::collections::HashSet;
use std::env::current_dir;
use std::ffi::OsStr;
use std::fs::read_to_string;
use std::iter::once;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vsa_capture::{ExitPolicy, Reporter};
use vsa_compare::{CompareOptions, VariantTypeSchema};
use vsa_core::Section;
use vsa_core::utils::artifact_file_name;

pub const DEFAULT_CONFIG_FILE: &str = "vsa-regress.toml";
pub const DEFAULT_REFERENCE_DIR: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

///
/// A deliberately defective document used to prove the validator rejects bad
/// data: every section in `defective_sections` must fail against the golden
/// document and every other section must pass.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NegativeControl {
    pub document: PathBuf,
    #[serde(default)]
    pub defective_sections: Vec<Section>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DatasetConfig {
    /// Also the artifact name: `<id>.json` in both the reference and output directories.
    pub id: String,
    pub input: PathBuf,
    /// Appended after the suite-wide reporter arguments.
    #[serde(default)]
    pub reporter_args: Vec<String>,
    pub negative_control: Option<NegativeControl>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    pub reporter: PathBuf,
    #[serde(default)]
    pub reporter_args: Vec<String>,
    #[serde(default = "default_reference_dir")]
    pub reference_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// `0` waits forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub exit_policy: ExitPolicy,
    #[serde(default)]
    pub variant_types: VariantTypeSchema,
    #[serde(default)]
    pub parallel: bool,
    pub datasets: Vec<DatasetConfig>,
}

fn default_reference_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REFERENCE_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, PartialEq)]
pub enum SuiteConfigFileType {
    Toml,
    Yaml,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing or invalid file extension in suite config {0}. It must be `toml`, `yaml` or `yml`")]
    InvalidFileType(PathBuf),
    #[error("Suite config registers no datasets")]
    NoDatasets,
    #[error("Dataset '{0}' is registered more than once; artifact names must be unique")]
    DuplicateDataset(String),
    #[error("Dataset id '{0}' can't be used as an artifact name")]
    InvalidDatasetId(String),
    #[error("Output directory {output} is reset on every run and must not contain {protected}")]
    OutputOverlapsInputs { output: PathBuf, protected: PathBuf },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl SuiteConfigFileType {
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => Ok(SuiteConfigFileType::Toml),
            Some("yaml") | Some("yml") => Ok(SuiteConfigFileType::Yaml),
            _ => Err(ConfigError::InvalidFileType(path.to_path_buf())),
        }
    }
}

impl SuiteConfig {
    ///
    /// Read a suite config. Relative paths inside it are resolved against the
    /// directory holding the config file.
    ///
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let file_type = SuiteConfigFileType::from_path(path)?;
        let text = read_to_string(path)?;

        let mut config: SuiteConfig = match file_type {
            SuiteConfigFileType::Toml => toml::from_str(&text)?,
            SuiteConfigFileType::Yaml => serde_yaml::from_str(&text)?,
        };

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        config.validate()?;

        Ok(config)
    }

    ///
    /// Anchor every relative path at `base`. A bare reporter name such as
    /// `vcfstatsalive` is left alone so it is looked up on `PATH`.
    ///
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.reporter.components().count() > 1 {
            self.reporter = anchor(base, &self.reporter);
        }
        self.reference_dir = anchor(base, &self.reference_dir);
        self.output_dir = anchor(base, &self.output_dir);

        for dataset in &mut self.datasets {
            dataset.input = anchor(base, &dataset.input);
            if let Some(control) = dataset.negative_control.as_mut() {
                control.document = anchor(base, &control.document);
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.datasets.is_empty() {
            return Err(ConfigError::NoDatasets);
        }

        let mut seen = HashSet::new();
        for dataset in &self.datasets {
            let id = dataset.id.as_str();
            if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
                return Err(ConfigError::InvalidDatasetId(dataset.id.clone()));
            }
            if !seen.insert(id) {
                return Err(ConfigError::DuplicateDataset(dataset.id.clone()));
            }
        }

        self.check_output_dir()
    }

    ///
    /// The output directory is removed at the start of every run, so it may
    /// not be, or contain, the reference directory, a dataset input, a
    /// negative control or the reporter itself.
    ///
    fn check_output_dir(&self) -> ConfigResult<()> {
        let output = comparable(&self.output_dir);

        let reporter = Some(&self.reporter).filter(|r| r.components().count() > 1);
        let protected = once(&self.reference_dir)
            .chain(reporter)
            .chain(self.datasets.iter().map(|d| &d.input))
            .chain(
                self.datasets
                    .iter()
                    .filter_map(|d| d.negative_control.as_ref())
                    .map(|c| &c.document),
            );

        for path in protected {
            if comparable(path).starts_with(&output) {
                return Err(ConfigError::OutputOverlapsInputs {
                    output: self.output_dir.clone(),
                    protected: path.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn reporter_for(&self, dataset: &DatasetConfig) -> Reporter {
        Reporter::new(&self.reporter)
            .with_args(self.reporter_args.iter().chain(&dataset.reporter_args).cloned())
            .with_timeout(self.timeout())
            .with_exit_policy(self.exit_policy)
    }

    pub fn expected_path(&self, dataset: &DatasetConfig) -> PathBuf {
        self.reference_dir.join(artifact_file_name(&dataset.id))
    }

    pub fn observed_path(&self, dataset: &DatasetConfig) -> PathBuf {
        self.output_dir.join(artifact_file_name(&dataset.id))
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            variant_types: self.variant_types,
        }
    }
}

impl TryFrom<&Path> for SuiteConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        SuiteConfig::from_path(path)
    }
}

///
/// Absolute form of `path` without `.` or `..` components. Symlinks are
/// resolved through the deepest ancestor that exists.
///
fn comparable(path: &Path) -> PathBuf {
    let absolute = match current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };

    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut real) = existing.canonicalize() {
            real.extend(missing.iter().rev());
            return real;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return lexical,
        }
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs::write;
    use tempfile::TempDir;

    const TOML_CONFIG: &str = r#"
reporter = "../vcfstatsalive"
reference_dir = "data"
timeout_secs = 0
exit_policy = "ignore"

[[datasets]]
id = "platinum-exome"
input = "data/platinum-exome.vcf.gz"
reporter_args = ["--log-scale-af"]

[datasets.negative_control]
document = "data/bad-results.json"
defective_sections = ["af_hist", "mut_spec"]
"#;

    const YAML_CONFIG: &str = r#"
reporter: vcfstatsalive
variant_types: extended
parallel: true
datasets:
  - id: platinum-exome
    input: /data/platinum-exome.vcf.gz
  - id: trio
    input: data/trio.vcf.gz
"#;

    #[fixture]
    fn tmp() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_config(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        write(&path, text).unwrap();
        path
    }

    fn dataset(id: &str) -> DatasetConfig {
        DatasetConfig {
            id: id.to_string(),
            input: PathBuf::from(format!("{}.vcf.gz", id)),
            reporter_args: vec![],
            negative_control: None,
        }
    }

    #[rstest]
    fn test_from_path_for_toml(tmp: TempDir) {
        let path = write_config(&tmp, "suite.toml", TOML_CONFIG);
        let config = SuiteConfig::from_path(&path).unwrap();

        assert_eq!(config.reporter, tmp.path().join("../vcfstatsalive"));
        assert_eq!(config.output_dir, tmp.path().join(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.timeout(), None);
        assert_eq!(config.exit_policy, ExitPolicy::Ignore);
        assert_eq!(config.variant_types, VariantTypeSchema::Classic);

        let control = config.datasets[0].negative_control.as_ref().unwrap();
        assert_eq!(control.document, tmp.path().join("data/bad-results.json"));
        assert_eq!(
            control.defective_sections,
            vec![Section::AlleleFrequency, Section::MutationSpectrum]
        );
    }

    #[rstest]
    fn test_from_path_for_yaml(tmp: TempDir) {
        let path = write_config(&tmp, "suite.yml", YAML_CONFIG);
        let config = SuiteConfig::from_path(&path).unwrap();

        assert_eq!(config.reporter, PathBuf::from("vcfstatsalive"));
        assert_eq!(config.variant_types, VariantTypeSchema::Extended);
        assert_eq!(config.timeout(), Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
        assert_eq!(config.exit_policy, ExitPolicy::RequireSuccess);
        assert!(config.parallel);
        assert_eq!(config.datasets[0].input, PathBuf::from("/data/platinum-exome.vcf.gz"));
        assert_eq!(config.datasets[1].input, tmp.path().join("data/trio.vcf.gz"));
    }

    #[rstest]
    fn test_from_path_for_invalid_extension() {
        let result = SuiteConfig::from_path(Path::new("suite.json"));
        assert!(matches!(result, Err(ConfigError::InvalidFileType(_))));
    }

    #[rstest]
    fn test_duplicate_dataset_rejected(tmp: TempDir) {
        let text = "reporter = \"cat\"\n\
                    [[datasets]]\nid = \"a\"\ninput = \"a.txt\"\n\
                    [[datasets]]\nid = \"a\"\ninput = \"b.txt\"\n";
        let path = write_config(&tmp, "suite.toml", text);
        let result = SuiteConfig::from_path(&path);
        assert!(matches!(result, Err(ConfigError::DuplicateDataset(id)) if id == "a"));
    }

    #[rstest]
    #[case("")]
    #[case("nested/id")]
    #[case("..")]
    fn test_invalid_dataset_ids(#[case] id: &str) {
        let mut config: SuiteConfig =
            toml::from_str("reporter = \"cat\"\ndatasets = []").unwrap();
        config.datasets.push(dataset(id));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDatasetId(_))));
    }

    #[rstest]
    fn test_no_datasets_rejected() {
        let config: SuiteConfig = toml::from_str("reporter = \"cat\"\ndatasets = []").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::NoDatasets)));
    }

    #[rstest]
    #[case("data", "data")]
    #[case("data", ".")]
    #[case("data", "data/../data/")]
    #[case("reference/golden", "reference")]
    fn test_output_dir_may_not_hold_references(
        tmp: TempDir,
        #[case] reference_dir: &str,
        #[case] output_dir: &str,
    ) {
        let text = format!(
            "reporter = \"cat\"\nreference_dir = \"{}\"\noutput_dir = \"{}\"\n\
             [[datasets]]\nid = \"a\"\ninput = \"/inputs/a.txt\"\n",
            reference_dir, output_dir
        );
        let path = write_config(&tmp, "suite.toml", &text);

        let result = SuiteConfig::from_path(&path);
        assert!(matches!(
            result,
            Err(ConfigError::OutputOverlapsInputs { ref protected, .. })
                if *protected == tmp.path().join(reference_dir)
        ));
    }

    #[rstest]
    fn test_output_dir_may_not_hold_inputs(tmp: TempDir) {
        let path = write_config(&tmp, "suite.toml", TOML_CONFIG);
        let mut config = SuiteConfig::from_path(&path).unwrap();

        config.output_dir = tmp.path().join("data/out/..");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutputOverlapsInputs { ref protected, .. })
                if *protected == tmp.path().join("data")
        ));

        config.reference_dir = tmp.path().join("golden");
        config.output_dir = tmp.path().join("data");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutputOverlapsInputs { ref protected, .. })
                if *protected == tmp.path().join("data/platinum-exome.vcf.gz")
        ));

        config.datasets[0].input = tmp.path().join("inputs/platinum-exome.vcf.gz");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutputOverlapsInputs { ref protected, .. })
                if *protected == tmp.path().join("data/bad-results.json")
        ));

        config.datasets[0].negative_control = None;
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_output_dir_may_not_hold_reporter(tmp: TempDir) {
        let path = write_config(&tmp, "suite.toml", TOML_CONFIG);
        let mut config = SuiteConfig::from_path(&path).unwrap();
        config.reporter = tmp.path().join("output/bin/vcfstatsalive");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutputOverlapsInputs { ref protected, .. })
                if *protected == tmp.path().join("output/bin/vcfstatsalive")
        ));
    }

    #[rstest]
    fn test_sibling_output_dir_is_accepted(tmp: TempDir) {
        let path = write_config(&tmp, "suite.toml", TOML_CONFIG);
        let mut config = SuiteConfig::from_path(&path).unwrap();
        config.output_dir = tmp.path().join("data-output");

        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_artifact_paths_share_naming(tmp: TempDir) {
        let path = write_config(&tmp, "suite.toml", TOML_CONFIG);
        let config = SuiteConfig::from_path(&path).unwrap();
        let dataset = &config.datasets[0];

        assert_eq!(
            config.expected_path(dataset),
            tmp.path().join("data/platinum-exome.json")
        );
        assert_eq!(
            config.observed_path(dataset),
            tmp.path().join("output/platinum-exome.json")
        );
    }

    #[rstest]
    fn test_reporter_args_are_merged(tmp: TempDir) {
        let path = write_config(&tmp, "suite.toml", TOML_CONFIG);
        let mut config = SuiteConfig::from_path(&path).unwrap();
        config.reporter_args = vec!["--qual-lower-val=2".to_string()];

        let reporter = config.reporter_for(&config.datasets[0]);
        assert_eq!(reporter.args(), &["--qual-lower-val=2", "--log-scale-af"]);
    }
}
