use std::fmt::{self, Display};

use serde::Serialize;

use vsa_compare::ValidationError;
use vsa_core::Section;

/// Which document a case holds against the golden document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    /// The freshly regenerated artifact.
    Regression,
    /// A known-bad document that must be rejected section by section.
    NegativeControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CaseFailure {
    /// The reporter could not produce an artifact for the dataset.
    Regeneration { message: String },
    /// The expected or observed document could not be loaded.
    Load { message: String },
    Validation { error: ValidationError },
    /// A section declared defective in a negative control passed.
    ControlAccepted,
    /// An untouched section of a negative control failed.
    ControlRejected { error: ValidationError },
}

impl Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseFailure::Regeneration { message } => write!(f, "regeneration failed: {}", message),
            CaseFailure::Load { message } => write!(f, "{}", message),
            CaseFailure::Validation { error } => write!(f, "{}", error),
            CaseFailure::ControlAccepted => {
                write!(f, "section is declared defective but was accepted")
            }
            CaseFailure::ControlRejected { error } => {
                write!(f, "untouched section was rejected: {}", error)
            }
        }
    }
}

///
/// Outcome of one (dataset, section) case.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    pub dataset: String,
    pub section: Section,
    pub kind: CaseKind,
    pub failure: Option<CaseFailure>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    pub fn name(&self) -> String {
        match self.kind {
            CaseKind::Regression => format!("{}/{}", self.dataset, self.section),
            CaseKind::NegativeControl => {
                format!("{}/{} (negative control)", self.dataset, self.section)
            }
        }
    }
}

impl Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(f, "PASS {}", self.name()),
            Some(failure) => write!(f, "FAIL {}: {}", self.name(), failure),
        }
    }
}

///
/// Every case of a suite run. The run succeeds only when all cases pass.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }

    pub fn cases_for<'a>(&'a self, dataset: &'a str) -> impl Iterator<Item = &'a CaseReport> {
        self.cases.iter().filter(move |c| c.dataset == dataset)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{}", case)?;
        }
        write!(
            f,
            "{} cases: {} passed, {} failed",
            self.cases.len(),
            self.passed(),
            self.failed()
        )
    }
}
