use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::LoadError;
use crate::models::Section;

///
/// A fully materialized vcfstatsalive snapshot. Documents are read once and
/// never mutated; comparators only borrow sections out of them.
///
#[derive(Clone, Debug, PartialEq)]
pub struct StatsDocument {
    location: PathBuf,
    root: Value,
}

impl StatsDocument {
    pub fn new<P: Into<PathBuf>>(location: P, root: Value) -> Self {
        StatsDocument {
            location: location.into(),
            root,
        }
    }

    ///
    /// Parse a document from JSON text. `location` is only used for error
    /// messages and reporting.
    ///
    pub fn parse<P: Into<PathBuf>>(location: P, text: &str) -> Result<Self, LoadError> {
        let location = location.into();
        if text.trim().is_empty() {
            return Err(LoadError::Empty(location));
        }
        let root = serde_json::from_str(text).map_err(|source| LoadError::Parse {
            path: location.clone(),
            source,
        })?;
        Ok(StatsDocument::new(location, root))
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    ///
    /// Borrow one section. The root object is returned for [`Section::TopLevel`].
    ///
    pub fn section(&self, section: Section) -> Option<&Value> {
        match section.key() {
            None => Some(&self.root),
            Some(key) => self.root.get(key),
        }
    }
}

impl TryFrom<&Path> for StatsDocument {
    type Error = LoadError;

    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        crate::store::load(value)
    }
}

impl Display for StatsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatsDocument({})", self.location.display())
    }
}
