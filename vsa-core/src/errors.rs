use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Document not found: {0}")]
    Missing(PathBuf),

    #[error("Document is empty: {0}")]
    Empty(PathBuf),

    #[error("Document is not valid JSON: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Can't read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Location of the document that failed to load.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Missing(path) | LoadError::Empty(path) => path,
            LoadError::Parse { path, .. } | LoadError::Io { path, .. } => path,
        }
    }
}
