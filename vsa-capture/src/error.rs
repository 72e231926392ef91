use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Error type for snapshot capture.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The reporter binary could not be started.
    #[error("Failed to start reporter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The reporter closed its output without writing a single line.
    #[error("Reporter produced no output for {0}")]
    EmptyOutput(PathBuf),

    /// The reporter was still running when the deadline passed and was killed.
    #[error("Reporter did not finish within {}s for {input}", timeout.as_secs_f64())]
    Timeout { input: PathBuf, timeout: Duration },

    /// The reporter exited unsuccessfully (or was killed by a signal).
    #[error("Reporter exited with {status} for {input}")]
    ReporterFailed { input: PathBuf, status: ExitStatus },

    /// IO error while reading the stream or writing the artifact.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;
