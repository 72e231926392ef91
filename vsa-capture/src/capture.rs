//! Final-snapshot capture from a streaming reporter.
//!
//! vcfstatsalive prints a complete JSON snapshot every N records and one last
//! snapshot once the input is exhausted. Intermediate lines are never parsed:
//! the stream is drained on a reader thread that keeps only the most recent
//! line, while the caller waits on a channel with a deadline so a reporter
//! that never terminates cannot hang the suite.

use std::fs::{create_dir_all, write};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, bounded};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};

// ──────────────────────────────────────────────
// Public types
// ──────────────────────────────────────────────

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Appended by the reporter after every snapshot.
pub const STATEMENT_TERMINATOR: char = ';';

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What to do when the reporter exits unsuccessfully after the stream closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitPolicy {
    /// A non-zero exit status (or death by signal) fails the capture.
    #[default]
    RequireSuccess,
    /// Only the captured snapshot matters.
    Ignore,
}

///
/// An external reporter invocation: `<program> [args...] <input>`.
///
#[derive(Clone, Debug)]
pub struct Reporter {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
    exit_policy: ExitPolicy,
}

impl Reporter {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Reporter {
            program: program.into(),
            args: Vec::new(),
            timeout: Some(DEFAULT_TIMEOUT),
            exit_policy: ExitPolicy::default(),
        }
    }

    /// Arguments placed before the dataset path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_exit_policy(mut self, exit_policy: ExitPolicy) -> Self {
        self.exit_policy = exit_policy;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    ///
    /// Run the reporter against `input` and return its final snapshot with the
    /// trailing statement terminator removed.
    ///
    pub fn capture(&self, input: &Path) -> Result<String> {
        let started = Instant::now();
        let deadline = self.timeout.map(|t| started + t);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| CaptureError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        debug!(
            "Started {} (pid {}) on {}",
            self.program.display(),
            child.id(),
            input.display()
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("reporter stdout was not piped"))?;

        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            // receiver is gone if the capture already timed out
            let _ = tx.send(last_line(BufReader::new(stdout)));
        });

        let received = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(remaining) {
                    Ok(received) => received,
                    Err(RecvTimeoutError::Timeout) => {
                        return Err(self.abort(&mut child, input));
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        Err(io::Error::other("reporter reader thread exited early"))
                    }
                }
            }
            None => rx
                .recv()
                .unwrap_or_else(|_| Err(io::Error::other("reporter reader thread exited early"))),
        };

        let status = self.wait(&mut child, deadline, input)?;
        let line = received?;

        if self.exit_policy == ExitPolicy::RequireSuccess && !status.success() {
            return Err(CaptureError::ReporterFailed {
                input: input.to_path_buf(),
                status,
            });
        }
        if !status.success() {
            warn!(
                "Reporter exited with {} for {}; keeping the captured snapshot",
                status,
                input.display()
            );
        }

        let line = line.ok_or_else(|| CaptureError::EmptyOutput(input.to_path_buf()))?;
        debug!(
            "Captured {} bytes from {} in {:.2?}",
            line.len(),
            input.display(),
            started.elapsed()
        );

        Ok(strip_terminator(&line).to_string())
    }

    ///
    /// Capture the final snapshot of `input` and persist it verbatim to
    /// `output`, replacing any previous artifact of that name.
    ///
    pub fn capture_to(&self, input: &Path, output: &Path) -> Result<String> {
        let snapshot = self.capture(input)?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        write(output, &snapshot)?;
        info!("Wrote {} from {}", output.display(), input.display());

        Ok(snapshot)
    }

    fn wait(&self, child: &mut Child, deadline: Option<Instant>, input: &Path) -> Result<ExitStatus> {
        let Some(deadline) = deadline else {
            return Ok(child.wait()?);
        };
        loop {
            match child.try_wait()? {
                Some(status) => return Ok(status),
                None if Instant::now() >= deadline => return Err(self.abort(child, input)),
                None => thread::sleep(EXIT_POLL_INTERVAL),
            }
        }
    }

    fn abort(&self, child: &mut Child, input: &Path) -> CaptureError {
        let timeout = self.timeout.unwrap_or_default();
        warn!(
            "Reporter exceeded {:.1}s on {}; killing pid {}",
            timeout.as_secs_f64(),
            input.display(),
            child.id()
        );
        child.kill().ok();
        child.wait().ok();
        CaptureError::Timeout {
            input: input.to_path_buf(),
            timeout,
        }
    }
}

// ──────────────────────────────────────────────
// Stream helpers
// ──────────────────────────────────────────────

///
/// Drain `reader` and return the last line it produced (without its line
/// ending), or `None` when the stream was empty. Earlier lines are discarded
/// as raw bytes; only the last one has to be UTF-8.
///
pub fn last_line<R: BufRead>(mut reader: R) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let mut last = Vec::new();
    let mut seen = false;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        std::mem::swap(&mut line, &mut last);
        seen = true;
    }

    if !seen {
        return Ok(None);
    }
    if last.last() == Some(&b'\n') {
        last.pop();
        if last.last() == Some(&b'\r') {
            last.pop();
        }
    }
    String::from_utf8(last)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

///
/// Remove one statement terminator from the very end of a snapshot line.
/// Text without a trailing terminator is returned unchanged.
///
pub fn strip_terminator(line: &str) -> &str {
    line.strip_suffix(STATEMENT_TERMINATOR).unwrap_or(line)
}

// ──────────────────────────────────────────────
// Unit tests
// ──────────────────────────────────────────────
