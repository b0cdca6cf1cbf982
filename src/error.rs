//! Failure types produced while driving a subject process.

use std::fmt;
use std::io;
use std::time::Duration;

/// Why a matcher call stopped reading without finding its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    /// No line arrived within the per-read timeout.
    Timeout(Duration),
    /// The subject closed its output stream.
    EndOfStream,
}

/// An expected pattern never showed up on the subject's console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    pub pattern: String,
    pub stop: ScanStop,
    /// The most recent console lines, oldest first.
    pub context: Vec<String>,
}

impl fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}' not found in output:\n...\n{}",
            self.pattern,
            self.context.join("\n")
        )
    }
}

/// Errors surfaced by the process supervisor and line matcher.
#[derive(Debug)]
pub enum HarnessError {
    /// The subject could not be started, or its image could not be found.
    Launch { command: String, reason: String },
    /// An expected pattern was not observed.
    Match(MatchFailure),
    /// An earlier write to the subject's stdin failed.
    Input(io::Error),
    /// A pattern string is not a valid regular expression.
    Pattern { pattern: String, reason: String },
}

impl HarnessError {
    pub(crate) fn launch(command: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Launch {
            command: command.into(),
            reason: reason.to_string(),
        }
    }

    pub fn as_match_failure(&self) -> Option<&MatchFailure> {
        match self {
            Self::Match(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch { command, reason } => {
                write!(f, "failed to launch `{command}': {reason}")
            }
            Self::Match(failure) => failure.fmt(f),
            Self::Input(err) => write!(f, "write to subject stdin failed: {err}"),
            Self::Pattern { pattern, reason } => write!(f, "invalid pattern `{pattern}': {reason}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MatchFailure> for HarnessError {
    fn from(failure: MatchFailure) -> Self {
        Self::Match(failure)
    }
}
