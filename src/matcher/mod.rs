//! Timeout-bounded, line-by-line pattern search over a subject's console.

mod ansi;


use crate::error::{HarnessError, MatchFailure};
use crate::logging::debug_enabled;
use crate::log_debug;
use crate::subprocess::Subprocess;
use regex::Regex;
use std::time::Duration;

pub use ansi::strip_escapes;
pub(crate) use ansi::decode_line;

/// Number of trailing lines quoted when a pattern is not found.
pub const FAILURE_CONTEXT_LINES: usize = 10;

/// Every console line seen so far in one test, escape-stripped, in emission order.
#[derive(Debug, Default, Clone)]
pub struct OutputLog {
    lines: Vec<String>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }
}

/// Read lines from `proc` until one contains a match for `pattern`.
///
/// Each read waits at most `timeout`. Scanning stops at the first match, or fails once a
/// read times out or the subject closes stdout. Every line read is appended to `log`
/// whether or not it matches, and the stream position carries over to the next call, so
/// a line is never examined twice. The pattern is searched anywhere in the line; anchor
/// it with `^...$` for whole-line equality.
pub fn await_output(
    proc: &mut Subprocess,
    log: &mut OutputLog,
    pattern: &Regex,
    timeout: Duration,
) -> Result<(), HarnessError> {
    if let Some(err) = proc.take_input_error() {
        return Err(HarnessError::Input(err));
    }
    let stop = loop {
        match proc.next_line(timeout) {
            Ok(raw) => {
                let line = decode_line(&raw);
                if debug_enabled() {
                    log_debug(&format!("console: {line}"));
                }
                let found = pattern.is_match(&line);
                log.push(line);
                if found {
                    return Ok(());
                }
            }
            Err(stop) => break stop,
        }
    };
    log_debug(&format!("gave up on `{}' after {stop:?}", pattern.as_str()));
    Err(MatchFailure {
        pattern: pattern.as_str().to_string(),
        stop,
        context: log.tail(FAILURE_CONTEXT_LINES).to_vec(),
    }
    .into())
}
