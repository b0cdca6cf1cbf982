//! The per-test handle bodies use to talk to a running subject.

use crate::case::compile_pattern;
use crate::error::HarnessError;
use crate::matcher::{await_output, OutputLog};
use crate::subprocess::Subprocess;
use regex::Regex;
use std::path::Path;
use std::time::Duration;

/// One live subject plus everything it has printed so far.
pub struct Session {
    proc: Subprocess,
    log: OutputLog,
    timeout: Duration,
}

impl Session {
    pub fn launch(shell: &Path, command: &str, timeout: Duration) -> Result<Self, HarnessError> {
        let proc = Subprocess::launch(shell, command)?;
        Ok(Self::new(proc, timeout))
    }

    pub fn new(proc: Subprocess, timeout: Duration) -> Self {
        Self {
            proc,
            log: OutputLog::new(),
            timeout,
        }
    }

    /// Compile `pattern` and wait for a console line matching it.
    pub fn assert_output(&mut self, pattern: &str) -> Result<(), HarnessError> {
        let regex = compile_pattern(pattern)?;
        self.expect(&regex)
    }

    pub fn expect(&mut self, pattern: &Regex) -> Result<(), HarnessError> {
        await_output(&mut self.proc, &mut self.log, pattern, self.timeout)
    }

    /// Type `data` into the subject. Write failures show up on the next assertion.
    pub fn input(&mut self, data: impl AsRef<[u8]>) {
        self.proc.send(data);
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn pid(&self) -> i32 {
        self.proc.pid()
    }

    pub fn teardown(self) {
        self.proc.teardown();
    }
}
