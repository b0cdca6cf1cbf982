//! Test-run observers and the gtest-style console report.
//!
//! The runner announces lifecycle events to a [`TestListener`]; listeners only record and
//! render. They receive shared references and return nothing, so they cannot change which
//! tests run or how they turn out.

mod console;
mod palette;

#[cfg(test)]
mod tests;

use crate::case::TestId;

pub use console::ConsoleReporter;
pub use palette::Palette;

/// Receives suite lifecycle events in order:
/// `start_run`, then per test `start_test` followed by exactly one of `add_success` /
/// `add_failure`, then `stop_run`.
pub trait TestListener {
    fn start_run(&mut self, total: usize);
    fn start_test(&mut self, test: &TestId);
    fn add_success(&mut self, test: &TestId);
    fn add_failure(&mut self, test: &TestId, detail: &str);
    fn stop_run(&mut self);
}

/// Aggregate outcome of one suite run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub tests_run: usize,
    pub passed: usize,
    /// Failing tests with their full failure detail, in the order they failed.
    pub failures: Vec<(TestId, String)>,
}

impl RunResult {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether the driver should exit with status zero.
    pub fn was_successful(&self) -> bool {
        self.failures.is_empty()
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        "test"
    } else {
        "tests"
    }
}
