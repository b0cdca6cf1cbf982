use super::palette::{Banner, Palette};
use super::{plural, RunResult, TestListener};
use crate::case::TestId;
use crate::log_debug;
use std::io::Write;
use std::time::{Duration, Instant};

/// Renders suite events as colored bracket banners and keeps the run's tally.
///
/// ```text
/// [==========] Running 2 tests
/// [ RUN      ] TestVMM.hello32
/// [       OK ] TestVMM.hello32 (0.412s)
/// ...
/// [==========] 2 tests ran (1.020s)
/// [  PASSED  ] 2 tests
/// ```
pub struct ConsoleReporter<W: Write> {
    out: W,
    palette: Palette,
    total: usize,
    result: RunResult,
    run_started: Option<Instant>,
    test_started: Option<Instant>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            total: 0,
            result: RunResult::default(),
            run_started: None,
            test_started: None,
        }
    }

    pub fn result(&self) -> &RunResult {
        &self.result
    }

    pub fn into_inner(self) -> (W, RunResult) {
        (self.out, self.result)
    }

    fn banner(&mut self, banner: Banner, text: &str) {
        let line = format!(
            "{}{}{} {text}",
            banner.color(&self.palette),
            banner.tag(),
            self.palette.reset
        );
        self.write_line(&line);
    }

    fn write_line(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            log_debug(&format!("report write failed: {err}"));
        }
    }

    fn test_elapsed(&self) -> Duration {
        self.test_started
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }
}

fn seconds(elapsed: Duration) -> String {
    format!("({:.3}s)", elapsed.as_secs_f64())
}

impl<W: Write> TestListener for ConsoleReporter<W> {
    fn start_run(&mut self, total: usize) {
        self.total = total;
        self.banner(Banner::Divider, &format!("Running {total} {}", plural(total)));
        self.run_started = Some(Instant::now());
    }

    fn start_test(&mut self, test: &TestId) {
        self.result.tests_run += 1;
        self.banner(Banner::Run, &test.to_string());
        self.test_started = Some(Instant::now());
    }

    fn add_success(&mut self, test: &TestId) {
        let elapsed = self.test_elapsed();
        self.result.passed += 1;
        self.banner(Banner::Ok, &format!("{test} {}", seconds(elapsed)));
    }

    fn add_failure(&mut self, test: &TestId, detail: &str) {
        let elapsed = self.test_elapsed();
        self.result.failures.push((test.clone(), detail.to_string()));
        self.write_line(detail);
        self.banner(Banner::Failed, &format!("{test} {}", seconds(elapsed)));
    }

    fn stop_run(&mut self) {
        let elapsed = self
            .run_started
            .map(|start| start.elapsed())
            .unwrap_or_default();
        let total = self.total;
        self.banner(
            Banner::Divider,
            &format!("{total} {} ran {}", plural(total), seconds(elapsed)),
        );
        let passed = self.result.passed;
        self.banner(Banner::Passed, &format!("{passed} {}", plural(passed)));
        if self.result.failures.is_empty() {
            return;
        }
        let failed = self.result.failed();
        self.banner(
            Banner::Failed,
            &format!("{failed} {}, listed below:", plural(failed)),
        );
        let names: Vec<String> = self
            .result
            .failures
            .iter()
            .map(|(test, _)| test.to_string())
            .collect();
        for name in names {
            self.banner(Banner::Failed, &format!("{name} "));
        }
    }
}
