//! Sequential suite execution.

use crate::case::{Body, Step, TestCase};
use crate::config::{default_search_dirs, DEFAULT_MAKE_CMD, DEFAULT_SHELL, DEFAULT_TIMEOUT_SECS};
use crate::log_debug;
use crate::reporter::TestListener;
use crate::session::Session;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What the runner needs to turn a [`TestCase`] into a running subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub shell: PathBuf,
    pub make_cmd: String,
    pub search_dirs: Vec<PathBuf>,
    /// Per-read timeout used when a test does not set its own.
    pub timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            make_cmd: DEFAULT_MAKE_CMD.to_string(),
            search_dirs: default_search_dirs(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct SuiteRunner {
    config: RunnerConfig,
}

impl SuiteRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run every case in order, reporting each outcome to `listener`.
    ///
    /// A failing, erroring or panicking test is reported and the suite moves on. The
    /// subject is torn down after every test that got as far as launching.
    pub fn run(&self, cases: &[TestCase], listener: &mut dyn TestListener) {
        listener.start_run(cases.len());
        for case in cases {
            listener.start_test(&case.id);
            let started = Instant::now();
            let outcome = self.run_case(case);
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match outcome {
                Ok(()) => {
                    tracing::info!(test = %case.id, elapsed_ms, passed = true, "test finished");
                    listener.add_success(&case.id);
                }
                Err(detail) => {
                    tracing::info!(test = %case.id, elapsed_ms, passed = false, "test finished");
                    log_debug(&format!("{} failed: {detail}", case.id));
                    listener.add_failure(&case.id, &detail);
                }
            }
        }
        listener.stop_run();
    }

    fn run_case(&self, case: &TestCase) -> Result<(), String> {
        let command = case
            .launch
            .command(&self.config.make_cmd, &self.config.search_dirs)
            .map_err(|err| err.to_string())?;
        let timeout = case.timeout.unwrap_or(self.config.timeout);
        let mut session =
            Session::launch(&self.config.shell, &command, timeout).map_err(|err| err.to_string())?;
        tracing::info!(test = %case.id, pid = session.pid(), command = %command, "subject launched");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_body(&case.body, &mut session)));

        let pid = session.pid();
        session.teardown();
        tracing::debug!(test = %case.id, pid, "subject torn down");

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(format!("{err:?}")),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

fn run_body(body: &Body, session: &mut Session) -> anyhow::Result<()> {
    match body {
        Body::Steps(steps) => {
            for step in steps {
                match step {
                    Step::Expect(pattern) => session.expect(pattern)?,
                    Step::Input(data) => session.input(data),
                }
            }
            Ok(())
        }
        Body::Closure(body) => body(session),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("test panicked: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("test panicked: {text}")
    } else {
        "test panicked".to_string()
    }
}
