//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::{ArgAction, Parser};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::runner::RunnerConfig;
pub use defaults::{
    default_search_dirs, DEFAULT_MAKE_CMD, DEFAULT_SHELL, DEFAULT_SUITE, DEFAULT_TIMEOUT_SECS,
    MAX_TIMEOUT_SECS,
};

/// CLI options for the kernel test driver.
#[derive(Debug, Parser, Clone)]
#[command(about = "Boot kernels under QEMU and check their console output", author, version)]
pub struct HarnessConfig {
    /// Suite files to run, in order
    #[arg(value_name = "SUITE", default_value = DEFAULT_SUITE)]
    pub suites: Vec<PathBuf>,

    /// Seconds to wait for each console line before an assertion gives up
    #[arg(
        long = "timeout-secs",
        env = "KERNELTEST_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout_secs: u64,

    /// Directory searched for kernel images (repeatable, searched in order)
    #[arg(
        long = "search-dir",
        action = ArgAction::Append,
        value_name = "DIR",
        default_values_os_t = default_search_dirs()
    )]
    pub search_dirs: Vec<PathBuf>,

    /// Command that builds and boots a kernel; KERNEL=, APPEND= and INITRD= are appended
    #[arg(long = "make-cmd", env = "KERNELTEST_MAKE", default_value = DEFAULT_MAKE_CMD)]
    pub make_cmd: String,

    /// Shell used to run the boot command
    #[arg(long, default_value = DEFAULT_SHELL)]
    pub shell: PathBuf,

    /// Only run tests whose display name contains this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Print the selected test names and exit
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Disable colored banners (NO_COLOR is honoured as well)
    #[arg(long = "no-color", default_value_t = false)]
    pub no_color: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "KERNELTEST_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "KERNELTEST_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// JSON trace output path (defaults to a file in the temp dir)
    #[arg(long = "trace-log", env = "KERNELTEST_TRACE_LOG", value_name = "PATH")]
    pub trace_log: Option<PathBuf>,
}

impl HarnessConfig {
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }

    pub fn use_color(&self) -> bool {
        !self.no_color && env::var_os("NO_COLOR").is_none()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings the runner needs to turn test cases into processes.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            shell: self.shell.clone(),
            make_cmd: self.make_cmd.clone(),
            search_dirs: self.search_dirs.clone(),
            timeout: self.timeout(),
        }
    }
}
