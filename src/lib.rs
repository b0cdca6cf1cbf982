//! Integration-test harness for kernels booted under an emulator.
//!
//! Each test launches a shell pipeline (typically `make qemu KERNEL=...`) in its own
//! process group, scans the emulator console line by line for expected patterns,
//! optionally types into it, and tears the whole group down afterwards. Results are
//! rendered in a gtest-style banner format.

pub mod case;
pub mod config;
mod error;
mod lock;
mod logging;
pub mod matcher;
pub mod reporter;
pub mod runner;
pub mod session;
pub mod subprocess;
pub mod suite;
mod telemetry;

pub(crate) use lock::lock_or_recover;
pub use case::{KernelSpec, Launch, Step, TestCase, TestId};
pub use error::{HarnessError, MatchFailure, ScanStop};
pub use logging::{init_logging, log_debug, log_file_path};
pub use reporter::{ConsoleReporter, Palette, RunResult, TestListener};
pub use runner::{RunnerConfig, SuiteRunner};
pub use session::Session;
pub use subprocess::Subprocess;
pub use telemetry::init_tracing;
