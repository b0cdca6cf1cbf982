use crate::config::HarnessConfig;
use crate::log_debug;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::fmt::time::UtcTime;

static TRACING_INSTALLED: OnceLock<bool> = OnceLock::new();

fn default_trace_path() -> PathBuf {
    env::temp_dir().join("kerneltest_trace.jsonl")
}

/// Install a JSON-lines `tracing` subscriber for per-test events.
///
/// Does nothing unless logging is enabled. The subscriber is global, so only the first
/// call in a process has an effect; the return value reports whether one is installed.
pub fn init_tracing(config: &HarnessConfig) -> bool {
    if !config.logging_enabled() {
        return false;
    }
    *TRACING_INSTALLED.get_or_init(|| {
        let path = config.trace_log.clone().unwrap_or_else(default_trace_path);
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(err) => {
                log_debug(&format!("trace log {} unavailable: {err}", path.display()));
                return false;
            }
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(Mutex::new(file))
            .with_target(false)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    })
}
