use crate::config::HarnessConfig;
use crate::lock_or_recover;
use std::{
    env,
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: OnceLock<Mutex<Option<CappedLog>>> = OnceLock::new();

/// Path to the debug log shared by every run on this machine.
pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("kerneltest.log")
}

/// Append-only file that starts over once it would grow past `cap` bytes.
struct CappedLog {
    path: PathBuf,
    file: File,
    len: u64,
    cap: u64,
}

impl CappedLog {
    fn open(path: &Path, cap: u64) -> Option<Self> {
        let existing = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let file = Self::open_file(path, existing > cap)?;
        let len = if existing > cap { 0 } else { existing };
        Some(Self {
            path: path.to_path_buf(),
            file,
            len,
            cap,
        })
    }

    fn open_file(path: &Path, truncate: bool) -> Option<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        options.open(path).ok()
    }

    fn append(&mut self, line: &str) {
        let size = line.len() as u64;
        if self.len + size > self.cap {
            if let Some(file) = Self::open_file(&self.path, true) {
                self.file = file;
                self.len = 0;
            }
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.len += size;
        }
    }
}

fn debug_log() -> &'static Mutex<Option<CappedLog>> {
    DEBUG_LOG.get_or_init(|| Mutex::new(None))
}

/// Enable or disable the debug log according to `--logs` / `--no-logs`.
pub fn init_logging(config: &HarnessConfig) {
    set_logging_enabled(config.logging_enabled());
}

fn set_logging_enabled(enabled: bool) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    let mut log = lock_or_recover(debug_log(), "init_logging");
    *log = if enabled {
        CappedLog::open(&log_file_path(), LOG_MAX_BYTES)
    } else {
        None
    };
}

/// Whether `log_debug` writes anywhere; lets hot paths skip building messages.
pub(crate) fn debug_enabled() -> bool {
    LOG_ENABLED.load(Ordering::Relaxed)
}

/// Append a timestamped line to the debug log. Never writes to stdout.
pub fn log_debug(msg: &str) {
    if !debug_enabled() {
        return;
    }
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let line = format!("[{timestamp}] {msg}\n");
    if let Some(log) = lock_or_recover(debug_log(), "log_debug").as_mut() {
        log.append(&line);
    }
}
