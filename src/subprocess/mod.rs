//! Process supervisor for the subject under test.
//!
//! Runs one shell pipeline per test in its own process group, exposes its stdout as a
//! stream of lines and its stdin as a byte sink, and takes the entire group down on
//! teardown.

mod group;
mod io;

#[cfg(test)]
mod tests;

use crate::error::{HarnessError, ScanStop};
use crate::log_debug;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::io::Write;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::Duration;

use group::{group_already_gone, terminate_group};
use io::spawn_line_reader;

/// Lines buffered between the stdout reader thread and the matcher.
const LINE_CHANNEL_CAPACITY: usize = 1024;

/// A running subject: `<shell> -c <command>` leading its own process group.
pub struct Subprocess {
    command: String,
    pgid: i32,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    pub(crate) lines: Receiver<Vec<u8>>,
    input_error: Option<std::io::Error>,
    _reader: thread::JoinHandle<()>,
}

impl Subprocess {
    /// Start `command` through `shell` in a new process group.
    ///
    /// stdin and stdout are pipes owned by the returned value; stderr is discarded.
    /// Returns as soon as the process exists.
    pub fn launch(shell: &Path, command: &str) -> Result<Self, HarnessError> {
        let mut child = Command::new(shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|err| HarnessError::launch(command, err))?;

        // process_group(0) makes the child the leader of a group named after its pid.
        let pgid = child.id() as i32;
        log_debug(&format!("launched pid {pgid}: {command}"));

        let stdin = child.stdin.take();
        let (tx, rx) = bounded(LINE_CHANNEL_CAPACITY);
        let reader = match child.stdout.take() {
            Some(stdout) => spawn_line_reader(stdout, tx),
            None => Err(std::io::Error::other("stdout pipe missing")),
        };
        let reader = match reader {
            Ok(handle) => handle,
            Err(err) => {
                let _ = terminate_group(pgid);
                let _ = child.wait();
                return Err(HarnessError::launch(command, err));
            }
        };

        Ok(Self {
            command: command.to_string(),
            pgid,
            child: Some(child),
            stdin,
            lines: rx,
            input_error: None,
            _reader: reader,
        })
    }

    /// Process id of the shell, which is also the process group id.
    pub fn pid(&self) -> i32 {
        self.pgid
    }

    /// Wait up to `timeout` for the next raw output line.
    pub(crate) fn next_line(&self, timeout: Duration) -> Result<Vec<u8>, ScanStop> {
        match self.lines.recv_timeout(timeout) {
            Ok(line) => Ok(line),
            Err(RecvTimeoutError::Timeout) => Err(ScanStop::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(ScanStop::EndOfStream),
        }
    }

    /// Write `data` to the subject's stdin exactly as given; no newline is added.
    ///
    /// A failed write is remembered and reported by the next matcher call instead of here.
    /// The write is blocking: a subject that never reads stdin holds this call once the
    /// pipe buffer (64 KiB on Linux) is full. Console input is a few bytes at a time, well
    /// under that.
    pub fn send(&mut self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        if self.input_error.is_some() {
            log_debug(&format!(
                "dropping {} input bytes after earlier write failure",
                data.len()
            ));
            return;
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return;
        };
        let result = stdin.write_all(data).and_then(|_| stdin.flush());
        if let Err(err) = result {
            log_debug(&format!("write to pid {} stdin failed: {err}", self.pgid));
            self.input_error = Some(err);
        }
    }

    pub(crate) fn take_input_error(&mut self) -> Option<std::io::Error> {
        self.input_error.take()
    }

    /// Signal the whole process group with SIGTERM, then block until the shell exits.
    ///
    /// Never fails: a group that is already gone is expected. There is no timeout and no
    /// SIGKILL escalation, so a subject that ignores SIGTERM keeps this call waiting.
    pub fn teardown(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        match terminate_group(self.pgid) {
            Ok(()) => log_debug(&format!("sent SIGTERM to process group {}", self.pgid)),
            Err(err) if group_already_gone(&err) => {
                log_debug(&format!("process group {} already exited", self.pgid))
            }
            Err(err) => log_debug(&format!(
                "SIGTERM to process group {} failed: {err}",
                self.pgid
            )),
        }
        match child.wait() {
            Ok(status) => log_debug(&format!(
                "pid {} exited: {status} ({})",
                self.pgid, self.command
            )),
            Err(err) => log_debug(&format!("waiting for pid {} failed: {err}", self.pgid)),
        }
        self.stdin = None;
    }
}

impl Drop for Subprocess {
    fn drop(&mut self) {
        self.shutdown();
    }
}
