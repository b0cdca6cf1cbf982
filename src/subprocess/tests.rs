use super::io::spawn_line_reader;
use super::*;
use crossbeam_channel::unbounded;
use std::time::Instant;

const SH: &str = "/bin/sh";
const READ_TIMEOUT: Duration = Duration::from_secs(5);

fn launch(command: &str) -> Subprocess {
    Subprocess::launch(Path::new(SH), command).expect("launch test subject")
}

/// Drain `rx` until its sender is gone; false if that did not happen before `deadline`.
fn wait_for_disconnect(rx: &Receiver<Vec<u8>>, deadline: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Err(RecvTimeoutError::Disconnected) => return true,
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
        }
    }
    false
}

#[test]
fn line_reader_splits_on_newlines_and_keeps_trailing_fragment() {
    let (tx, rx) = unbounded();
    let handle = spawn_line_reader(&b"one\ntwo\r\nthree"[..], tx).unwrap();
    handle.join().unwrap();
    let lines: Vec<Vec<u8>> = rx.iter().collect();
    assert_eq!(
        lines,
        vec![b"one\n".to_vec(), b"two\r\n".to_vec(), b"three".to_vec()]
    );
}

#[test]
fn lines_arrive_in_emission_order_then_stream_ends() {
    let proc = launch("printf 'a\\nb\\nc\\n'");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"a\n");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"b\n");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"c\n");
    assert_eq!(
        proc.next_line(READ_TIMEOUT).unwrap_err(),
        ScanStop::EndOfStream
    );
    proc.teardown();
}

#[test]
fn silent_subject_times_out_without_being_killed() {
    let mut proc = launch("sleep 30");
    let timeout = Duration::from_millis(100);
    assert_eq!(
        proc.next_line(timeout).unwrap_err(),
        ScanStop::Timeout(timeout)
    );
    let child = proc.child.as_mut().expect("child still owned");
    assert!(child.try_wait().unwrap().is_none());
    proc.teardown();
}

#[test]
fn stderr_is_discarded() {
    let proc = launch("echo noise 1>&2; echo signal");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"signal\n");
    proc.teardown();
}

#[test]
fn subject_leads_its_own_process_group() {
    let proc = launch("sleep 30");
    // SAFETY: getpgid only inspects process state.
    let pgid = unsafe { libc::getpgid(proc.pid()) };
    // SAFETY: getpgrp has no preconditions.
    let own = unsafe { libc::getpgrp() };
    assert_eq!(pgid, proc.pid());
    assert_ne!(pgid, own);
    proc.teardown();
}

#[test]
fn missing_shell_is_a_launch_error() {
    let err = Subprocess::launch(Path::new("/nonexistent/kerneltest-sh"), "true")
        .err()
        .expect("launch should fail");
    match err {
        HarnessError::Launch { command, .. } => assert_eq!(command, "true"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn send_writes_bytes_verbatim() {
    let mut proc = launch("cat");
    proc.send("ping");
    proc.send(b"\n");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"ping\n");
    proc.send(String::from("pong\n"));
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"pong\n");
    assert!(proc.take_input_error().is_none());
    proc.teardown();
}

#[test]
fn broken_pipe_is_deferred_not_raised() {
    let mut proc = launch("exec 0<&-; echo closed; sleep 30");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"closed\n");
    proc.send("ls\n");
    let err = proc.take_input_error().expect("write to closed stdin should fail");
    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    assert!(proc.take_input_error().is_none());
    proc.teardown();
}

#[test]
fn teardown_terminates_the_whole_group() {
    // The background sleep keeps stdout open; only a group-wide signal closes it.
    let proc = launch("sleep 30 & echo started; wait");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"started\n");
    let rx = proc.lines.clone();
    let start = Instant::now();
    proc.teardown();
    assert!(wait_for_disconnect(&rx, Duration::from_secs(5)));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn teardown_after_exit_is_quiet() {
    let proc = launch("true");
    assert_eq!(
        proc.next_line(READ_TIMEOUT).unwrap_err(),
        ScanStop::EndOfStream
    );
    proc.teardown();
}

#[test]
fn drop_tears_down_when_teardown_was_skipped() {
    let proc = launch("sleep 30 & echo started; wait");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"started\n");
    let rx = proc.lines.clone();
    drop(proc);
    assert!(wait_for_disconnect(&rx, Duration::from_secs(5)));
}

#[test]
fn small_input_to_a_subject_that_never_reads_does_not_block() {
    let mut proc = launch("echo waiting; sleep 30");
    assert_eq!(proc.next_line(READ_TIMEOUT).unwrap(), b"waiting\n");
    let start = Instant::now();
    for _ in 0..64 {
        proc.send("usertests\n");
    }
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(proc.take_input_error().is_none());
    proc.teardown();
}
