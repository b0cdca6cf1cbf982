use std::io;

/// Ask every process in `pgid` to exit with SIGTERM.
///
/// The emulator usually runs as `sh -> make -> qemu`, so signalling only the shell would
/// leave QEMU running; the whole group is the unit of cleanup.
pub(super) fn terminate_group(pgid: i32) -> io::Result<()> {
    if pgid <= 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to signal process group {pgid}"),
        ));
    }
    // SAFETY: killpg only delivers a signal; pgid is a group created for the subject.
    let rc = unsafe { libc::killpg(pgid, libc::SIGTERM) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// True when the signal failed only because nobody is left in the group.
pub(super) fn group_already_gone(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ESRCH)
}
