//! Process-group control for executed commands.
//!
//! Commands are spawned as the leader of a fresh process group, so a single
//! `killpg` reaches every process the shell started, not only the shell.
//! When rusty-cmd owns the terminal, that group is also made the terminal's
//! foreground group for the duration of the command so `sudo`, `ssh` and
//! other programs that talk to `/dev/tty` are not stopped by SIGTTIN/SIGTTOU.

use std::io::{self, IsTerminal};

use tracing::{debug, warn};

/// Whether stdin is a terminal that commands could be given.
pub fn stdin_is_terminal() -> bool {
    io::stdin().is_terminal()
}

#[cfg(unix)]
fn pgid_of(pid: u32) -> io::Result<libc::pid_t> {
    libc::pid_t::try_from(pid).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("pid {} out of range", pid))
    })
}

/// Send SIGKILL to the process group led by `pid` (best-effort).
///
/// A group that has already exited is not an error.
#[cfg(unix)]
pub fn kill_process_group(pid: u32) -> io::Result<()> {
    let pgid = pgid_of(pid)?;
    let result = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if result == -1 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            return Err(err);
        }
    }
    Ok(())
}

/// No-op on non-Unix platforms; the direct child is still killed by the caller.
#[cfg(not(unix))]
pub fn kill_process_group(_pid: u32) -> io::Result<()> {
    Ok(())
}

/// Terminal foreground handed to a command's process group.
///
/// Dropping the guard gives the terminal back to rusty-cmd's own group. Drop
/// it only after the command has been reaped.
#[cfg(unix)]
#[derive(Debug)]
pub struct TerminalForeground {
    restore_to: libc::pid_t,
}

#[cfg(unix)]
impl TerminalForeground {
    /// Make the group led by `pid` the foreground group of the terminal on
    /// stdin. Returns `None` when rusty-cmd is not itself in the foreground
    /// (started with `&`, or another command holds the terminal).
    pub fn hand_to(pid: u32) -> io::Result<Option<Self>> {
        let pgid = pgid_of(pid)?;

        // tcsetpgrp from a group that is no longer in the foreground raises
        // SIGTTOU; an interactive shell ignores it for the same reason.
        unsafe { libc::signal(libc::SIGTTOU, libc::SIG_IGN) };

        let ours = unsafe { libc::getpgrp() };
        let current = unsafe { libc::tcgetpgrp(libc::STDIN_FILENO) };
        if current == -1 {
            return Err(io::Error::last_os_error());
        }
        if current != ours {
            debug!("Terminal foreground is group {}, not ours ({})", current, ours);
            return Ok(None);
        }

        if unsafe { libc::tcsetpgrp(libc::STDIN_FILENO, pgid) } == -1 {
            return Err(io::Error::last_os_error());
        }
        // The command may have touched the terminal before the handoff and
        // been stopped for it.
        unsafe { libc::killpg(pgid, libc::SIGCONT) };

        Ok(Some(Self { restore_to: ours }))
    }
}

#[cfg(unix)]
impl Drop for TerminalForeground {
    fn drop(&mut self) {
        if unsafe { libc::tcsetpgrp(libc::STDIN_FILENO, self.restore_to) } == -1 {
            warn!(
                "Failed to take back the terminal: {}",
                io::Error::last_os_error()
            );
        }
    }
}

#[cfg(not(unix))]
#[derive(Debug)]
pub struct TerminalForeground;

#[cfg(not(unix))]
impl TerminalForeground {
    pub fn hand_to(_pid: u32) -> io::Result<Option<Self>> {
        Ok(None)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_killing_exited_group_is_not_an_error() {
        let mut child = std::process::Command::new("/bin/sh")
            .arg("-c")
            .arg("exit 0")
            .spawn()
            .unwrap();
        let pid = child.id();
        child.wait().unwrap();
        assert!(kill_process_group(pid).is_ok());
    }

    #[test]
    fn test_no_handoff_without_terminal() {
        if stdin_is_terminal() {
            return;
        }
        // tcgetpgrp fails on a non-terminal stdin.
        assert!(TerminalForeground::hand_to(std::process::id()).is_err());
    }
}
