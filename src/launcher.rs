//! Process launching for version probes.
//!
//! The resolver never talks to `std::process` directly; it goes through the
//! [`Launcher`] trait so tests can script subprocess behavior (chunked
//! output, abnormal exits, missing commands) without real executables.

use std::io::{self, Read};
use std::process::{Child, ChildStdout, Command, Stdio};

/// A running version query for one command.
///
/// Output arrives as raw chunks; callers must buffer every chunk and treat
/// the version as complete only after [`VersionQuery::wait`] returns.
pub trait VersionQuery: Send {
    /// Read the next chunk of standard output. `Ok(None)` once the stream
    /// is closed.
    fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Wait for the process to terminate. Returns `true` on a clean exit.
    fn wait(&mut self) -> io::Result<bool>;
}

/// Launches a named command and exposes its standard output.
///
/// Implementations must tolerate the command not existing: a failed spawn is
/// an `Err`, never a panic.
pub trait Launcher: Send + Sync {
    fn spawn(&self, command: &str, args: &[&str]) -> io::Result<Box<dyn VersionQuery>>;
}

/// Production launcher over `std::process::Command`.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn spawn(&self, command: &str, args: &[&str]) -> io::Result<Box<dyn VersionQuery>> {
        let mut cmd = base_command(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd.spawn()?;
        let stdout = child.stdout.take();
        Ok(Box::new(ChildQuery { child, stdout }))
    }
}

/// Build the platform-appropriate command invocation.
///
/// Many engines are script shims on Windows (npm is `npm.cmd`), which
/// `CreateProcess` won't resolve directly; routing through the shell makes
/// the probe work for binaries and scripts alike.
#[cfg(windows)]
fn base_command(command: &str) -> Command {
    let shell = std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string());
    let mut cmd = Command::new(shell);
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn base_command(command: &str) -> Command {
    Command::new(command)
}

struct ChildQuery {
    child: Child,
    stdout: Option<ChildStdout>,
}

impl VersionQuery for ChildQuery {
    fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = [0u8; 4096];
        let read = stdout.read(&mut buf)?;
        if read == 0 {
            self.stdout = None;
            return Ok(None);
        }
        Ok(Some(buf[..read].to_vec()))
    }

    fn wait(&mut self) -> io::Result<bool> {
        self.stdout.take();
        Ok(self.child.wait()?.success())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_missing_command_is_an_error() {
        let result = SystemLauncher.spawn("this-command-does-not-exist-12345", &["--version"]);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn spawn_collects_chunks_until_exit() {
        let mut query = SystemLauncher.spawn("echo", &["4.2.0"]).unwrap();

        let mut output = Vec::new();
        while let Some(chunk) = query.next_chunk().unwrap() {
            output.extend_from_slice(&chunk);
        }

        assert!(query.wait().unwrap());
        assert_eq!(String::from_utf8_lossy(&output).trim(), "4.2.0");
    }

    #[cfg(unix)]
    #[test]
    fn wait_reports_failure_exit() {
        let mut query = SystemLauncher.spawn("false", &[]).unwrap();
        while query.next_chunk().unwrap().is_some() {}
        assert!(!query.wait().unwrap());
    }
}
