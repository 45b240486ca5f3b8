//! Synchronous subprocess execution for external toolchain invocations.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

/// Result of running an external tool with captured streams.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit status; -1 when the tool died without one (killed by a signal).
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Echo the captured streams onto the wrapper's own streams.
    pub fn echo(&self) {
        print!("{}", self.stdout);
        eprint!("{}", self.stderr);
    }
}

/// Run a command to completion with stdout and stderr captured.
pub fn run_captured(program: &OsStr, args: &[OsString]) -> io::Result<CommandResult> {
    let output = Command::new(program).args(args).output()?;
    Ok(CommandResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run a command with the wrapper's streams inherited, returning its status.
pub fn run_inherited(program: &OsStr, args: &[OsString]) -> io::Result<i32> {
    let status = Command::new(program).args(args).status()?;
    Ok(status.code().unwrap_or(-1))
}

/// Remove a file or symlink if present. Directories are left alone and
/// removal errors are ignored; this only keeps artifact paths tidy.
pub fn remove_path(path: &Path) {
    if let Ok(meta) = fs::symlink_metadata(path) {
        if meta.is_file() || meta.file_type().is_symlink() {
            let _ = fs::remove_file(path);
        }
    }
}
