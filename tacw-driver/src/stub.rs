//! Interpreter-stub emission.
//!
//! For runtime tests the emitted artifact is a short /bin/sh script that
//! re-enters the wrapper binary in interpreter-exec mode, with the whole
//! interpreter invocation embedded as shell-quoted literal argv. Everything
//! is fixed at emission time; nothing is re-resolved when the stub runs.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::cli::CompileRequest;
use crate::config::WrapperConfig;
use crate::interp::{INTERP_EXEC_FLAG, INTERP_FLAG};

/// rwx for the owner, rx for group and other.
const STUB_MODE: u32 = 0o755;

/// The interpreter invocation embedded into the stub: compiler binary,
/// interpret flag, pass-through macros, preprocessed source.
pub fn interpreter_argv(
    config: &WrapperConfig,
    request: &CompileRequest,
    preprocessed: &Path,
) -> Vec<String> {
    let mut argv = Vec::with_capacity(request.pass_through.len() + 3);
    argv.push(config.compiler.display().to_string());
    argv.push(INTERP_FLAG.to_string());
    argv.extend(request.pass_through.iter().cloned());
    argv.push(preprocessed.display().to_string());
    argv
}

/// Render the stub text for a wrapper binary and an embedded argv.
pub fn render_stub(wrapper: &Path, argv: &[String]) -> String {
    let mut line = String::from("exec ");
    line.push_str(&sh_quote(&wrapper.display().to_string()));
    line.push(' ');
    line.push_str(INTERP_EXEC_FLAG);
    for arg in argv {
        line.push(' ');
        line.push_str(&sh_quote(arg));
    }
    format!("#!/bin/sh\n# runs the TAC interpreter and decodes its result into an exit status\n{line}\n")
}

/// Write the stub at `output` and mark it executable for owner, group, other.
pub fn write_exec_stub(output: &Path, wrapper: &Path, argv: &[String]) -> io::Result<()> {
    fs::write(output, render_stub(wrapper, argv))?;
    let mut perms = fs::metadata(output)?.permissions();
    perms.set_mode(STUB_MODE);
    fs::set_permissions(output, perms)
}

/// Quote a string as a single /bin/sh word. Plain path- and macro-shaped
/// words stay unquoted so the stub remains readable.
fn sh_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
