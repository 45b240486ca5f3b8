//! Exit-code protocol for interpreter-backed executables.
//!
//! Runtime tests are handed back to the harness as a stub that re-enters the
//! wrapper binary in interpreter-exec mode with the interpreter invocation
//! embedded at build time. This module is that mode: it runs the interpreter
//! with the result-on-stderr envelope requested, decodes the envelope, and
//! re-encodes the interpreted program's `main` return value as a
//! conventional process exit status.

use std::process::Command;

/// argv[1] marker selecting interpreter-exec mode instead of the gcc facade.
pub const INTERP_EXEC_FLAG: &str = "--interp-exec";

/// Tells the TAC compiler to interpret the program instead of just checking it.
pub const INTERP_FLAG: &str = "-interp";

/// Set for the interpreter subprocess; the compiler then reports the
/// program's return value as the final line of stderr.
pub const RESULT_ENV: &str = "DIOPTASE_TACC_RESULT_STDERR";

/// Exit status when the interpreter's result cannot be decoded.
pub const EXIT_PROTOCOL_FAILURE: i32 = 1;

/// Conventional 8-bit truncation of the interpreted `main`'s return value.
pub const EXIT_CODE_MASK: i64 = 0xFF;

/// Decoded interpreter stderr under the result-on-stderr envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterReply {
    /// The final line carried the program's return value; any earlier lines
    /// are the program's own diagnostics.
    Exit {
        status: i32,
        diagnostics: Vec<String>,
    },
    /// The interpreter exited 0 without writing anything to stderr.
    NoResult,
    /// The final stderr line did not parse as an integer.
    Malformed { raw: String },
}

/// Decode the interpreter's captured stderr.
///
/// The envelope shares one stream with the program's own diagnostics, so a
/// program whose final stderr line happens to be an integer cannot be told
/// apart from the result marker. That ambiguity is inherent to the protocol
/// and confined to this function.
pub fn decode_reply(stderr: &str) -> InterpreterReply {
    let lines: Vec<&str> = stderr.lines().collect();
    let Some((last, rest)) = lines.split_last() else {
        return InterpreterReply::NoResult;
    };
    match last.trim().parse::<i64>() {
        Ok(value) => InterpreterReply::Exit {
            status: (value & EXIT_CODE_MASK) as i32,
            diagnostics: rest.iter().map(|line| (*line).to_string()).collect(),
        },
        Err(_) => InterpreterReply::Malformed {
            raw: stderr.to_string(),
        },
    }
}

/// Run the embedded interpreter invocation and translate its result into the
/// process exit code the harness expects.
pub fn run_embedded(argv: &[String]) -> i32 {
    let Some((program, args)) = argv.split_first() else {
        eprintln!("tacw: interpreter mode invoked without a command");
        return EXIT_PROTOCOL_FAILURE;
    };
    let output = match Command::new(program)
        .args(args)
        .env(RESULT_ENV, "1")
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            eprintln!("tacw: failed to run TAC interpreter '{program}': {err}");
            return EXIT_PROTOCOL_FAILURE;
        }
    };
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    // A failing interpreter is reported as-is; only a clean exit carries the
    // result envelope.
    if !output.status.success() {
        print!("{stdout}");
        eprint!("{stderr}");
        return output.status.code().unwrap_or(-1);
    }

    match decode_reply(&stderr) {
        InterpreterReply::Exit {
            status,
            diagnostics,
        } => {
            if !diagnostics.is_empty() {
                eprintln!("{}", diagnostics.join("\n"));
            }
            print!("{stdout}");
            status
        }
        InterpreterReply::NoResult => {
            print!("{stdout}");
            eprintln!("TAC interpreter produced no result");
            EXIT_PROTOCOL_FAILURE
        }
        InterpreterReply::Malformed { raw } => {
            print!("{stdout}");
            eprintln!("invalid TAC interpreter output: {raw:?}");
            EXIT_PROTOCOL_FAILURE
        }
    }
}
