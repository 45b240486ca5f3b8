//! Pipeline orchestration.
//!
//! One invocation runs, strictly in order: environment capture, argument
//! classification, external preprocess, external front-end check, then
//! exactly one of three emitters. Wrapper-local failures carry fixed exit
//! codes; failures of delegated tools propagate their own status so the
//! harness can tell "invalid C program" from "wrapper malfunctioned".

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use log::debug;
use tacw_common::WrapperError;
use which::which;

use crate::cli::{self, CompileRequest};
use crate::command;
use crate::config::WrapperConfig;
use crate::paths;
use crate::stub;

/// Host preprocessor flags: expand only, suppress line markers.
pub const PREPROCESSOR_FLAGS: &[&str] = &["-E", "-P"];

/// Terminal action for one invocation; exactly one emitter runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
    /// Delegate object emission to the host toolchain (`-c` mode). The TAC
    /// compiler has no backend, so this is the only way to produce a
    /// genuinely linkable object.
    Object,
    /// Build a host-native executable for allow-listed slow tests.
    NativeRuntime,
    /// Emit the interpreter-launching stub.
    InterpreterStub,
}

/// Pick the terminal action; the first matching row wins.
pub fn select_strategy(request: &CompileRequest, config: &WrapperConfig) -> BuildStrategy {
    if request.compile_only {
        BuildStrategy::Object
    } else if config.wants_native_runtime(&request.source) {
        BuildStrategy::NativeRuntime
    } else {
        BuildStrategy::InterpreterStub
    }
}

/// Entry point for the gcc facade; returns the process exit code.
pub fn run(argv: &[String]) -> i32 {
    match drive(argv) {
        Ok(status) => status,
        Err(err) => {
            eprintln!("tacw: {err}");
            err.exit_code()
        }
    }
}

/// `Ok(status)` carries a delegated tool's exit status (0 on success);
/// `Err` is a wrapper-local failure with a fixed exit code.
fn drive(argv: &[String]) -> Result<i32, WrapperError> {
    let config = WrapperConfig::from_env()?;
    let request = cli::parse_args(argv)?;
    let preprocessed = paths::preprocessed_path(&request.output);
    debug!(
        "source {} -> output {} (transient {})",
        request.source.display(),
        request.output.display(),
        preprocessed.display()
    );

    let status = preprocess(&config, &request, &preprocessed)?;
    if status != 0 {
        return Ok(status);
    }

    let status = frontend_check(&config, &request, &preprocessed)?;
    if status != 0 {
        return Ok(status);
    }

    let strategy = select_strategy(&request, &config);
    debug!("strategy: {strategy:?}");
    match strategy {
        BuildStrategy::Object => emit_native(&config, &request, &preprocessed, true),
        BuildStrategy::NativeRuntime => emit_native(&config, &request, &preprocessed, false),
        BuildStrategy::InterpreterStub => {
            emit_interpreter_stub(&config, &request, &preprocessed)?;
            Ok(0)
        }
    }
}

/// Expand includes and macros into the transient preprocessed file. Streams
/// are captured and only echoed when the preprocessor fails.
fn preprocess(
    config: &WrapperConfig,
    request: &CompileRequest,
    preprocessed: &Path,
) -> Result<i32, WrapperError> {
    if which(&config.preprocessor).is_err() {
        return Err(WrapperError::PreprocessorMissing {
            command: config.preprocessor.clone(),
        });
    }

    let mut args: Vec<OsString> = PREPROCESSOR_FLAGS.iter().map(OsString::from).collect();
    args.extend(request.pass_through.iter().map(OsString::from));
    args.push(request.source.as_os_str().to_os_string());
    args.push(OsString::from("-o"));
    args.push(preprocessed.as_os_str().to_os_string());
    debug!("preprocess: {} {args:?}", config.preprocessor);

    let result = match command::run_captured(OsStr::new(&config.preprocessor), &args) {
        Ok(result) => result,
        Err(source) => {
            command::remove_path(preprocessed);
            return Err(WrapperError::PreprocessorSpawn {
                command: config.preprocessor.clone(),
                source,
            });
        }
    };
    if !result.success() {
        result.echo();
        command::remove_path(preprocessed);
        return Ok(result.exit_code);
    }
    Ok(0)
}

/// Let the real front-end vet the preprocessed source, streams inherited so
/// its diagnostics reach the harness directly. A non-zero status means the
/// program is invalid C; stray artifacts are removed and the status
/// propagates untouched.
fn frontend_check(
    config: &WrapperConfig,
    request: &CompileRequest,
    preprocessed: &Path,
) -> Result<i32, WrapperError> {
    let mut args: Vec<OsString> = request.pass_through.iter().map(OsString::from).collect();
    args.push(preprocessed.as_os_str().to_os_string());
    debug!("front-end check: {} {args:?}", config.compiler.display());

    let status = match command::run_inherited(config.compiler.as_os_str(), &args) {
        Ok(status) => status,
        Err(source) => {
            command::remove_path(preprocessed);
            return Err(WrapperError::CompilerSpawn {
                path: config.compiler.clone(),
                source,
            });
        }
    };
    if status != 0 {
        command::remove_path(&request.output);
        command::remove_path(&request.output.with_extension("s"));
        command::remove_path(preprocessed);
        return Ok(status);
    }
    Ok(0)
}

/// Object or native-runtime emission via the host toolchain; `compile_only`
/// selects `-c`. The transient file is consumed here on every path.
fn emit_native(
    config: &WrapperConfig,
    request: &CompileRequest,
    preprocessed: &Path,
    compile_only: bool,
) -> Result<i32, WrapperError> {
    let mut args: Vec<OsString> = Vec::new();
    if compile_only {
        args.push(OsString::from("-c"));
    }
    args.push(preprocessed.as_os_str().to_os_string());
    args.push(OsString::from("-o"));
    args.push(request.output.as_os_str().to_os_string());
    debug!("host emission: {} {args:?}", config.preprocessor);

    let result = match command::run_captured(OsStr::new(&config.preprocessor), &args) {
        Ok(result) => result,
        Err(source) => {
            command::remove_path(&request.output);
            command::remove_path(preprocessed);
            return Err(WrapperError::WriteFailed {
                path: request.output.clone(),
                source,
            });
        }
    };
    if !result.success() {
        result.echo();
        command::remove_path(&request.output);
        command::remove_path(preprocessed);
        return Ok(result.exit_code);
    }
    command::remove_path(preprocessed);
    Ok(0)
}

/// Emit the interpreter stub. On success the preprocessed file stays behind
/// as the stub's input; the harness cleans it up with the other artifacts.
fn emit_interpreter_stub(
    config: &WrapperConfig,
    request: &CompileRequest,
    preprocessed: &Path,
) -> Result<(), WrapperError> {
    let wrapper = match env::current_exe() {
        Ok(path) => path,
        Err(source) => {
            command::remove_path(preprocessed);
            return Err(WrapperError::WriteFailed {
                path: request.output.clone(),
                source,
            });
        }
    };
    let argv = stub::interpreter_argv(config, request, preprocessed);
    debug!("interpreter stub: {} <- {argv:?}", request.output.display());

    if let Err(source) = stub::write_exec_stub(&request.output, &wrapper, &argv) {
        command::remove_path(&request.output);
        command::remove_path(preprocessed);
        return Err(WrapperError::WriteFailed {
            path: request.output.clone(),
            source,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request(name: &str, compile_only: bool) -> CompileRequest {
        let source = PathBuf::from("/t").join(name);
        CompileRequest {
            output: paths::derive_output_path(&source, compile_only),
            source,
            pass_through: Vec::new(),
            compile_only,
        }
    }

    fn config(native_slow_runtime: bool) -> WrapperConfig {
        WrapperConfig {
            compiler: PathBuf::from("/opt/bcc"),
            preprocessor: "gcc".to_string(),
            native_slow_runtime,
        }
    }

    #[test]
    fn test_compile_only_always_emits_an_object() {
        let strategy = select_strategy(&request("empty_loop_body.c", true), &config(true));
        assert_eq!(strategy, BuildStrategy::Object);
    }

    #[test]
    fn test_slow_test_with_toggle_goes_native() {
        let strategy = select_strategy(&request("empty_loop_body.c", false), &config(true));
        assert_eq!(strategy, BuildStrategy::NativeRuntime);
    }

    #[test]
    fn test_slow_test_without_toggle_stays_interpreted() {
        let strategy = select_strategy(&request("empty_loop_body.c", false), &config(false));
        assert_eq!(strategy, BuildStrategy::InterpreterStub);
    }

    #[test]
    fn test_ordinary_source_gets_a_stub() {
        let strategy = select_strategy(&request("foo.c", false), &config(true));
        assert_eq!(strategy, BuildStrategy::InterpreterStub);
    }
}
