//! gcc-compatible argument classification.
//!
//! The harness invokes the wrapper exactly like gcc, so the argument vector
//! is classified token by token, left to right, first matching rule wins.
//! Anything the TAC backend cannot honor is rejected up front, before any
//! file is touched.

use std::path::{Path, PathBuf};

use log::warn;
use tacw_common::WrapperError;

use crate::paths;

/// Linker flags accepted for gcc compatibility and dropped; the TAC backend
/// has no link step.
pub const IGNORED_FLAGS: &[&str] = &["-lm"];

/// Stop-after-stage modes the TAC backend cannot emulate.
pub const UNSUPPORTED_FLAGS: &[&str] =
    &["-S", "--lex", "--parse", "--validate", "--tacky", "--codegen"];

/// Macro definitions are forwarded verbatim to the preprocessor and compiler.
pub const MACRO_PREFIX: &str = "-D";

/// A classified wrapper invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// The single C source file under test.
    pub source: PathBuf,
    /// Where the emitted artifact goes.
    pub output: PathBuf,
    /// `-D` tokens in input order.
    pub pass_through: Vec<String>,
    /// `-c` was given; emit an object instead of an executable.
    pub compile_only: bool,
}

/// Classify a gcc-style argument vector (program name excluded).
pub fn parse_args(argv: &[String]) -> Result<CompileRequest, WrapperError> {
    let mut source: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut pass_through: Vec<String> = Vec::new();
    let mut compile_only = false;

    let mut tokens = argv.iter();
    while let Some(arg) = tokens.next() {
        if arg == "-c" {
            compile_only = true;
            continue;
        }
        if arg == "-o" {
            let value = tokens.next().ok_or_else(|| {
                WrapperError::Usage("missing output path after -o".to_string())
            })?;
            output = Some(paths::absolutize(Path::new(value)));
            continue;
        }
        if UNSUPPORTED_FLAGS.contains(&arg.as_str()) {
            return Err(WrapperError::Unsupported(arg.clone()));
        }
        if IGNORED_FLAGS.contains(&arg.as_str()) {
            warn!("ignoring flag {arg}");
            continue;
        }
        if arg.starts_with(MACRO_PREFIX) {
            pass_through.push(arg.clone());
            continue;
        }
        if arg.starts_with('-') {
            return Err(WrapperError::Unsupported(arg.clone()));
        }
        if source.is_some() {
            return Err(WrapperError::Usage(
                "multiple source files are not supported by the TAC runner".to_string(),
            ));
        }
        source = Some(paths::absolutize(Path::new(arg)));
    }

    let source = source.ok_or_else(|| {
        WrapperError::Usage("no source file provided to the TAC compiler wrapper".to_string())
    })?;
    let output = match output {
        Some(path) => path,
        None => paths::derive_output_path(&source, compile_only),
    };

    Ok(CompileRequest {
        source,
        output,
        pass_through,
        compile_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacw_common::{EXIT_UNSUPPORTED, EXIT_USAGE};

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_plain_source_derives_extensionless_output() {
        let request = parse_args(&args(&["/tests/foo.c"])).unwrap();
        assert_eq!(request.source, PathBuf::from("/tests/foo.c"));
        assert_eq!(request.output, PathBuf::from("/tests/foo"));
        assert!(!request.compile_only);
        assert!(request.pass_through.is_empty());
    }

    #[test]
    fn test_compile_only_derives_object_output() {
        let request = parse_args(&args(&["-c", "/tests/foo.c"])).unwrap();
        assert!(request.compile_only);
        assert_eq!(request.output, PathBuf::from("/tests/foo.o"));
    }

    #[test]
    fn test_explicit_output_wins_over_derivation() {
        let request = parse_args(&args(&["/tests/foo.c", "-o", "/tests/bar"])).unwrap();
        assert_eq!(request.output, PathBuf::from("/tests/bar"));
    }

    #[test]
    fn test_compile_only_after_source_still_applies() {
        let request = parse_args(&args(&["/tests/foo.c", "-c"])).unwrap();
        assert!(request.compile_only);
        assert_eq!(request.output, PathBuf::from("/tests/foo.o"));
    }

    #[test]
    fn test_missing_output_value_is_usage_error() {
        let err = parse_args(&args(&["/tests/foo.c", "-o"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn test_no_source_is_usage_error() {
        let err = parse_args(&args(&["-c"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn test_two_sources_is_usage_error() {
        let err = parse_args(&args(&["/tests/foo.c", "/tests/bar.c"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(err.to_string().contains("multiple source files"));
    }

    #[test]
    fn test_unsupported_flags_rejected_in_any_position() {
        for flag in UNSUPPORTED_FLAGS {
            let before = parse_args(&args(&[flag, "/tests/foo.c"])).unwrap_err();
            assert_eq!(before.exit_code(), EXIT_UNSUPPORTED, "{flag}");
            let after = parse_args(&args(&["/tests/foo.c", flag])).unwrap_err();
            assert_eq!(after.exit_code(), EXIT_UNSUPPORTED, "{flag}");
        }
    }

    #[test]
    fn test_unknown_flag_is_unsupported() {
        let err = parse_args(&args(&["/tests/foo.c", "-fPIC"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_UNSUPPORTED);
        assert!(err.to_string().contains("-fPIC"));
    }

    #[test]
    fn test_ignored_flag_is_dropped() {
        let request = parse_args(&args(&["/tests/foo.c", "-lm"])).unwrap();
        assert!(request.pass_through.is_empty());
    }

    #[test]
    fn test_other_library_flags_are_not_ignored() {
        let err = parse_args(&args(&["/tests/foo.c", "-lpthread"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_UNSUPPORTED);
    }

    #[test]
    fn test_defines_pass_through_in_order() {
        let request = parse_args(&args(&[
            "-DFIRST",
            "/tests/foo.c",
            "-DSECOND=2",
            "-DTHIRD=a b",
        ]))
        .unwrap();
        assert_eq!(request.pass_through, vec!["-DFIRST", "-DSECOND=2", "-DTHIRD=a b"]);
    }
}
