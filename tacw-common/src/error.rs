//! Error handling for the TAC compiler wrapper
//!
//! Every failure the wrapper detects itself maps to a fixed exit code so the
//! calling harness can tell a misconfigured wrapper apart from a rejected
//! test program. Failures of delegated tools (preprocessor, front-end
//! compiler, host toolchain) are not represented here; their exit statuses
//! are propagated unchanged by the driver.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed invocation: missing source, missing `-o` value, duplicate sources.
pub const EXIT_USAGE: i32 = 64;
/// A flag this backend cannot honor (stop-after-stage modes and unknown options).
pub const EXIT_UNSUPPORTED: i32 = 65;
/// Filesystem error while emitting the final artifact.
pub const EXIT_WRITE_FAILED: i32 = 66;
/// The host preprocessor could not be located or executed at all.
pub const EXIT_PREPROCESS_FAILED: i32 = 67;
/// The wrapper's own environment is unusable (compiler path unset or bad).
pub const EXIT_CONFIG: i32 = 78;

/// Wrapper-local failures, each tied to one of the fixed exit codes above.
#[derive(Error, Debug)]
pub enum WrapperError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),

    #[error("unsupported compiler option for the TAC runner: {0}")]
    Unsupported(String),

    #[error("preprocessor '{command}' was not found in PATH")]
    PreprocessorMissing { command: String },

    #[error("failed to run preprocessor '{command}': {source}")]
    PreprocessorSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to run compiler {path}: {source}")]
    CompilerSpawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write executable {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WrapperError {
    /// The process exit code the driver reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            WrapperError::Config(_) | WrapperError::CompilerSpawn { .. } => EXIT_CONFIG,
            WrapperError::Usage(_) => EXIT_USAGE,
            WrapperError::Unsupported(_) => EXIT_UNSUPPORTED,
            WrapperError::PreprocessorMissing { .. } | WrapperError::PreprocessorSpawn { .. } => {
                EXIT_PREPROCESS_FAILED
            }
            WrapperError::WriteFailed { .. } => EXIT_WRITE_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_below_128() {
        let codes = [
            EXIT_USAGE,
            EXIT_UNSUPPORTED,
            EXIT_WRITE_FAILED,
            EXIT_PREPROCESS_FAILED,
            EXIT_CONFIG,
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!(*a > 0 && *a < 128);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_variant_code_mapping() {
        assert_eq!(
            WrapperError::Usage("no source file provided".into()).exit_code(),
            EXIT_USAGE
        );
        assert_eq!(
            WrapperError::Unsupported("-S".into()).exit_code(),
            EXIT_UNSUPPORTED
        );
        assert_eq!(
            WrapperError::PreprocessorMissing {
                command: "gcc".into()
            }
            .exit_code(),
            EXIT_PREPROCESS_FAILED
        );
        assert_eq!(
            WrapperError::Config("DIOPTASE_BCC is not set".into()).exit_code(),
            EXIT_CONFIG
        );
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            WrapperError::WriteFailed {
                path: PathBuf::from("/tmp/out"),
                source: io_err,
            }
            .exit_code(),
            EXIT_WRITE_FAILED
        );
    }

    #[test]
    fn test_unsupported_message_names_the_flag() {
        let err = WrapperError::Unsupported("--tacky".to_string());
        assert_eq!(
            err.to_string(),
            "unsupported compiler option for the TAC runner: --tacky"
        );
    }

    #[test]
    fn test_write_failed_message_names_the_path() {
        let err = WrapperError::WriteFailed {
            path: PathBuf::from("/tmp/case"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("/tmp/case"));
        assert!(rendered.contains("disk full"));
    }
}
