//! Invocation configuration captured from the environment.
//!
//! Every environment lookup happens exactly once, up front, through an
//! injectable lookup function; the resulting `WrapperConfig` is threaded
//! through the pipeline as a plain parameter.

use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tacw_common::WrapperError;

use crate::paths;

/// Required: path to the real TAC compiler binary.
pub const COMPILER_ENV: &str = "DIOPTASE_BCC";

/// Optional override for the host gcc-compatible preprocessor command.
pub const PREPROCESSOR_ENV: &str = "DIOPTASE_GCC";

pub const DEFAULT_PREPROCESSOR: &str = "gcc";

/// Any non-blank value redirects allow-listed slow tests to host-native
/// execution instead of the interpreter.
pub const SLOW_RUNTIME_ENV: &str = "DIOPTASE_TACC_GCC_RUNTIME";

/// Runtime tests known to exceed practical interpretation time.
pub const SLOW_RUNTIME_TESTS: &[&str] = &["empty_loop_body.c", "test_for_memory_leaks.c"];

/// Configuration for one wrapper invocation.
#[derive(Debug, Clone)]
pub struct WrapperConfig {
    /// Absolute path to the TAC compiler binary, validated as executable.
    pub compiler: PathBuf,
    /// Host preprocessor command; also serves as the host toolchain driver.
    pub preprocessor: String,
    /// Slow-test redirection toggle.
    pub native_slow_runtime: bool,
}

impl WrapperConfig {
    pub fn from_env() -> Result<Self, WrapperError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Capture the configuration from an arbitrary lookup, so tests can
    /// inject values without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WrapperError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let compiler = resolve_compiler(lookup(COMPILER_ENV))?;
        let preprocessor = match lookup(PREPROCESSOR_ENV) {
            Some(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => DEFAULT_PREPROCESSOR.to_string(),
        };
        let native_slow_runtime =
            lookup(SLOW_RUNTIME_ENV).is_some_and(|value| !value.trim().is_empty());
        Ok(Self {
            compiler,
            preprocessor,
            native_slow_runtime,
        })
    }

    /// True when this source should run host-native instead of interpreted.
    pub fn wants_native_runtime(&self, source: &Path) -> bool {
        self.native_slow_runtime
            && source
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SLOW_RUNTIME_TESTS.contains(&name))
    }
}

fn resolve_compiler(raw: Option<String>) -> Result<PathBuf, WrapperError> {
    let raw = raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            WrapperError::Config(format!(
                "{COMPILER_ENV} is not set; set it to the path of the TAC compiler binary"
            ))
        })?;
    let path = paths::absolutize(Path::new(&raw));
    if !path.exists() {
        return Err(WrapperError::Config(format!(
            "{COMPILER_ENV} points to missing compiler binary: {}",
            path.display()
        )));
    }
    if !is_executable(&path) {
        return Err(WrapperError::Config(format!(
            "{COMPILER_ENV} compiler binary is not executable: {}",
            path.display()
        )));
    }
    Ok(path)
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
