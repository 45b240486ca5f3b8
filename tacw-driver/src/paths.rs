//! Derived-path rules for wrapper artifacts.

use std::env;
use std::path::{Path, PathBuf};

/// Make a harness-supplied path absolute against the current directory.
///
/// The path does not need to exist and symlinks are left alone, so this is
/// safe for output paths that have not been created yet.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// Default output path when `-o` is absent: the source with its extension
/// replaced by `.o` in compile-only mode, or stripped entirely otherwise.
pub fn derive_output_path(source: &Path, compile_only: bool) -> PathBuf {
    if compile_only {
        source.with_extension("o")
    } else {
        source.with_extension("")
    }
}

/// On-disk location of the transient preprocessed source: the output path
/// with `.i` appended to its file name (`foo` -> `foo.i`, `foo.o` -> `foo.o.i`).
pub fn preprocessed_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".i");
    output.with_file_name(name)
}
