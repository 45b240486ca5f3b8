//! TAC Compiler Wrapper - Common Types
//!
//! Shared error taxonomy and process exit codes used by the wrapper driver.

pub mod error;

pub use error::{
    WrapperError, EXIT_CONFIG, EXIT_PREPROCESS_FAILED, EXIT_UNSUPPORTED, EXIT_USAGE,
    EXIT_WRITE_FAILED,
};
