//! TAC Compiler Wrapper
//!
//! Presents a gcc-compatible command line to the Writing-a-C-Compiler test
//! harness while delegating the real work to the Dioptase TAC compiler,
//! whose three-address code runs under an interpreter instead of producing
//! a native executable. The wrapper preprocesses the source with a host
//! preprocessor, lets the real front-end vet it, then emits either a host
//! object file, a host-native executable, or a stub that launches the
//! interpreter and re-encodes its result as a process exit status.

pub mod cli;
pub mod command;
pub mod config;
pub mod interp;
pub mod paths;
pub mod runner;
pub mod stub;
