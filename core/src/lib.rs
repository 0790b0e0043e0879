//! Generates `fff.h` fakes for the functions of a scanned C header.
//!
//! The input is a [ScanResult] (produced by the `c_ast` scanner or loaded from JSON). The output
//! is C text written to any [std::io::Write] sink, either as a bare list of fakes or wrapped in an
//! include-guarded header. See [generate].

pub mod config;
pub mod emit;
mod error;
pub mod generator;
pub mod guard;
mod model;
pub mod test_util;

pub use error::GenerateError;
pub use generator::{GenerateOptions, GuardedOptions, Strategy, generate, generate_with};
pub use model::{Declaration, Definition, Parameter, ScanResult, VOID};
