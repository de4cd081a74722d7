#![warn(missing_docs)]
//! Regression harness of the gate-level Verilog equivalence checker.
//!
//! The checker is an external binary: this crate builds it, runs it on fixed groups of circuit
//! pairs, classifies each verdict from its stdout, compares it with the expected verdict
//! (recorded or mined from the circuit headers) and reports the mismatches.

/// Archiving of the checker byproducts left in the working directory.
pub mod archiver;
/// Sequential execution of fixture groups.
pub mod batch_runner;
/// Harness configuration and its defaults.
pub mod configuration;
pub mod entities;
mod error;
pub mod expectation;
pub mod fixtures_catalog;
mod regression_spec;
/// Batch tables, mismatch list and run summary.
pub mod reporter;
mod run_context;
#[cfg(test)]
mod test_tools;
/// Process running and file helpers.
pub mod utils;
/// Checker stdout classification.
pub mod verdict_classifier;

pub use error::HarnessError;
pub use regression_spec::RegressionSpec;
pub use run_context::{BuildSteps, RunContext};

/// Generic error type
pub type StdError = anyhow::Error;

/// Generic result type
pub type StdResult<T> = anyhow::Result<T, StdError>;
