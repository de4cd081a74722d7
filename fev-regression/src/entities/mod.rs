//! Entities module
//! This module holds the types shared by the runner, the resolver and the reporter.

mod fixture;
mod result_row;
mod verdict;

pub use fixture::{CircuitSide, Fixture, FixtureGroup};
pub use result_row::{BatchReport, ResultRow};
pub use verdict::{Expectation, Outcome};
