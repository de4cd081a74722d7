//! Expectation module
//! Determine which verdict a fixture is expected to produce, either from a recorded table or by
//! mining the free-text headers of its circuit files.

pub mod header_heuristic;
mod resolver;

pub use resolver::{ExpectationPolicy, ExpectationTable};
