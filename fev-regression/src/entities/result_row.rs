use serde::Serialize;

use crate::entities::{Expectation, Outcome};

/// Result of one fixture run: what the checker said and what was expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    /// Name of the fixture
    pub fixture_name: String,

    /// Verdict classified from the checker output
    pub outcome: Outcome,

    /// Verdict resolved for the fixture
    pub expectation: Expectation,
}

impl ResultRow {
    /// [ResultRow] factory
    pub fn new<T: Into<String>>(fixture_name: T, outcome: Outcome, expectation: Expectation) -> Self {
        Self {
            fixture_name: fixture_name.into(),
            outcome,
            expectation,
        }
    }

    /// A row is a mismatch when a known expectation disagrees with the outcome.
    pub fn is_mismatch(&self) -> bool {
        self.expectation.is_contradicted_by(self.outcome)
    }
}

/// All the rows produced by running one fixture group, in fixture order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Name of the fixture group
    pub group_name: String,

    /// Title of the report
    pub title: String,

    /// One row per fixture
    pub rows: Vec<ResultRow>,
}

impl BatchReport {
    /// Create an empty report for the given group
    pub fn new<T: Into<String>>(group_name: T, title: T) -> Self {
        Self {
            group_name: group_name.into(),
            title: title.into(),
            rows: vec![],
        }
    }

    /// Append a row to the report
    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    /// Rows whose outcome contradicts their expectation
    pub fn mismatches(&self) -> Vec<&ResultRow> {
        self.rows.iter().filter(|row| row.is_mismatch()).collect()
    }
}
