use serde::Serialize;
use std::path::PathBuf;

use crate::entities::{BatchReport, ResultRow};

const NAME_HEADER: &str = "test";
const RESULT_HEADER: &str = "result";
const EXPECTED_HEADER: &str = "expected result";

/// Render the `name | result | expected result` table of a batch.
///
/// Each column is as wide as its longest value across the rows of the batch, headers are not
/// taken into account and may overflow their column.
pub fn render_batch_table(report: &BatchReport) -> String {
    let cells: Vec<[String; 3]> = report
        .rows
        .iter()
        .map(|row| {
            [
                row.fixture_name.clone(),
                row.outcome.to_string(),
                row.expectation.to_string(),
            ]
        })
        .collect();
    let width = |column: usize| {
        cells
            .iter()
            .map(|row| row[column].len())
            .max()
            .unwrap_or_default()
    };
    let (name_w, result_w, expected_w) = (width(0), width(1), width(2));

    let mut lines = vec![
        format!("==================== {} ====================", report.title),
        format!("{NAME_HEADER:<name_w$} | {RESULT_HEADER:<result_w$} | {EXPECTED_HEADER:<expected_w$}"),
        format!(
            "{} | {} | {}",
            "-".repeat(name_w),
            "-".repeat(result_w),
            "-".repeat(expected_w)
        ),
    ];
    lines.extend(cells.iter().map(|[name, result, expected]| {
        format!("{name:<name_w$} | {result:<result_w$} | {expected:<expected_w$}")
    }));

    lines.join("\n")
}

/// Render the flat list of mismatches, empty if there is none.
pub fn render_mismatches(mismatches: &[&ResultRow]) -> String {
    if mismatches.is_empty() {
        return String::new();
    }

    let mut lines = vec!["Expected-result mismatches:".to_string()];
    lines.extend(mismatches.iter().map(|row| {
        format!(
            "- {}: got {}, expected {}",
            row.fixture_name, row.outcome, row.expectation
        )
    }));

    lines.join("\n")
}

/// Machine readable summary of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// One report per fixture group, in run order
    pub batches: Vec<BatchReport>,

    /// Mismatches of all the batches
    pub mismatches: Vec<ResultRow>,

    /// Where the byproducts of the run were archived
    pub archive_directory: Option<PathBuf>,
}

impl RunSummary {
    /// Build the summary of the given batches
    pub fn new(batches: Vec<BatchReport>, archive_directory: Option<PathBuf>) -> Self {
        let mismatches = batches
            .iter()
            .flat_map(|batch| batch.mismatches())
            .cloned()
            .collect();

        Self {
            batches,
            mismatches,
            archive_directory,
        }
    }

    /// `true` if at least one fixture disagreed with its expectation
    pub fn has_mismatches(&self) -> bool {
        !self.mismatches.is_empty()
    }

    /// Human readable rendering: every batch table followed by the mismatch list.
    pub fn render_text(&self) -> String {
        let mut sections: Vec<String> = self.batches.iter().map(render_batch_table).collect();
        let mismatches: Vec<&ResultRow> = self.mismatches.iter().collect();
        if !mismatches.is_empty() {
            sections.push(render_mismatches(&mismatches));
        }

        sections
            .into_iter()
            .map(|section| format!("\n{section}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
