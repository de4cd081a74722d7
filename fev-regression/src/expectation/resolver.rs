use slog_scope::debug;
use std::collections::HashMap;

use crate::entities::{Expectation, Fixture};
use crate::expectation::header_heuristic;

/// Fixed mapping from fixture name to its recorded expectation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationTable {
    entries: HashMap<String, Expectation>,
}

impl ExpectationTable {
    /// Build a table from `(fixture name, expectation)` entries
    pub fn from_entries(entries: &[(&str, Expectation)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(name, expectation)| (name.to_string(), *expectation))
                .collect(),
        }
    }

    /// Recorded expectation of the fixture, [Expectation::Unknown] if it has no entry.
    pub fn lookup(&self, fixture_name: &str) -> Expectation {
        self.entries
            .get(fixture_name)
            .copied()
            .unwrap_or(Expectation::Unknown)
    }
}

/// How a fixture group determines the expected verdict of its fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationPolicy {
    table: Option<ExpectationTable>,
    use_headers: bool,
}

impl ExpectationPolicy {
    /// Only the recorded table is consulted.
    pub fn table_only(table: ExpectationTable) -> Self {
        Self {
            table: Some(table),
            use_headers: false,
        }
    }

    /// Fixture headers are mined first, the recorded table is the fallback when they say
    /// nothing conclusive.
    pub fn headers_then_table(table: ExpectationTable) -> Self {
        Self {
            table: Some(table),
            use_headers: true,
        }
    }

    /// Only fixture headers are mined.
    pub fn headers_only() -> Self {
        Self {
            table: None,
            use_headers: true,
        }
    }

    /// `true` if fixture headers are mined for this policy
    pub fn uses_headers(&self) -> bool {
        self.use_headers
    }

    /// Resolve the expectation of the given fixture.
    pub async fn resolve(&self, fixture: &Fixture) -> Expectation {
        let mut expectation = Expectation::Unknown;

        if self.use_headers {
            let text = header_heuristic::collect_header_text(&fixture.circuit_files()).await;
            expectation = header_heuristic::infer_expectation(&text);
            debug!("Expectation inferred from fixture headers"; "fixture" => &fixture.name, "expectation" => %expectation);
        }

        if !expectation.is_known() {
            if let Some(table) = &self.table {
                expectation = table.lookup(&fixture.name);
            }
        }

        expectation
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use crate::entities::CircuitSide;
    use crate::test_tools::TempDir;

    use super::*;

    fn fixture_in(dir: &Path, name: &str, spec_header: &str, impl_header: &str) -> Fixture {
        let spec = dir.join("spec.v");
        let implementation = dir.join("impl.v");
        fs::write(&spec, spec_header).unwrap();
        fs::write(&implementation, impl_header).unwrap();

        Fixture::new(
            name,
            CircuitSide::new("Spec", dir.join("stdcell.v"), spec),
            CircuitSide::new("Impl", dir.join("stdcell.v"), implementation),
        )
    }

    fn table() -> ExpectationTable {
        ExpectationTable::from_entries(&[
            ("c1355 vs c1356", Expectation::NotSatisfiable),
            ("c0409 vs c0410", Expectation::Satisfiable),
        ])
    }

    #[test]
    fn table_lookup_miss_is_unknown() {
        assert_eq!(Expectation::Satisfiable, table().lookup("c0409 vs c0410"));
        assert_eq!(Expectation::Unknown, table().lookup("c9999 vs c9998"));
    }

    #[tokio::test]
    async fn table_only_policy_ignores_header_text() {
        let dir = TempDir::create("resolver", "table_only_policy_ignores_header_text");
        let fixture = fixture_in(&dir, "c1355 vs c1356", "// SAT", "// different from spec");

        let expectation = ExpectationPolicy::table_only(table()).resolve(&fixture).await;

        assert_eq!(Expectation::NotSatisfiable, expectation);
    }

    #[tokio::test]
    async fn headers_win_over_table_when_conclusive() {
        let dir = TempDir::create("resolver", "headers_win_over_table_when_conclusive");
        let fixture = fixture_in(&dir, "c1355 vs c1356", "// Expected: SAT", "");

        let expectation = ExpectationPolicy::headers_then_table(table())
            .resolve(&fixture)
            .await;

        assert_eq!(Expectation::Satisfiable, expectation);
    }

    #[tokio::test]
    async fn table_is_the_fallback_of_inconclusive_headers() {
        let dir = TempDir::create("resolver", "table_is_the_fallback_of_inconclusive_headers");
        let fixture = fixture_in(&dir, "c1355 vs c1356", "module A;", "module B;");

        let expectation = ExpectationPolicy::headers_then_table(table())
            .resolve(&fixture)
            .await;

        assert_eq!(Expectation::NotSatisfiable, expectation);
    }

    #[tokio::test]
    async fn headers_without_table_may_stay_unknown() {
        let dir = TempDir::create("resolver", "headers_without_table_may_stay_unknown");
        let fixture = fixture_in(&dir, "c1355 vs c1356", "module A;", "module B;");

        let expectation = ExpectationPolicy::headers_only().resolve(&fixture).await;

        assert_eq!(Expectation::Unknown, expectation);
    }

    #[tokio::test]
    async fn untabled_fixture_with_non_equivalence_header_is_satisfiable() {
        let dir = TempDir::create(
            "resolver",
            "untabled_fixture_with_non_equivalence_header_is_satisfiable",
        );
        let fixture = fixture_in(
            &dir,
            "test9990 vs test9991",
            "// test9990: reference adder",
            "// This adder is NOT equivalent to test9990",
        );

        let expectation = ExpectationPolicy::headers_then_table(table())
            .resolve(&fixture)
            .await;

        assert_eq!(Expectation::Satisfiable, expectation);
    }

    #[tokio::test]
    async fn hint_past_the_header_of_a_carriage_return_file_is_ignored() {
        let dir = TempDir::create(
            "resolver",
            "hint_past_the_header_of_a_carriage_return_file_is_ignored",
        );
        let mut spec_lines: Vec<String> = (0..60).map(|i| format!("wire w{i};")).collect();
        spec_lines.push("// sat".to_string());
        let fixture = fixture_in(&dir, "c0499 vs c1355", &spec_lines.join("\r"), "module B;");

        let expectation = ExpectationPolicy::headers_only().resolve(&fixture).await;

        assert_eq!(Expectation::Unknown, expectation);
    }
}
