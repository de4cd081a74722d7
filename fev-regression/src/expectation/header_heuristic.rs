//! Expected verdict mined from the free-text header of the circuit files.

use slog_scope::debug;
use std::path::Path;

use crate::entities::Expectation;
use crate::utils::file_utils;

/// Number of lines read at the top of each circuit file.
pub const HEADER_LINES: usize = 50;

const NOT_SATISFIABLE_HINTS: [&str; 2] = ["unsat", "not satisfiable"];
const NON_EQUIVALENCE_HINTS: [&str; 4] = [
    "non-equivalent",
    "not equivalent",
    "not be equivalent",
    "different from",
];
const SATISFIABLE_HINTS: [&str; 2] = ["sat", "satisfiable"];
const EQUIVALENCE_HINT: &str = "equivalent";

/// Collect the lowercased header text of the given files.
///
/// At most [HEADER_LINES] lines are read from each file. A file that can't be read contributes
/// nothing.
pub async fn collect_header_text(paths: &[&Path]) -> String {
    let mut headers = Vec::with_capacity(paths.len());
    for path in paths {
        match file_utils::read_head_lines(path, HEADER_LINES).await {
            Ok(header) => headers.push(header.to_lowercase()),
            Err(error) => {
                debug!("Skipping unreadable fixture header"; "path" => %path.display(), "error" => ?error);
            }
        }
    }

    headers.join("\n")
}

/// Infer the intended verdict from free-text fixture headers.
///
/// Rules are applied in order, the first one that matches wins:
/// 1. `unsat` or `not satisfiable` => not satisfiable
/// 2. a non-equivalence phrase => satisfiable (the difference shows as a satisfying input)
/// 3. `sat` or `satisfiable` => satisfiable
/// 4. `equivalent` => not satisfiable
/// 5. otherwise unknown
///
/// `sat` is a substring of both `unsat` and `not satisfiable`, so rule 1 must run before rule 3.
pub fn infer_expectation(text: &str) -> Expectation {
    let text = text.to_lowercase();
    let mentions_any = |hints: &[&str]| hints.iter().any(|hint| text.contains(hint));

    if mentions_any(&NOT_SATISFIABLE_HINTS) {
        Expectation::NotSatisfiable
    } else if mentions_any(&NON_EQUIVALENCE_HINTS) {
        Expectation::Satisfiable
    } else if mentions_any(&SATISFIABLE_HINTS) {
        Expectation::Satisfiable
    } else if text.contains(EQUIVALENCE_HINT) {
        Expectation::NotSatisfiable
    } else {
        Expectation::Unknown
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::test_tools::TempDir;

    use super::*;

    #[test]
    fn unsat_hint_gives_not_satisfiable() {
        assert_eq!(
            Expectation::NotSatisfiable,
            infer_expectation("// expected result: UNSAT")
        );
    }

    #[test]
    fn not_satisfiable_never_resolves_to_satisfiable() {
        assert_eq!(
            Expectation::NotSatisfiable,
            infer_expectation("// the miter should be not satisfiable")
        );
        assert_eq!(
            Expectation::NotSatisfiable,
            infer_expectation("// satisfiable? no: not satisfiable, these are not equivalent")
        );
    }

    #[test]
    fn non_equivalence_phrases_give_satisfiable() {
        for text in [
            "// these circuits are non-equivalent",
            "// output y is not equivalent",
            "// the designs should not be equivalent",
            "// the carry is different from the reference",
        ] {
            assert_eq!(Expectation::Satisfiable, infer_expectation(text), "{text}");
        }
    }

    #[test]
    fn non_equivalence_wins_over_plain_equivalent() {
        assert_eq!(
            Expectation::Satisfiable,
            infer_expectation("// equivalent inputs, but the output is not equivalent")
        );
    }

    #[test]
    fn sat_hint_gives_satisfiable() {
        assert_eq!(Expectation::Satisfiable, infer_expectation("// Expect: SAT"));
        assert_eq!(Expectation::Satisfiable, infer_expectation("// this is satisfiable"));
    }

    #[test]
    fn sat_inside_an_unrelated_word_still_fires() {
        assert_eq!(
            Expectation::Satisfiable,
            infer_expectation("// compensated for the satellite clock")
        );
    }

    #[test]
    fn equivalent_alone_gives_not_satisfiable() {
        assert_eq!(
            Expectation::NotSatisfiable,
            infer_expectation("// both modules are equivalent")
        );
    }

    #[test]
    fn no_hint_gives_unknown() {
        assert_eq!(Expectation::Unknown, infer_expectation(""));
        assert_eq!(
            Expectation::Unknown,
            infer_expectation("module TopLevel0000 (a, b, y);")
        );
    }

    #[test]
    fn inference_is_idempotent() {
        let text = "// Not equivalent: output differs when a=1";

        assert_eq!(infer_expectation(text), infer_expectation(text));
    }

    #[tokio::test]
    async fn header_text_is_lowercased_and_joined() {
        let dir = TempDir::create("header_heuristic", "header_text_is_lowercased_and_joined");
        let spec = dir.join("spec.v");
        let implementation = dir.join("impl.v");
        fs::write(&spec, "// SPEC Header\nmodule A;").unwrap();
        fs::write(&implementation, "// IMPL Header").unwrap();

        let text = collect_header_text(&[&spec, &implementation]).await;

        assert_eq!("// spec header\nmodule a;\n// impl header", text);
    }

    #[tokio::test]
    async fn header_text_stops_after_the_header_lines() {
        let dir = TempDir::create("header_heuristic", "header_text_stops_after_the_header_lines");
        let circuit = dir.join("circuit.v");
        let mut content: Vec<String> = (0..HEADER_LINES).map(|i| format!("wire w{i};")).collect();
        content.push("// unsat".to_string());
        fs::write(&circuit, content.join("\n")).unwrap();

        let text = collect_header_text(&[&circuit]).await;

        assert!(!text.contains("unsat"));
        assert_eq!(Expectation::Unknown, infer_expectation(&text));
    }

    #[tokio::test]
    async fn unreadable_files_are_skipped() {
        let dir = TempDir::create("header_heuristic", "unreadable_files_are_skipped");
        let circuit = dir.join("circuit.v");
        fs::write(&circuit, "// not equivalent").unwrap();
        let missing = dir.join("missing.v");

        let text = collect_header_text(&[&missing, &circuit]).await;

        assert_eq!("// not equivalent", text);
    }

    #[tokio::test]
    async fn header_lines_of_carriage_return_files_are_counted() {
        let dir = TempDir::create(
            "header_heuristic",
            "header_lines_of_carriage_return_files_are_counted",
        );
        let circuit = dir.join("circuit.v");
        let mut content: Vec<String> = (0..HEADER_LINES).map(|i| format!("wire w{i};")).collect();
        content.push("// unsat".to_string());
        fs::write(&circuit, content.join("\r")).unwrap();

        let text = collect_header_text(&[&circuit]).await;

        assert_eq!(HEADER_LINES, text.lines().count());
        assert!(!text.contains("unsat"));
    }
}
