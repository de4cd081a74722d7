use crate::entities::Outcome;

/// Marker printed by the checker when no distinguishing input exists.
pub const NOT_SATISFIABLE_MARKER: &str = "NOT SATISFIABLE!";

/// Marker printed by the checker when a distinguishing input exists.
///
/// It is a substring of [NOT_SATISFIABLE_MARKER], so it must be tested last.
pub const SATISFIABLE_MARKER: &str = "SATISFIABLE!";

/// Classify the raw stdout of the checker into an [Outcome].
///
/// The output may carry any amount of diagnostic noise around the verdict, only the
/// presence of the (case-sensitive) markers matters.
pub fn classify(checker_stdout: &str) -> Outcome {
    if checker_stdout.contains(NOT_SATISFIABLE_MARKER) {
        Outcome::NotSatisfiable
    } else if checker_stdout.contains(SATISFIABLE_MARKER) {
        Outcome::Satisfiable
    } else {
        Outcome::Error
    }
}
