use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Verdict actually produced by the checker for a fixture, classified from its stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Outcome {
    /// A distinguishing input exists: the two circuits differ.
    #[strum(serialize = "SATISFIABLE!")]
    #[serde(rename = "SATISFIABLE!")]
    Satisfiable,

    /// No distinguishing input exists: the two circuits are equivalent.
    #[strum(serialize = "NOT SATISFIABLE!")]
    #[serde(rename = "NOT SATISFIABLE!")]
    NotSatisfiable,

    /// The checker output carried no verdict (crash, malformed output, deadline exceeded).
    #[strum(serialize = "ERROR")]
    #[serde(rename = "ERROR")]
    Error,
}

/// Verdict the harness believes the checker should produce for a fixture.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
pub enum Expectation {
    #[strum(serialize = "SATISFIABLE!")]
    #[serde(rename = "SATISFIABLE!")]
    Satisfiable,

    #[strum(serialize = "NOT SATISFIABLE!")]
    #[serde(rename = "NOT SATISFIABLE!")]
    NotSatisfiable,

    /// No comparison is performed for the fixture.
    #[default]
    #[strum(serialize = "UNKNOWN")]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Expectation {
    /// `true` if a comparison against an [Outcome] should be performed.
    pub fn is_known(&self) -> bool {
        !matches!(self, Expectation::Unknown)
    }

    /// Check if the given outcome contradicts this expectation.
    ///
    /// An [Expectation::Unknown] is never contradicted, an [Outcome::Error] contradicts any
    /// known expectation.
    pub fn is_contradicted_by(&self, outcome: Outcome) -> bool {
        match self {
            Expectation::Unknown => false,
            Expectation::Satisfiable => outcome != Outcome::Satisfiable,
            Expectation::NotSatisfiable => outcome != Outcome::NotSatisfiable,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn outcome_display_matches_checker_markers() {
        assert_eq!("SATISFIABLE!", Outcome::Satisfiable.to_string());
        assert_eq!("NOT SATISFIABLE!", Outcome::NotSatisfiable.to_string());
        assert_eq!("ERROR", Outcome::Error.to_string());
    }

    #[test]
    fn expectation_can_be_parsed_from_its_display() {
        assert_eq!(
            Expectation::NotSatisfiable,
            Expectation::from_str("NOT SATISFIABLE!").unwrap()
        );
        assert_eq!(Expectation::Unknown, Expectation::from_str("UNKNOWN").unwrap());
        Expectation::from_str("maybe").expect_err("Unexpected value should not be parsed");
    }

    #[test]
    fn unknown_expectation_is_never_contradicted() {
        for outcome in [Outcome::Satisfiable, Outcome::NotSatisfiable, Outcome::Error] {
            assert!(!Expectation::Unknown.is_contradicted_by(outcome));
        }
    }

    #[test]
    fn error_outcome_contradicts_known_expectations() {
        assert!(Expectation::Satisfiable.is_contradicted_by(Outcome::Error));
        assert!(Expectation::NotSatisfiable.is_contradicted_by(Outcome::Error));
    }

    #[test]
    fn matching_outcome_does_not_contradict_expectation() {
        assert!(!Expectation::Satisfiable.is_contradicted_by(Outcome::Satisfiable));
        assert!(!Expectation::NotSatisfiable.is_contradicted_by(Outcome::NotSatisfiable));
        assert!(Expectation::NotSatisfiable.is_contradicted_by(Outcome::Satisfiable));
    }

    #[test]
    fn expectation_serializes_as_marker_text() {
        let json = serde_json::to_string(&Expectation::NotSatisfiable).unwrap();

        assert_eq!(r#""NOT SATISFIABLE!""#, json);
    }
}
