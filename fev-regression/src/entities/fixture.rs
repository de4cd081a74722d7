use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::expectation::ExpectationPolicy;

/// One side of an equivalence check: a top level module, the cell library it is built from and
/// the circuit file describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitSide {
    /// Identifier of the top level module in the circuit file
    pub module: String,

    /// Cell library file shared by the circuit
    pub library: PathBuf,

    /// Circuit description file
    pub circuit: PathBuf,
}

impl CircuitSide {
    /// [CircuitSide] factory
    pub fn new<M: Into<String>, L: Into<PathBuf>, C: Into<PathBuf>>(
        module: M,
        library: L,
        circuit: C,
    ) -> Self {
        Self {
            module: module.into(),
            library: library.into(),
            circuit: circuit.into(),
        }
    }

    /// Return a copy of this side with relative paths anchored on the given directory.
    pub fn anchored_on(&self, directory: &Path) -> Self {
        Self {
            module: self.module.clone(),
            library: directory.join(&self.library),
            circuit: directory.join(&self.circuit),
        }
    }
}

/// An equivalence check test case: a specification circuit and an implementation circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    /// Name used in reports, ie: `c1355 vs c1356`
    pub name: String,

    /// Specification side (`-s` of the checker)
    pub specification: CircuitSide,

    /// Implementation side (`-i` of the checker)
    pub implementation: CircuitSide,
}

impl Fixture {
    /// [Fixture] factory
    pub fn new<N: Into<String>>(
        name: N,
        specification: CircuitSide,
        implementation: CircuitSide,
    ) -> Self {
        Self {
            name: name.into(),
            specification,
            implementation,
        }
    }

    /// Arguments given to the checker binary to compare both sides of this fixture.
    pub fn checker_args(&self) -> Vec<String> {
        let side_args = |flag: &str, side: &CircuitSide| {
            vec![
                flag.to_string(),
                side.module.clone(),
                side.library.display().to_string(),
                side.circuit.display().to_string(),
            ]
        };

        [
            side_args("-s", &self.specification),
            side_args("-i", &self.implementation),
        ]
        .concat()
    }

    /// Circuit files whose headers may describe the intended verdict, specification first.
    pub fn circuit_files(&self) -> [&Path; 2] {
        [&self.specification.circuit, &self.implementation.circuit]
    }

    /// Return a copy of this fixture with relative paths anchored on the given directory.
    pub fn anchored_on(&self, directory: &Path) -> Self {
        Self {
            name: self.name.clone(),
            specification: self.specification.anchored_on(directory),
            implementation: self.implementation.anchored_on(directory),
        }
    }
}

/// A named batch of fixtures sharing one expectation resolution policy.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureGroup {
    /// Short name used to select the group from the command line, ie: `main`
    pub name: String,

    /// Title printed above the group report
    pub title: String,

    /// Fixtures, in report order
    pub fixtures: Vec<Fixture>,

    /// How the expected verdict of each fixture is determined
    pub policy: ExpectationPolicy,
}

impl FixtureGroup {
    /// Return a copy of this group with all fixture paths anchored on the given directory.
    pub fn anchored_on(&self, directory: &Path) -> Self {
        Self {
            fixtures: self
                .fixtures
                .iter()
                .map(|fixture| fixture.anchored_on(directory))
                .collect(),
            ..self.clone()
        }
    }
}
