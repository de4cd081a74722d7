//! Built-in fixture groups.
//!
//! Paths are relative to the working directory of the run, they are anchored by the
//! [RunContext](crate::RunContext).

use std::path::{Path, PathBuf};

use crate::StdResult;
use crate::entities::{
    CircuitSide, Expectation,
    Expectation::{NotSatisfiable, Satisfiable},
    Fixture, FixtureGroup,
};
use crate::expectation::{ExpectationPolicy, ExpectationTable};

/// Name of the group of the reference ISCAS pairs.
pub const MAIN_GROUP: &str = "main";
/// Name of the secondary group, whose circuit headers describe the intended verdict.
pub const OB_GROUP: &str = "ob";
/// Name of the single pair group used to check that the checker runs at all.
pub const SMOKE_GROUP: &str = "smoke";

/// Groups run when none is explicitly requested.
pub const DEFAULT_GROUPS: [&str; 2] = [MAIN_GROUP, OB_GROUP];

const MAIN_CIRCUITS_DIR: &str = "verilog inputs";
const OB_CIRCUITS_DIR: &str = "utilities/OB_tests";

const ISCAS_PAIRS: [(&str, &str, Expectation); 6] = [
    ("0409", "0410", Satisfiable),
    ("1355", "1356", NotSatisfiable),
    ("1404", "1405", NotSatisfiable),
    ("2670", "2671", Satisfiable),
    ("2670", "2672", NotSatisfiable),
    ("2806", "2807", Satisfiable),
];

const OB_PAIRS: [(&str, &str, &str, &str, Expectation); 7] = [
    ("test0000", "0000", "test0001", "0001", NotSatisfiable),
    ("test1110", "1110", "test1111", "1111", Satisfiable),
    ("test0000", "0000", "test0000", "0000", NotSatisfiable),
    ("test_nand5_a", "Nand5A", "test_nand5_b", "Nand5B", NotSatisfiable),
    ("test_or7_a", "Or7A", "test_or7_b", "Or7B", NotSatisfiable),
    ("test4440", "4440", "test4441", "4441", NotSatisfiable),
    ("test5550", "5550", "test5551", "5551", NotSatisfiable),
];

/// Circuit pair description: (spec file stem, spec module suffix, impl file stem, impl module
/// suffix, expectation).
type PairDefinition = (String, String, String, String, Expectation);

fn iscas_pairs() -> Vec<PairDefinition> {
    ISCAS_PAIRS
        .iter()
        .map(|(spec, implementation, expectation)| {
            (
                format!("c{spec}"),
                spec.to_string(),
                format!("c{implementation}"),
                implementation.to_string(),
                *expectation,
            )
        })
        .collect()
}

fn ob_pairs() -> Vec<PairDefinition> {
    OB_PAIRS
        .iter()
        .map(|(spec, spec_suffix, implementation, impl_suffix, expectation)| {
            (
                spec.to_string(),
                spec_suffix.to_string(),
                implementation.to_string(),
                impl_suffix.to_string(),
                *expectation,
            )
        })
        .chain(iscas_pairs())
        .collect()
}

fn build_group(
    name: &str,
    title: &str,
    circuits_dir: &str,
    cell_library: &Path,
    pairs: &[PairDefinition],
    policy: fn(ExpectationTable) -> ExpectationPolicy,
) -> FixtureGroup {
    let side = |stem: &str, suffix: &str| {
        CircuitSide::new(
            format!("TopLevel{suffix}"),
            cell_library,
            PathBuf::from(circuits_dir).join(format!("{stem}.v")),
        )
    };
    let fixtures: Vec<Fixture> = pairs
        .iter()
        .map(|(spec, spec_suffix, implementation, impl_suffix, _)| {
            Fixture::new(
                format!("{spec} vs {implementation}"),
                side(spec.as_str(), spec_suffix.as_str()),
                side(implementation.as_str(), impl_suffix.as_str()),
            )
        })
        .collect();
    let entries: Vec<(&str, Expectation)> = fixtures
        .iter()
        .zip(pairs)
        .map(|(fixture, (.., expectation))| (fixture.name.as_str(), *expectation))
        .collect();

    FixtureGroup {
        name: name.to_string(),
        title: title.to_string(),
        policy: policy(ExpectationTable::from_entries(&entries)),
        fixtures,
    }
}

/// All the built-in groups, in their default run order.
pub fn builtin_groups(cell_library: &Path) -> Vec<FixtureGroup> {
    vec![
        build_group(
            MAIN_GROUP,
            "MAIN VERILOG TESTS",
            MAIN_CIRCUITS_DIR,
            cell_library,
            &iscas_pairs(),
            ExpectationPolicy::table_only,
        ),
        build_group(
            OB_GROUP,
            "OB TESTS",
            OB_CIRCUITS_DIR,
            cell_library,
            &ob_pairs(),
            ExpectationPolicy::headers_then_table,
        ),
        build_group(
            SMOKE_GROUP,
            "SMOKE TEST",
            MAIN_CIRCUITS_DIR,
            cell_library,
            &iscas_pairs()[..1],
            ExpectationPolicy::table_only,
        ),
    ]
}

/// Select built-in groups by name, in the requested order.
pub fn select_groups(names: &[String], cell_library: &Path) -> StdResult<Vec<FixtureGroup>> {
    let available = builtin_groups(cell_library);

    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|group| &group.name == name)
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unknown fixture group '{name}', available groups: {}",
                        available
                            .iter()
                            .map(|group| group.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })
        })
        .collect()
}
