use config::{ConfigError, Map, Source, Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::fixtures_catalog::DEFAULT_GROUPS;

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Directory the checker is built and run from
    pub working_directory: PathBuf,

    /// Root of the timestamped directories receiving the byproducts of each run, relative paths
    /// are resolved against the working directory
    pub output_directory: PathBuf,

    /// Checker binary, relative paths are resolved by the checker process from the working
    /// directory
    pub checker_binary: String,

    /// Cell library shared by all the circuits, relative to the working directory
    pub cell_library: PathBuf,

    /// Extension (without leading dot) of the byproduct files left by the checker
    pub byproduct_extension: String,

    /// Command cleaning previous build results, its failure is tolerated
    pub clean_command: Vec<String>,

    /// Command building the checker, its failure is fatal
    pub build_command: Vec<String>,

    /// Deadline of each checker invocation in seconds, no deadline if not set
    pub checker_timeout: Option<u64>,

    /// Names of the fixture groups to run, in order
    pub groups: Vec<String>,
}

impl Configuration {
    /// Deadline of each checker invocation
    pub fn checker_timeout(&self) -> Option<Duration> {
        self.checker_timeout.map(Duration::from_secs)
    }
}

/// Default values of the [Configuration]
#[derive(Debug, Clone)]
pub struct DefaultConfiguration {
    /// Working directory
    pub working_directory: String,

    /// Output root
    pub output_directory: String,

    /// Checker binary
    pub checker_binary: String,

    /// Cell library
    pub cell_library: String,

    /// Byproduct extension
    pub byproduct_extension: String,

    /// Clean command
    pub clean_command: Vec<String>,

    /// Build command
    pub build_command: Vec<String>,

    /// Fixture groups
    pub groups: Vec<String>,
}

impl DefaultConfiguration {
    fn namespace() -> String {
        "default configuration".to_string()
    }
}

impl Default for DefaultConfiguration {
    fn default() -> Self {
        Self {
            working_directory: ".".to_string(),
            output_directory: "outputs".to_string(),
            checker_binary: "./gl_verilog_fev".to_string(),
            cell_library: "verilog inputs/stdcell.v".to_string(),
            byproduct_extension: "cnf".to_string(),
            clean_command: vec!["make".to_string(), "clean".to_string()],
            build_command: vec!["make".to_string()],
            groups: DEFAULT_GROUPS.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl Source for DefaultConfiguration {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        fn into_value<V: Into<ValueKind>>(value: V) -> Value {
            Value::new(Some(&DefaultConfiguration::namespace()), value.into())
        }
        let mut result = Map::new();
        let myself = self.clone();

        result.insert(
            "working_directory".to_string(),
            into_value(myself.working_directory),
        );
        result.insert(
            "output_directory".to_string(),
            into_value(myself.output_directory),
        );
        result.insert(
            "checker_binary".to_string(),
            into_value(myself.checker_binary),
        );
        result.insert("cell_library".to_string(), into_value(myself.cell_library));
        result.insert(
            "byproduct_extension".to_string(),
            into_value(myself.byproduct_extension),
        );
        result.insert(
            "clean_command".to_string(),
            into_value(myself.clean_command),
        );
        result.insert(
            "build_command".to_string(),
            into_value(myself.build_command),
        );
        result.insert("groups".to_string(), into_value(myself.groups));

        Ok(result)
    }
}
