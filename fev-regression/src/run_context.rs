use anyhow::Context;
use std::path::PathBuf;
use std::time::Duration;

use crate::configuration::Configuration;
use crate::entities::FixtureGroup;
use crate::fixtures_catalog;
use crate::utils::HarnessCommand;
use crate::StdResult;

/// Everything a regression run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory the checker is built and run from
    pub working_directory: PathBuf,

    /// Root of the timestamped archive directories
    pub output_root: PathBuf,

    /// Checker binary
    pub checker_binary: String,

    /// Byproduct extension, without leading dot
    pub byproduct_extension: String,

    /// Build steps, `None` when the build is skipped
    pub build_steps: Option<BuildSteps>,

    /// Deadline of each checker invocation
    pub checker_timeout: Option<Duration>,

    /// Fixture groups to run, paths anchored on the working directory
    pub groups: Vec<FixtureGroup>,
}

/// External commands rebuilding the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSteps {
    /// Cleaning step, failure tolerated
    pub clean: HarnessCommand,

    /// Build step, failure fatal
    pub build: HarnessCommand,
}

impl RunContext {
    /// Resolve the context of a run from the configuration.
    pub fn from_configuration(configuration: &Configuration, skip_build: bool) -> StdResult<Self> {
        let working_directory = configuration
            .working_directory
            .canonicalize()
            .with_context(|| {
                format!(
                    "Working directory `{}` is not accessible",
                    configuration.working_directory.display()
                )
            })?;
        let build_steps = if skip_build {
            None
        } else {
            Some(BuildSteps {
                clean: HarnessCommand::from_parts(&configuration.clean_command)
                    .with_context(|| "Invalid clean command")?,
                build: HarnessCommand::from_parts(&configuration.build_command)
                    .with_context(|| "Invalid build command")?,
            })
        };
        let groups =
            fixtures_catalog::select_groups(&configuration.groups, &configuration.cell_library)?
                .iter()
                .map(|group| group.anchored_on(&working_directory))
                .collect();

        Ok(Self {
            output_root: working_directory.join(&configuration.output_directory),
            working_directory,
            checker_binary: configuration.checker_binary.clone(),
            byproduct_extension: configuration.byproduct_extension.clone(),
            build_steps,
            checker_timeout: configuration.checker_timeout(),
            groups,
        })
    }
}
