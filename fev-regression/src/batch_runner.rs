use slog_scope::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::entities::{BatchReport, Fixture, FixtureGroup, Outcome, ResultRow};
use crate::error::HarnessError;
use crate::expectation::ExpectationPolicy;
use crate::utils::{HarnessCommand, ProcessRunner, RunOptions};
use crate::verdict_classifier;

/// Drive fixture groups through the checker, one fixture at a time.
pub struct BatchRunner {
    process_runner: Arc<dyn ProcessRunner>,
    checker_binary: String,
    work_dir: PathBuf,
    checker_timeout: Option<Duration>,
}

impl BatchRunner {
    /// [BatchRunner] factory
    pub fn new(
        process_runner: Arc<dyn ProcessRunner>,
        checker_binary: &str,
        work_dir: &Path,
        checker_timeout: Option<Duration>,
    ) -> Self {
        Self {
            process_runner,
            checker_binary: checker_binary.to_string(),
            work_dir: work_dir.to_path_buf(),
            checker_timeout,
        }
    }

    /// Run the checker on one fixture and compare its verdict with the expected one.
    ///
    /// A checker crash is recorded as an [Outcome::Error], only a checker that can't be
    /// started at all is fatal.
    pub async fn run_fixture(
        &self,
        fixture: &Fixture,
        policy: &ExpectationPolicy,
    ) -> Result<ResultRow, HarnessError> {
        let command = HarnessCommand::new(&self.checker_binary, fixture.checker_args());
        let output = self
            .process_runner
            .run(
                &command,
                &self.work_dir,
                RunOptions::captured(self.checker_timeout),
            )
            .await?;

        let outcome = if output.timed_out {
            Outcome::Error
        } else {
            verdict_classifier::classify(&output.stdout)
        };
        if outcome == Outcome::Error {
            warn!("Checker produced no verdict"; "fixture" => &fixture.name, "exit_code" => ?output.exit_code, "timed_out" => output.timed_out, "stderr" => &output.stderr);
        }
        let expectation = policy.resolve(fixture).await;
        debug!("Fixture done"; "fixture" => &fixture.name, "outcome" => %outcome, "expectation" => %expectation);

        Ok(ResultRow::new(fixture.name.clone(), outcome, expectation))
    }

    /// Run every fixture of the group in order, producing exactly one row per fixture.
    pub async fn run_group(&self, group: &FixtureGroup) -> Result<BatchReport, HarnessError> {
        info!("Running fixture group"; "group" => &group.name, "fixtures" => group.fixtures.len());
        let mut report = BatchReport::new(group.name.as_str(), group.title.as_str());

        for fixture in &group.fixtures {
            let row = self.run_fixture(fixture, &group.policy).await?;
            report.push(row);
        }

        info!("Fixture group done"; "group" => &group.name, "mismatches" => report.mismatches().len());

        Ok(report)
    }
}
