use anyhow::Context;
use chrono::{DateTime, Local};
use slog_scope::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::archiver::ArtifactArchiver;
use crate::batch_runner::BatchRunner;
use crate::error::HarnessError;
use crate::reporter::RunSummary;
use crate::run_context::RunContext;
use crate::utils::{ProcessRunner, RunOptions};
use crate::StdResult;

/// A complete regression run: build, run every fixture group, archive byproducts.
pub struct RegressionSpec {
    context: RunContext,
    process_runner: Arc<dyn ProcessRunner>,
}

impl RegressionSpec {
    /// [RegressionSpec] factory
    pub fn new(context: RunContext, process_runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            context,
            process_runner,
        }
    }

    /// Run the whole regression.
    ///
    /// Mismatches are part of the returned summary, only build and checker start failures are
    /// errors.
    pub async fn run(&self, run_time: DateTime<Local>) -> StdResult<RunSummary> {
        self.build_checker()
            .await
            .with_context(|| "Building the checker failed")?;

        let batch_runner = BatchRunner::new(
            self.process_runner.clone(),
            &self.context.checker_binary,
            &self.context.working_directory,
            self.context.checker_timeout,
        );
        let mut batches = Vec::with_capacity(self.context.groups.len());
        for group in &self.context.groups {
            let report = batch_runner
                .run_group(group)
                .await
                .with_context(|| format!("Running fixture group '{}' failed", group.name))?;
            batches.push(report);
        }

        let archive_directory = self.archive_byproducts(run_time).await;

        Ok(RunSummary::new(batches, archive_directory))
    }

    /// Archive the byproducts of the run.
    ///
    /// A failure leaves the byproducts in the working directory and never discards the
    /// results of the batches.
    async fn archive_byproducts(&self, run_time: DateTime<Local>) -> Option<PathBuf> {
        let archiver = ArtifactArchiver::new(
            &self.context.output_root,
            self.context.byproduct_extension.as_str(),
        );

        match archiver
            .archive(&self.context.working_directory, run_time)
            .await
        {
            Ok(archive) => Some(archive.directory),
            Err(error) => {
                warn!("Archiving byproducts failed, they are left in the working directory"; "error" => ?error);
                None
            }
        }
    }

    async fn build_checker(&self) -> Result<(), HarnessError> {
        let Some(build_steps) = &self.context.build_steps else {
            info!("Skipping checker build");
            return Ok(());
        };
        let work_dir = &self.context.working_directory;

        info!("Building checker"; "work_dir" => %work_dir.display());
        self.process_runner
            .run(&build_steps.clean, work_dir, RunOptions::tolerant())
            .await?;
        self.process_runner
            .run(&build_steps.build, work_dir, RunOptions::fatal())
            .await?;

        Ok(())
    }
}
