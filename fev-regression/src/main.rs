use anyhow::Context;
use clap::Parser;
use config::{Map, Source, Value, ValueKind};
use slog::{Drain, Fuse, Level, Logger};
use slog_scope::{debug, error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use fev_regression::configuration::{Configuration, DefaultConfiguration};
use fev_regression::reporter::RunSummary;
use fev_regression::utils::TokioProcessRunner;
use fev_regression::{HarnessError, RegressionSpec, RunContext, StdResult};

/// Exit code used when the run failed for a reason other than a failed command.
const INTERNAL_FAILURE_EXIT_CODE: u8 = 2;

/// Regression harness args
#[derive(Parser, Debug, Clone)]
#[clap(name = "fev-regression")]
#[clap(
    about = "Builds the equivalence checker, runs it on the fixture groups and reports verdict mismatches.",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// Skip the clean and build steps (reuse an already built checker)
    #[clap(long)]
    no_build: bool,

    /// Run Mode, selects the `{config_directory}/{run_mode}.json` configuration file.
    #[clap(long, env = "RUN_MODE", default_value = "dev")]
    run_mode: String,

    /// Directory where configuration file is located.
    #[clap(long, default_value = "./config")]
    config_directory: PathBuf,

    /// Override configuration working directory.
    #[clap(long, env = "WORKING_DIRECTORY")]
    working_directory: Option<PathBuf>,

    /// Fixture groups to run (comma separated), ie: `main,ob` or `smoke`.
    #[clap(long = "group", value_delimiter = ',')]
    groups: Vec<String>,

    /// Deadline of each checker invocation, in seconds.
    #[clap(long)]
    checker_timeout: Option<u64>,

    /// Print the run summary as a single JSON document on stdout instead of tables, command
    /// echoes and build output are sent to stderr.
    #[clap(long)]
    json: bool,

    /// Verbosity level (-v=warning, -vv=info, -vvv=debug).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable JSON output for logs displayed according to verbosity level
    #[clap(long)]
    log_format_json: bool,
}

impl Args {
    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::Error,
            1 => Level::Warning,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }

    fn wrap_drain<D: Drain + Send + 'static>(&self, drain: D) -> Fuse<slog_async::Async>
    where
        D::Err: std::fmt::Debug,
    {
        let drain = slog::LevelFilter::new(drain.fuse(), self.log_level()).fuse();

        slog_async::Async::new(drain).build().fuse()
    }

    fn build_logger(&self) -> Logger {
        let drain = if self.log_format_json {
            self.wrap_drain(
                slog_bunyan::with_name("fev-regression", std::io::stderr())
                    .set_pretty(false)
                    .build(),
            )
        } else {
            let decorator = slog_term::TermDecorator::new().stderr().build();
            self.wrap_drain(slog_term::CompactFormat::new(decorator).build())
        };

        Logger::root(Arc::new(drain), slog::o!())
    }

    fn load_configuration(&self) -> StdResult<Configuration> {
        let filename = format!("{}/{}.json", self.config_directory.display(), self.run_mode);
        debug!("Reading configuration file '{filename}'.");

        config::Config::builder()
            .add_source(DefaultConfiguration::default())
            .add_source(config::File::with_name(&filename).required(false))
            .add_source(
                config::Environment::with_prefix("FEV")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("groups")
                    .with_list_parse_key("clean_command")
                    .with_list_parse_key("build_command"),
            )
            .add_source(self.clone())
            .build()
            .with_context(|| "configuration build error")?
            .try_deserialize()
            .with_context(|| "configuration deserialize error")
    }

    async fn execute(&self) -> StdResult<RunSummary> {
        let configuration = self.load_configuration()?;
        debug!("Configuration loaded"; "configuration" => ?configuration);
        let context = RunContext::from_configuration(&configuration, self.no_build)?;
        info!("Starting regression run"; "work_dir" => %context.working_directory.display(), "groups" => ?configuration.groups);

        RegressionSpec::new(context, Arc::new(self.process_runner()))
            .run(chrono::Local::now())
            .await
    }

    fn process_runner(&self) -> TokioProcessRunner {
        TokioProcessRunner::new().with_reserved_stdout(self.json)
    }

    fn print_summary(&self, summary: &RunSummary) -> StdResult<()> {
        if self.json {
            println!("{}", serde_json::to_string(summary)?);
        } else {
            println!("{}", summary.render_text());
        }

        Ok(())
    }
}

impl Source for Args {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
        let mut map = Map::new();
        let namespace = "clap arguments".to_string();

        if let Some(working_directory) = &self.working_directory {
            map.insert(
                "working_directory".to_string(),
                Value::new(
                    Some(&namespace),
                    ValueKind::from(working_directory.to_string_lossy().to_string()),
                ),
            );
        }
        if let Some(checker_timeout) = self.checker_timeout {
            map.insert(
                "checker_timeout".to_string(),
                Value::new(Some(&namespace), ValueKind::from(checker_timeout)),
            );
        }
        if !self.groups.is_empty() {
            map.insert(
                "groups".to_string(),
                Value::new(Some(&namespace), ValueKind::from(self.groups.clone())),
            );
        }

        Ok(map)
    }
}

/// Map the result of a run to the process exit code.
fn exit_code(result: &StdResult<RunSummary>) -> u8 {
    match result {
        Ok(summary) if summary.has_mismatches() => 1,
        Ok(_) => 0,
        Err(error) => match HarnessError::find_in(error) {
            Some(harness_error) => u8::try_from(harness_error.exit_code()).unwrap_or(1),
            None => INTERNAL_FAILURE_EXIT_CODE,
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = slog_scope::set_global_logger(args.build_logger());

    let result = args
        .execute()
        .await
        .and_then(|summary| args.print_summary(&summary).map(|()| summary));
    if let Err(run_error) = &result {
        error!("Regression run failed"; "error" => ?run_error);
        eprintln!("Error: {run_error:?}");
    }

    ExitCode::from(exit_code(&result))
}
