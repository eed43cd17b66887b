// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for SDK parity.
//!
//! This crate provides the command-line harness around the comparison
//! runner: it loads settings and credentials once, reads the prompt, runs
//! both clients under an overall time budget and reports the verdict.
//!
//! Exit codes: `0` within tolerance, `1` run failure, `2` tolerance exceeded.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod logging;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use sdk_parity_adapters::build_targets;
use sdk_parity_benchmarks::{io, markdown, run_comparison, ComparisonReport, RunOptions};
use sdk_parity_core::config::{GENAI_API_KEY_ENV, LANGCHAIN_API_KEY_ENV};
use sdk_parity_core::{ClientLabel, Credentials, Prompt, Settings};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::logging::LogFormat;

/// Exit code of a run whose latencies were comparable.
pub const EXIT_OK: i32 = 0;

/// Exit code of a run that failed before a verdict.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code of a run whose latency difference exceeded the tolerance.
pub const EXIT_TOLERANCE_EXCEEDED: i32 = 2;

/// SDK parity CLI.
#[derive(Parser, Debug)]
#[command(name = "sdk-parity")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log line format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call both clients concurrently and compare their latencies.
    ///
    /// Writes one JSON record per successful call to the results directory
    /// (genai.json and langchain.json).
    Run(RunArgs),

    /// Render a markdown report from the records of a previous run.
    Report {
        /// Settings file (default: sdk-parity.toml if present).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Results directory override.
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        /// Tolerance override in milliseconds.
        #[arg(long)]
        tolerance_ms: Option<u64>,
    },

    /// Show effective configuration and credential status.
    Status {
        /// Settings file (default: sdk-parity.toml if present).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show detailed status information.
        #[arg(short, long)]
        detailed: bool,

        /// API key of the direct client.
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        genai_api_key: Option<String>,

        /// API key of the framework client.
        #[arg(long, env = "GOOGLE_LANGCHAIN_API_KEY", hide_env_values = true)]
        langchain_api_key: Option<String>,
    },
}

/// Arguments of the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Settings file (default: sdk-parity.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding system-instructions.md, user-input.md and snapshot.png.
    #[arg(long)]
    pub prompt_dir: Option<PathBuf>,

    /// Results directory override.
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    /// Model identifier override.
    #[arg(long)]
    pub model: Option<String>,

    /// Tolerance override in milliseconds.
    #[arg(long)]
    pub tolerance_ms: Option<u64>,

    /// Overall time budget override in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Delay before exit, for trace uploads to flush.
    #[arg(long)]
    pub flush_delay_ms: Option<u64>,

    /// API key of the direct client.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub genai_api_key: Option<String>,

    /// API key of the framework client.
    #[arg(long, env = "GOOGLE_LANGCHAIN_API_KEY", hide_env_values = true)]
    pub langchain_api_key: Option<String>,

    /// Output format of the final report.
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format of the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary lines
    #[default]
    Text,
    /// The full report as JSON
    Json,
    /// A markdown table
    Markdown,
}

impl RunArgs {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.prompt_dir {
            settings.prompt_dir = dir.clone();
        }
        if let Some(dir) = &self.results_dir {
            settings.results_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(tolerance) = self.tolerance_ms {
            settings.tolerance_ms = tolerance;
        }
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_secs = timeout;
        }
        if let Some(delay) = self.flush_delay_ms {
            settings.flush_delay_ms = delay;
        }
    }
}

/// Parse arguments, install logging and execute the command.
///
/// `.env` is loaded before parsing so credentials defined there are picked
/// up like any other environment variable.
///
/// # Returns
///
/// The process exit code on completion, or an error if the command fails.
pub async fn run() -> anyhow::Result<i32> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose);
    execute(cli).await
}

/// Execute a parsed command.
pub async fn execute(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Run(args) => run_benchmark(args).await,
        Commands::Report {
            config,
            results_dir,
            tolerance_ms,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if let Some(dir) = results_dir {
                settings.results_dir = dir;
            }
            let tolerance_ms = tolerance_ms.unwrap_or(settings.tolerance_ms);
            print!("{}", render_record_report(&settings.results_dir, tolerance_ms)?);
            Ok(EXIT_OK)
        }
        Commands::Status {
            config,
            detailed,
            genai_api_key,
            langchain_api_key,
        } => {
            let settings = load_settings(config.as_deref())?;
            let credentials = Credentials::new(genai_api_key, langchain_api_key);
            print!("{}", status_report(&settings, &credentials, detailed));
            Ok(EXIT_OK)
        }
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    Settings::load(path).context("failed to load settings")
}

async fn run_benchmark(args: RunArgs) -> anyhow::Result<i32> {
    let mut settings = load_settings(args.config.as_deref())?;
    args.apply_overrides(&mut settings);
    settings.validate().context("invalid run options")?;
    let credentials = Credentials::new(args.genai_api_key.clone(), args.langchain_api_key.clone());
    debug!(?settings, ?credentials, "Effective configuration");

    let prompt = Prompt::load(&settings.prompt_files()).context("failed to load prompt")?;
    debug!(
        system_instructions = prompt.system_instructions(),
        user_input = prompt.user_input(),
        "Loaded prompt"
    );

    let (direct, framework) = build_targets(&settings, &credentials);
    let options = RunOptions {
        results_dir: settings.results_dir.clone(),
        tolerance_ms: settings.tolerance_ms,
    };

    info!(
        model = %settings.model,
        tolerance_ms = settings.tolerance_ms,
        "=== Comparing Google GenAI SDK vs LangChain Vertex SDK ==="
    );

    let budget = Duration::from_secs(settings.timeout_secs);
    let outcome = tokio::time::timeout(
        budget,
        run_comparison(&direct, &framework, &prompt, &options),
    )
    .await;

    if settings.flush_delay_ms > 0 {
        debug!(delay_ms = settings.flush_delay_ms, "Waiting for trace uploads to flush");
        tokio::time::sleep(Duration::from_millis(settings.flush_delay_ms)).await;
    }

    let report = match outcome {
        Err(_) => {
            error!(timeout_secs = settings.timeout_secs, "Run exceeded its time budget");
            return Err(anyhow!(
                "run exceeded its time budget of {}s",
                settings.timeout_secs
            ));
        }
        Ok(Err(e)) => {
            error!(error = %e, "Comparison failed");
            return Err(e.into());
        }
        Ok(Ok(report)) => report,
    };

    print_report(&report, args.format)?;

    if report.outcome.within_tolerance {
        Ok(EXIT_OK)
    } else {
        warn!(
            difference_ms = report.outcome.time_difference_ms,
            tolerance_ms = report.tolerance_ms,
            "Latency difference exceeds tolerance"
        );
        Ok(EXIT_TOLERANCE_EXCEEDED)
    }
}

fn print_report(report: &ComparisonReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Markdown => print!("{}", markdown::generate_summary(report)),
        OutputFormat::Text => {
            for summary in [&report.direct, &report.framework] {
                println!(
                    "{} duration: {} ({}ms)",
                    summary.label.display_name(),
                    summary.duration,
                    summary.duration_ms
                );
            }
            println!(
                "Time difference: {} ({}ms)",
                report.difference(),
                report.outcome.time_difference_ms
            );
            if report.outcome.within_tolerance {
                println!("{}", "Within tolerance".green().bold());
            } else {
                println!(
                    "{}",
                    format!("Exceeds tolerance of {}ms", report.tolerance_ms)
                        .red()
                        .bold()
                );
            }
        }
    }
    Ok(())
}

/// Render the markdown report for the records in `results_dir`.
pub fn render_record_report(results_dir: &Path, tolerance_ms: u64) -> anyhow::Result<String> {
    let mut records = Vec::with_capacity(ClientLabel::ALL.len());
    for label in ClientLabel::ALL {
        let record = match io::read_result(results_dir, label) {
            Ok(record) => Some(record),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "failed to read {}",
                        io::result_path(results_dir, label).display()
                    )
                })
            }
        };
        if let Some(record) = &record {
            if !record.is_consistent() {
                warn!(client = %label, duration = %record.duration, duration_ms = record.duration_ms, "Record fields disagree");
            }
        }
        records.push((label, record));
    }
    Ok(markdown::generate_record_report(&records, tolerance_ms))
}

/// Render the effective configuration and whether each API key is present.
pub fn status_report(settings: &Settings, credentials: &Credentials, detailed: bool) -> String {
    let present = |key: &Option<String>| {
        if key.is_some() {
            "set".green()
        } else {
            "missing".red()
        }
    };

    let mut output = String::new();
    writeln!(output, "SDK Parity Benchmark").unwrap();
    writeln!(output, "Version: {}", env!("CARGO_PKG_VERSION")).unwrap();
    writeln!(output, "Model: {}", settings.model).unwrap();
    writeln!(output, "Tolerance: {}ms", settings.tolerance_ms).unwrap();
    writeln!(output, "{}: {}", GENAI_API_KEY_ENV, present(&credentials.genai_api_key)).unwrap();
    writeln!(
        output,
        "{}: {}",
        LANGCHAIN_API_KEY_ENV,
        present(&credentials.langchain_api_key)
    )
    .unwrap();

    if detailed {
        let files = settings.prompt_files();
        writeln!(output, "\nPrompt files:").unwrap();
        for path in [
            files.system_instructions_path(),
            files.user_input_path(),
            files.image_path(),
        ] {
            let state = if path.exists() { "ok".green() } else { "missing".yellow() };
            writeln!(output, "  - {} ({})", path.display(), state).unwrap();
        }
        writeln!(output, "\nResult files:").unwrap();
        for label in ClientLabel::ALL {
            writeln!(output, "  - {}", io::result_path(&settings.results_dir, label).display()).unwrap();
        }
        writeln!(output, "\nEndpoints:").unwrap();
        writeln!(output, "  - {}", settings.genai_base_url).unwrap();
        writeln!(output, "  - {}", settings.vertex_base_url).unwrap();
        writeln!(
            output,
            "\nTime budget: {}s, flush delay: {}ms",
            settings.timeout_secs, settings.flush_delay_ms
        )
        .unwrap();
    }
    output
}
