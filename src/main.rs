//! citools CLI entrypoint.
//!
//! This is the main entrypoint for the citools command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pillar_citools::cli::{Cli, Commands, OutputFormat, OutputFormatter, ReportArgs};
use pillar_citools::config::{ConfigParser, ConfigValidator, ToolConfig, find_config_file};
use pillar_citools::error::{CitoolsError, Result};
use pillar_citools::report::ValidationResult;
use pillar_citools::source::{DirectorySource, PillarSource, SnapshotSource};
use pillar_citools::validator::PrValidator;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status when `--exit-code` is set and changes were found.
const EXIT_CHANGES: u8 = 2;

/// Environment names used for snapshot comparisons.
const SNAPSHOT_TARGET_ENV: &str = "target";
const SNAPSHOT_INCOMING_ENV: &str = "incoming";

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// Logs go to stderr; stdout carries only the report.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref())?;
    let format = cli.output;

    match cli.command {
        Commands::ValidatePr {
            hosts,
            target,
            incoming,
            change_id,
            pillar_root,
            report,
        } => {
            let target_env = target.unwrap_or_else(|| settings.target_env.clone());
            let incoming_env = match (incoming, change_id) {
                (Some(env), _) => env,
                (None, Some(id)) => settings.change_env(&id),
                (None, None) => {
                    return Err(CitoolsError::internal(
                        "either --incoming or --change-id is required",
                    ));
                }
            };
            let hosts = if hosts.is_empty() {
                settings.hosts.clone()
            } else {
                hosts
            };
            let root = pillar_root.unwrap_or_else(|| settings.pillar_root.clone());
            let source: Box<dyn PillarSource> = Box::new(DirectorySource::new(root));

            let formatter = formatter_for(format, &settings, report);
            cmd_validate(&source, &hosts, &target_env, &incoming_env, report, &formatter).await
        }
        Commands::Compare {
            target_snapshot,
            incoming_snapshot,
            hosts,
            report,
        } => {
            let mut source = SnapshotSource::new();
            source
                .load_environment(SNAPSHOT_TARGET_ENV, &target_snapshot)
                .await?;
            source
                .load_environment(SNAPSHOT_INCOMING_ENV, &incoming_snapshot)
                .await?;

            let formatter = formatter_for(format, &settings, report);
            cmd_validate(
                &source,
                &hosts,
                SNAPSHOT_TARGET_ENV,
                SNAPSHOT_INCOMING_ENV,
                report,
                &formatter,
            )
            .await
        }
        Commands::Hosts { pillar_root, envs } => {
            let root = pillar_root.unwrap_or_else(|| settings.pillar_root.clone());
            let formatter = OutputFormatter::new(format);
            cmd_hosts(&DirectorySource::new(root), &envs, &formatter).await
        }
    }
}

/// Validate a pull request and print the report.
async fn cmd_validate<S: PillarSource>(
    source: &S,
    hosts: &[String],
    target_env: &str,
    incoming_env: &str,
    report: ReportArgs,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let validator = ConfigValidator::new();
    for warning in validator.validate_run(target_env, incoming_env, hosts)? {
        warn!("{warning}");
    }

    let pr_validator = PrValidator::new(source);
    let result = pr_validator.validate_pr(hosts, target_env, incoming_env).await?;

    let output = formatter
        .format_result(&result)
        .map_err(|e| CitoolsError::internal(format!("Failed to serialize report: {e}")))?;
    write_stdout(&output)?;

    if report.summary {
        eprint!("{}", OutputFormatter::format_summary(&result));
    }
    eprintln!("{}", OutputFormatter::format_status(&result));

    Ok(exit_code(&result, report.exit_code))
}

/// List hosts known to the pillar root.
async fn cmd_hosts(
    source: &DirectorySource,
    envs: &[String],
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    info!("Listing hosts under: {}", source.root().display());
    let hosts = source.list_hosts(envs).await?;

    let output = formatter
        .format_hosts(&hosts)
        .map_err(|e| CitoolsError::internal(format!("Failed to serialize hosts: {e}")))?;
    write_stdout(&output)?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads settings from the given file, a discovered file, or defaults.
fn load_settings(config_path: Option<&Path>) -> Result<ToolConfig> {
    let config_file: Option<PathBuf> = config_path
        .map(Path::to_path_buf)
        .or_else(|| find_config_file("."));

    let base_path = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    debug!("Settings base path: {}", base_path.display());

    let parser = ConfigParser::new().with_base_path(base_path);
    parser.load_dotenv()?;
    parser.load_with_env(config_file.as_deref())
}

/// Builds the report formatter from CLI flags and settings.
fn formatter_for(format: OutputFormat, settings: &ToolConfig, report: ReportArgs) -> OutputFormatter {
    OutputFormatter::new(format).with_values(settings.show_values && !report.hide_values)
}

/// Writes a report to stdout.
fn write_stdout(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Maps a validation result to the process exit status.
fn exit_code(result: &ValidationResult, changes_fail: bool) -> ExitCode {
    if result.has_failures() {
        ExitCode::FAILURE
    } else if changes_fail && result.has_changes() {
        ExitCode::from(EXIT_CHANGES)
    } else {
        ExitCode::SUCCESS
    }
}
