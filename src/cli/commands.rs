//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// citools - Pillar validation helpers for CI.
#[derive(Parser, Debug)]
#[command(name = "citools")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(short, long, global = true, env = "CITOOLS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare the pillar of two environments for a set of hosts.
    ValidatePr {
        /// Hosts to validate (defaults to configured hosts, then all known hosts).
        hosts: Vec<String>,

        /// Environment the pull request targets.
        #[arg(short, long)]
        target: Option<String>,

        /// Incoming environment.
        #[arg(short, long, required_unless_present = "change_id", conflicts_with = "change_id")]
        incoming: Option<String>,

        /// Change id; the incoming environment is `<prefix><change_id>`.
        #[arg(long)]
        change_id: Option<String>,

        /// Directory of rendered pillar, one subdirectory per environment.
        #[arg(long)]
        pillar_root: Option<PathBuf>,

        /// Report options.
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Compare two pillar snapshot files mapping hosts to pillar.
    Compare {
        /// Snapshot of the target environment.
        target_snapshot: PathBuf,

        /// Snapshot of the incoming environment.
        incoming_snapshot: PathBuf,

        /// Restrict the comparison to these hosts.
        #[arg(long = "host")]
        hosts: Vec<String>,

        /// Report options.
        #[command(flatten)]
        report: ReportArgs,
    },

    /// List hosts with rendered pillar.
    Hosts {
        /// Directory of rendered pillar, one subdirectory per environment.
        #[arg(long)]
        pillar_root: Option<PathBuf>,

        /// Only list hosts of these environments (defaults to all).
        #[arg(long = "env")]
        envs: Vec<String>,
    },
}

/// Options shared by the reporting commands.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ReportArgs {
    /// Do not print old and new values.
    #[arg(long)]
    pub hide_values: bool,

    /// Print a per-host summary table to stderr.
    #[arg(long)]
    pub summary: bool,

    /// Exit with status 2 when changes are found.
    #[arg(long)]
    pub exit_code: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_pr() {
        let cli = Cli::try_parse_from([
            "citools",
            "validate-pr",
            "web01.local",
            "srv01.local",
            "--incoming",
            "dev.change_common_pillar",
            "--hide-values",
        ])
        .expect("parse");

        match cli.command {
            Commands::ValidatePr {
                hosts,
                incoming,
                target,
                report,
                ..
            } => {
                assert_eq!(hosts, ["web01.local", "srv01.local"]);
                assert_eq!(incoming.as_deref(), Some("dev.change_common_pillar"));
                assert!(target.is_none());
                assert!(report.hide_values);
                assert!(!report.exit_code);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_incoming_or_change_id_required() {
        assert!(Cli::try_parse_from(["citools", "validate-pr"]).is_err());
        assert!(
            Cli::try_parse_from(["citools", "validate-pr", "--incoming", "a", "--change-id", "b"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["citools", "validate-pr", "--change-id", "42"]).is_ok());
    }

    #[test]
    fn test_parse_compare_with_global_output() {
        let cli = Cli::try_parse_from([
            "citools",
            "compare",
            "base.json",
            "dev.json",
            "--host",
            "ghar01.tkclabs.io",
            "--output",
            "json",
        ])
        .expect("parse");

        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Compare { ref hosts, .. } if hosts.len() == 1));
    }

    #[test]
    fn test_parse_hosts_with_envs() {
        let cli = Cli::try_parse_from(["citools", "hosts", "--env", "base", "--env", "dev.42"])
            .expect("parse");
        assert!(matches!(cli.command, Commands::Hosts { ref envs, .. } if envs == &["base", "dev.42"]));
    }
}
