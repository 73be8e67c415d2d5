//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `odswatch`.
#[derive(Debug, Parser)]
#[command(name = "odswatch", version, about = "Track GP Practice and PCN changes in the NHS ODS directory")]
pub struct Cli {
    /// Data directory for snapshots, reports, and the change log.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Retrieve today's data from the ODS directory and save a snapshot.
    Fetch {
        /// ODS code of the ICB to scope the retrieval to.
        #[arg(long, default_value = "93C")]
        icb: String,
    },
    /// Write practice and network CSV reports from the latest snapshot.
    Report,
    /// Compare the two latest snapshots and append detected changes.
    Track,
    /// Show summary statistics for the latest snapshot and change log.
    Status,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_fetch_with_default_icb() {
        let cli = Cli::parse_from(["odswatch", "fetch"]);
        match cli.command {
            Command::Fetch { icb } => assert_eq!(icb, "93C"),
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn parses_fetch_with_explicit_icb() {
        let cli = Cli::parse_from(["odswatch", "fetch", "--icb", "15E"]);
        match cli.command {
            Command::Fetch { icb } => assert_eq!(icb, "15E"),
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn parses_track_subcommand() {
        let cli = Cli::parse_from(["odswatch", "track"]);
        assert!(matches!(cli.command, Command::Track));
    }

    #[test]
    fn data_dir_flag_is_global() {
        let cli = Cli::parse_from(["odswatch", "status", "--data-dir", "/tmp/ods"]);
        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/tmp/ods")));
    }
}
