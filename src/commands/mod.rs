//! Command dispatch and handlers.

pub mod fetch;
pub mod report;
pub mod status;
pub mod track;

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler with a live context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let ctx = ServiceContext::live(Path::new("logs"));
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    dispatch_with_context(&ctx, &data_dir, &cli.command)
}

/// Dispatch a command with the given context and data directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    ctx: &ServiceContext,
    data_dir: &Path,
    command: &Command,
) -> Result<(), String> {
    match command {
        Command::Fetch { icb } => fetch::run(ctx, data_dir, icb),
        Command::Report => report::run(ctx, data_dir),
        Command::Track => track::run(ctx, data_dir),
        Command::Status => status::run(ctx, data_dir),
    }
}

/// Resolves the data directory: flag, then `ODSWATCH_DATA`, then `data`.
fn resolve_data_dir(flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(
        || env::var("ODSWATCH_DATA").map_or_else(|_| PathBuf::from("data"), PathBuf::from),
        Path::to_path_buf,
    )
}
