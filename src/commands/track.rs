//! `odswatch track` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::snapshot::diff::diff_snapshots;
use crate::snapshot::store::SnapshotStore;

/// Execute the `track` command.
///
/// Compares the two most recent snapshots, appends detected changes to the
/// tracked-changes log, and prints the per-class summary. With fewer than
/// two snapshots the run aborts cleanly: the error is reported and the log
/// is left untouched.
///
/// # Errors
///
/// Returns an error string when fewer than two snapshots exist or file I/O
/// fails.
pub fn run(ctx: &ServiceContext, data_dir: &Path) -> Result<(), String> {
    let store = SnapshotStore::new(ctx, data_dir);
    let ((previous_name, previous), (latest_name, latest)) = store.load_latest_pair()?;
    ctx.diag.info(&format!("Comparing {previous_name} with {latest_name}"));

    let report = diff_snapshots(&previous, &latest);
    if report.is_empty() {
        ctx.diag.info("No changes detected");
        println!("No changes detected between {previous_name} and {latest_name}.");
        return Ok(());
    }

    let mut log = store.load_change_log()?;
    let summary = log
        .append_run(ctx.clock.today(), &previous_name, &latest_name, report)
        .cloned()
        .ok_or_else(|| "Change log rejected a non-empty report".to_string())?;
    store.save_change_log(&log)?;
    ctx.diag.info(&format!("Appended {} changes to the change log", summary.total_changes));

    println!("Changes between {previous_name} and {latest_name}:");
    println!("  Total: {}", summary.total_changes);
    println!(
        "  Practices: {} ({} new, {} closed, {} status, {} membership)",
        summary.practice_changes.total,
        summary.practice_changes.new,
        summary.practice_changes.closed,
        summary.practice_changes.status,
        summary.practice_changes.membership,
    );
    println!(
        "  Networks: {} ({} new, {} closed, {} status)",
        summary.network_changes.total,
        summary.network_changes.new,
        summary.network_changes.closed,
        summary.network_changes.status,
    );
    Ok(())
}
