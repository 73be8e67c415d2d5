//! `odswatch status` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::org::OrgStatus;
use crate::snapshot::store::SnapshotStore;

/// Execute the `status` command.
///
/// Prints summary statistics for the latest snapshot (organisation,
/// practice, and network counts with the active/inactive split) and the
/// number of recorded change-log entries.
///
/// # Errors
///
/// Returns an error string if the store cannot be read.
pub fn run(ctx: &ServiceContext, data_dir: &Path) -> Result<(), String> {
    let store = SnapshotStore::new(ctx, data_dir);
    let Some((name, snapshot)) = store.load_latest()? else {
        println!("No snapshots found in {}.", data_dir.display());
        return Ok(());
    };

    let practices: Vec<_> = snapshot.practices().collect();
    let active_practices =
        practices.iter().filter(|org| org.status == OrgStatus::Active).count();
    let networks = snapshot.networks().count();
    let log = store.load_change_log()?;

    println!("Latest snapshot: {name}");
    println!("  Source: {}", snapshot.metadata.source_id);
    println!("  Retrieved: {}", snapshot.metadata.retrieved_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Organisations: {}", snapshot.metadata.total_count);
    println!(
        "  Practices: {} ({} active, {} inactive)",
        practices.len(),
        active_practices,
        practices.len() - active_practices,
    );
    println!("  Networks: {networks}");
    println!("Change log entries: {}", log.changes.len());
    Ok(())
}
