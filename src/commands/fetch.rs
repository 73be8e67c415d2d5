//! `odswatch fetch` command.

use std::collections::BTreeMap;
use std::path::Path;

use crate::context::ServiceContext;
use crate::org::normalize::normalize;
use crate::org::{COMMISSIONED_BY_REL, OPERATED_BY_REL};
use crate::snapshot::store::SnapshotStore;
use crate::snapshot::Snapshot;

/// Execute the `fetch` command.
///
/// Searches the directory for organisations commissioned by or operated by
/// the given ICB, fetches full detail for each, keeps practices and
/// networks, and saves a dated snapshot. If today's snapshot already exists
/// it is left untouched. Per-organisation retrieval or normalization
/// failures are logged and skipped; they never abort the run.
///
/// # Errors
///
/// Returns an error string if the search itself or the snapshot write
/// fails.
pub fn run(ctx: &ServiceContext, data_dir: &Path, icb: &str) -> Result<(), String> {
    let store = SnapshotStore::new(ctx, data_dir);
    let today = ctx.clock.today();

    if store.has_snapshot_for(today) {
        let filename = SnapshotStore::snapshot_filename(today);
        ctx.diag.info(&format!("Snapshot {filename} already exists, nothing to fetch"));
        println!("Snapshot for today already exists: {filename}");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    let rel_types = format!("{COMMISSIONED_BY_REL},{OPERATED_BY_REL}");
    let summaries = runtime
        .block_on(ctx.directory.search_related(&rel_types, icb))
        .map_err(|e| format!("Failed to search directory for {icb}: {e}"))?;
    ctx.diag.info(&format!("Found {} organisations related to {icb}", summaries.len()));

    let mut organisations = BTreeMap::new();
    for summary in &summaries {
        let envelope = match runtime.block_on(ctx.directory.organisation(&summary.code)) {
            Ok(envelope) => envelope,
            Err(e) => {
                ctx.diag.warn(&format!("Skipping {}: {e}", summary.code));
                continue;
            }
        };

        match normalize(&envelope) {
            Ok(org) if org.is_practice() || org.is_network() => {
                organisations.insert(org.code.clone(), org);
            }
            // Related but neither a practice nor a network: out of scope.
            Ok(_) => {}
            Err(e) => ctx.diag.warn(&format!("Skipping malformed record: {e}")),
        }
    }

    let snapshot = Snapshot::new(icb.to_string(), ctx.clock.now(), organisations);
    let practices = snapshot.practices().count();
    let networks = snapshot.networks().count();
    let path = store.save(&snapshot, today)?;

    ctx.diag.info(&format!(
        "Saved {} organisations to {}",
        snapshot.metadata.total_count,
        path.display()
    ));
    println!(
        "Saved {} organisations ({practices} practices, {networks} networks) to {}",
        snapshot.metadata.total_count,
        path.display()
    );
    Ok(())
}
