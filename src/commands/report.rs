//! `odswatch report` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::report::{
    network_rows, practice_rows, to_csv, NetworkRow, PracticeRow, NETWORK_HEADERS,
    PRACTICE_HEADERS,
};
use crate::snapshot::store::SnapshotStore;

/// Execute the `report` command.
///
/// Flattens the latest snapshot into practice and network rows and writes
/// `practices.csv` and `networks.csv` into the data directory.
///
/// # Errors
///
/// Returns an error string when no snapshot exists or a write fails.
pub fn run(ctx: &ServiceContext, data_dir: &Path) -> Result<(), String> {
    let store = SnapshotStore::new(ctx, data_dir);
    let Some((name, snapshot)) = store.load_latest()? else {
        return Err(format!(
            "No snapshots found in {}; run `odswatch fetch` first",
            data_dir.display()
        ));
    };
    ctx.diag.info(&format!("Building reports from {name}"));

    let practices = practice_rows(&snapshot);
    let networks = network_rows(&snapshot);

    let practice_records: Vec<Vec<String>> = practices.iter().map(PracticeRow::fields).collect();
    let practices_path = data_dir.join("practices.csv");
    ctx.fs
        .write(&practices_path, &to_csv(PRACTICE_HEADERS, &practice_records))
        .map_err(|e| format!("Failed to write {}: {e}", practices_path.display()))?;

    let network_records: Vec<Vec<String>> = networks.iter().map(NetworkRow::fields).collect();
    let networks_path = data_dir.join("networks.csv");
    ctx.fs
        .write(&networks_path, &to_csv(NETWORK_HEADERS, &network_records))
        .map_err(|e| format!("Failed to write {}: {e}", networks_path.display()))?;

    println!(
        "Wrote {} practices and {} networks from {name} to {}",
        practices.len(),
        networks.len(),
        data_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::memory_context;
    use crate::snapshot::fixtures::{network, practice, snapshot};

    #[test]
    fn report_writes_both_csv_files() {
        let ctx = memory_context();
        let data_dir = Path::new("/data");
        let store = SnapshotStore::new(&ctx, data_dir);
        store
            .save(
                &snapshot(vec![
                    practice("A81001", "EXAMPLE SURGERY", Some(("U1", "2020-07-01"))),
                    network("U1", "EXAMPLE PCN"),
                ]),
                "2024-03-20".parse().unwrap(),
            )
            .unwrap();

        run(&ctx, data_dir).unwrap();

        let practices = ctx.fs.read_to_string(Path::new("/data/practices.csv")).unwrap();
        assert!(practices.starts_with("ODS Code,Name,Status"));
        assert!(practices.contains("EXAMPLE SURGERY"));
        assert!(practices.contains("EXAMPLE PCN"));

        let networks = ctx.fs.read_to_string(Path::new("/data/networks.csv")).unwrap();
        assert!(networks.contains("EXAMPLE PCN"));
        // One member practice resolved through the shared resolver.
        assert!(networks.contains("EXAMPLE SURGERY (A81001, from 2020-07-01)"));
    }

    #[test]
    fn report_requires_a_snapshot() {
        let ctx = memory_context();
        let err = run(&ctx, Path::new("/data")).unwrap_err();
        assert!(err.contains("No snapshots found"));
    }
}
