//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the core (normalization,
//! resolution, diffing, aggregation) and an external system: time, disk,
//! diagnostics, and the ODS directory over HTTP. Implementations live in
//! `src/adapters/`; the core itself performs no I/O and holds no
//! process-wide state.

pub mod clock;
pub mod diagnostics;
pub mod directory;
pub mod filesystem;

pub use clock::Clock;
pub use diagnostics::Diagnostics;
pub use directory::{DirectoryApi, DirectoryFuture, OrgSummary};
pub use filesystem::FileSystem;
