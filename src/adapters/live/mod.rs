//! Live adapters backed by the real clock, disk, stderr, and HTTP.

pub mod clock;
pub mod diagnostics;
pub mod directory;
pub mod filesystem;

pub use clock::LiveClock;
pub use diagnostics::FileDiagnostics;
pub use directory::LiveDirectoryClient;
pub use filesystem::LiveFileSystem;
