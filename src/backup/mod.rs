pub mod cleanup;
pub mod create;
pub mod data;
pub mod engine;
pub mod listing;
pub mod resolve;


// Re-export public API to ease use from the manager and the CLI
pub use cleanup::{
    delete_snapshot, delete_snapshots, delete_snapshots_with, FsRemover, SnapshotRemover,
};
pub use create::create_snapshot;
pub use data::{BatchResult, DeleteReport, ItemOutcome, ItemReport, RetentionPolicy, Snapshot};
pub use engine::{BackupEngine, Clock, SystemClock};
pub use listing::list_snapshots;
pub use resolve::{classify, EntryKind};
