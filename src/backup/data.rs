use crate::error::BackupError;
use crate::filename_utils;
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};

/// Reason attached to items whose source path is gone at backup time.
pub const SOURCE_MISSING_REASON: &str = "source missing";

/// One timestamped copy of a game's save data under the backup root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The registry key of the game this snapshot belongs to.
    pub game_name: String,
    /// Everything after `{game}_backup_` in the entry name.
    pub timestamp: String,
    /// Full path of the snapshot entry (a directory or a single file).
    pub path: PathBuf,
}

impl Snapshot {
    /// Describes the snapshot a game gets at the given instant under `backup_root`.
    pub fn planned(backup_root: &Path, game_name: &str, instant: NaiveDateTime) -> Self {
        Self {
            game_name: game_name.to_string(),
            timestamp: filename_utils::format_snapshot_timestamp(instant),
            path: backup_root.join(filename_utils::format_snapshot_name(game_name, instant)),
        }
    }

    /// The entry name, e.g. `Foo_backup_2024-01-01_12-00-00`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Parsed creation time, if the suffix follows the fixed timestamp layout.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        filename_utils::parse_snapshot_timestamp(&self.timestamp)
    }
}

/// Retention mode applied by a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep at most one snapshot per game.
    Replace,
    /// Keep every snapshot ever created.
    Preserve,
}

impl RetentionPolicy {
    /// Wording used in activity log lines.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            RetentionPolicy::Replace => "old backups replaced",
            RetentionPolicy::Preserve => "old backups preserved",
        }
    }

    pub(crate) fn describe_start(self) -> &'static str {
        match self {
            RetentionPolicy::Replace => "replacing old backups",
            RetentionPolicy::Preserve => "preserving old backups",
        }
    }
}

/// Final state of a single game within a run.
#[derive(Debug)]
pub enum ItemOutcome {
    Skipped { reason: String },
    Succeeded { snapshot: Snapshot },
    Failed { error: BackupError },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Succeeded { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ItemOutcome::Skipped { .. })
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Skipped { reason } => write!(f, "skipped ({})", reason),
            ItemOutcome::Succeeded { snapshot } => {
                write!(f, "backed up to {}", snapshot.path.display())
            }
            ItemOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// Outcome for one game, keyed by its registry name.
#[derive(Debug)]
pub struct ItemReport {
    pub game: String,
    pub outcome: ItemOutcome,
}

/// Result of deleting a set of snapshots; each attempt is independent.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<BackupError>,
}

impl DeleteReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Aggregated per-item results of one batch invocation.
#[derive(Debug)]
pub struct BatchResult {
    pub policy: RetentionPolicy,
    /// Games visited, skipped ones included.
    pub attempted: usize,
    pub succeeded: usize,
    pub items: Vec<ItemReport>,
    /// Old snapshots removed under the replace policy.
    pub deleted: usize,
    /// Old snapshots that could not be removed.
    pub delete_failures: Vec<BackupError>,
}

impl BatchResult {
    pub(crate) fn new(policy: RetentionPolicy) -> Self {
        Self {
            policy,
            attempted: 0,
            succeeded: 0,
            items: Vec::new(),
            deleted: 0,
            delete_failures: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, game: &str, outcome: ItemOutcome) {
        self.attempted += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        }
        self.items.push(ItemReport {
            game: game.to_string(),
            outcome,
        });
    }

    pub(crate) fn absorb_deletions(&mut self, report: DeleteReport) {
        self.deleted += report.deleted.len();
        self.delete_failures.extend(report.failures);
    }

    /// Looks up the outcome recorded for a game.
    pub fn outcome_for(&self, game: &str) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|item| item.game == game)
            .map(|item| &item.outcome)
    }

    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Failed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.outcome.is_skipped())
            .count()
    }

    /// Human-readable count line closing every run.
    pub fn summary(&self) -> String {
        format!(
            "Backup completed. {} of {} games backed up ({}).",
            self.succeeded,
            self.attempted,
            self.policy.describe()
        )
    }
}
