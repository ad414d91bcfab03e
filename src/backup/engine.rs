// Save Backup Utility by andromarces

use super::cleanup::{delete_snapshots_with, FsRemover, SnapshotRemover};
use super::create::create_snapshot;
use super::data::{BatchResult, DeleteReport, ItemOutcome, RetentionPolicy, SOURCE_MISSING_REASON};
use super::listing::list_snapshots;
use super::resolve::classify;
use crate::activity_log::ActivityLog;
use crate::error::{BackupError, Result};
use crate::registry::Registry;
use chrono::{Local, NaiveDateTime};
use std::path::Path;

/// Source of the instant used to name snapshots.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Runs backups over the registry and reports per-game outcomes.
///
/// Games are processed one at a time in registry order. Callers must not
/// run two batches against the same backup root concurrently.
pub struct BackupEngine<C, L, R = FsRemover> {
    clock: C,
    activity: L,
    remover: R,
}

impl<C: Clock, L: ActivityLog> BackupEngine<C, L> {
    pub fn new(clock: C, activity: L) -> Self {
        Self::with_remover(clock, activity, FsRemover)
    }
}

impl<C: Clock, L: ActivityLog, R: SnapshotRemover> BackupEngine<C, L, R> {
    /// Builds an engine that deletes old snapshots through `remover`.
    pub fn with_remover(clock: C, activity: L, remover: R) -> Self {
        Self {
            clock,
            activity,
            remover,
        }
    }

    /// Backs up every game, deleting its old snapshots first.
    ///
    /// Old snapshots are removed before the new copy is attempted, so a
    /// failed copy leaves the game without a complete snapshot.
    // TODO: create the new snapshot first and delete old ones only after it succeeded.
    pub fn run_replace(&self, registry: &Registry, backup_root: &Path) -> BatchResult {
        self.run(RetentionPolicy::Replace, registry, backup_root)
    }

    /// Backs up every game and keeps all earlier snapshots.
    pub fn run_preserve(&self, registry: &Registry, backup_root: &Path) -> BatchResult {
        self.run(RetentionPolicy::Preserve, registry, backup_root)
    }

    /// Runs a batch under the given retention policy.
    pub fn run(
        &self,
        policy: RetentionPolicy,
        registry: &Registry,
        backup_root: &Path,
    ) -> BatchResult {
        let mut result = BatchResult::new(policy);
        if registry.is_empty() {
            self.activity.record("No games are configured for backup.");
            return result;
        }

        self.activity.record(&format!(
            "Starting backup of all games ({})...",
            policy.describe_start()
        ));

        for (game_name, source_path) in registry.iter() {
            let source = Path::new(source_path);
            if !classify(source).exists() {
                self.activity.record(&format!(
                    "Warning: Source path for '{}' does not exist. Skipping.",
                    game_name
                ));
                result.push(
                    game_name,
                    ItemOutcome::Skipped {
                        reason: SOURCE_MISSING_REASON.to_string(),
                    },
                );
                continue;
            }

            if policy == RetentionPolicy::Replace {
                let report = self.remove_old_snapshots(game_name, backup_root);
                result.absorb_deletions(report);
            }

            let outcome = match create_snapshot(backup_root, game_name, source, self.clock.now())
            {
                Ok(snapshot) => {
                    self.activity.record(&format!(
                        "Backed up '{}' to '{}'",
                        game_name,
                        snapshot.path.display()
                    ));
                    ItemOutcome::Succeeded { snapshot }
                }
                Err(error) => {
                    self.activity
                        .record(&format!("Error backing up '{}': {}", game_name, error));
                    ItemOutcome::Failed { error }
                }
            };
            result.push(game_name, outcome);
        }

        self.activity.record(&result.summary());
        result
    }

    /// Replaces the snapshots of a single game.
    ///
    /// Same ordering as [`BackupEngine::run_replace`]: existing snapshots are
    /// deleted before the new copy is attempted.
    pub fn replace_one(
        &self,
        game_name: &str,
        source_path: &str,
        backup_root: &Path,
    ) -> ItemOutcome {
        let source = Path::new(source_path);
        if !classify(source).exists() {
            self.activity.record(&format!(
                "Warning: Source path for '{}' does not exist. Skipping.",
                game_name
            ));
            return ItemOutcome::Skipped {
                reason: SOURCE_MISSING_REASON.to_string(),
            };
        }

        self.remove_old_snapshots(game_name, backup_root);

        match create_snapshot(backup_root, game_name, source, self.clock.now()) {
            Ok(snapshot) => {
                self.activity.record(&format!(
                    "Created new backup for '{}' at '{}'",
                    game_name,
                    snapshot.path.display()
                ));
                ItemOutcome::Succeeded { snapshot }
            }
            Err(error) => {
                self.activity
                    .record(&format!("Error creating backup for '{}': {}", game_name, error));
                ItemOutcome::Failed { error }
            }
        }
    }

    /// Looks the game up in the registry and replaces its snapshots.
    pub fn replace_registered(
        &self,
        registry: &Registry,
        game_name: &str,
        backup_root: &Path,
    ) -> Result<ItemOutcome> {
        let source_path = registry
            .get(game_name)
            .ok_or_else(|| BackupError::NotFound(game_name.to_string()))?;
        Ok(self.replace_one(game_name, source_path, backup_root))
    }

    /// Deletes every existing snapshot of a game, logging each attempt.
    ///
    /// A backup root that cannot be listed counts as one failed deletion.
    fn remove_old_snapshots(&self, game_name: &str, backup_root: &Path) -> DeleteReport {
        let existing = match list_snapshots(backup_root, game_name) {
            Ok(existing) => existing,
            Err(e) => {
                log::error!("Failed to list snapshots for '{}': {}", game_name, e);
                self.activity.record(&format!(
                    "Error listing old backups for '{}': {}",
                    game_name, e
                ));
                let mut report = DeleteReport::default();
                report.failures.push(e);
                return report;
            }
        };
        let report = delete_snapshots_with(&self.remover, &existing);
        for path in &report.deleted {
            self.activity
                .record(&format!("Deleted old backup: {}", path.display()));
        }
        for failure in &report.failures {
            match failure {
                BackupError::Delete { path, source } => self.activity.record(&format!(
                    "Error deleting old backup {}: {}",
                    path.display(),
                    source
                )),
                other => self
                    .activity
                    .record(&format!("Error deleting old backup: {}", other)),
            }
        }
        report
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::cell::Cell;

    /// Returns a fixed instant, advancing by `step` after every call.
    pub(crate) struct FixedClock {
        next: Cell<NaiveDateTime>,
        step: Duration,
    }

    impl FixedClock {
        pub(crate) fn at(instant: NaiveDateTime) -> Self {
            Self {
                next: Cell::new(instant),
                step: Duration::zero(),
            }
        }

        pub(crate) fn stepping(instant: NaiveDateTime, step: Duration) -> Self {
            Self {
                next: Cell::new(instant),
                step,
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            let current = self.next.get();
            self.next.set(current + self.step);
            current
        }
    }

    pub(crate) fn instant(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }
}
