// Save Backup Utility by andromarces

use crate::activity_log::ActivityLog;
use crate::backup::engine::{BackupEngine, Clock};
use crate::backup::{list_snapshots, BatchResult, ItemOutcome, RetentionPolicy, Snapshot};
use crate::config::{AppConfig, ConfigStore};
use crate::error::{BackupError, Result};
use crate::registry::{GameEntry, Registry};
use std::path::Path;

/// A session over the persisted configuration.
///
/// Owns the in-memory [`AppConfig`]; every change is written back through
/// the [`ConfigStore`] and announced on the activity log. Actions take
/// `&mut self`, so a session never runs two of them at once.
pub struct SaveManager<S, L, C> {
    store: S,
    activity: L,
    clock: C,
    config: AppConfig,
}

impl<S: ConfigStore, L: ActivityLog, C: Clock> SaveManager<S, L, C> {
    /// Loads the configuration, falling back to defaults when it is missing or corrupted.
    pub fn open(store: S, activity: L, clock: C) -> Self {
        let config = match store.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => AppConfig::default(),
            Err(e) => {
                log::warn!("{}", e);
                activity
                    .record("Warning: configuration is empty or corrupted. Creating a new one.");
                AppConfig::default()
            }
        };
        Self {
            store,
            activity,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn games(&self) -> &Registry {
        &self.config.games
    }

    pub fn backup_root(&self) -> &Path {
        self.config.backup_root()
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.config)?;
        self.activity.record("Configuration saved.");
        Ok(())
    }

    /// Validates and registers a game, overwriting an entry with the same name.
    pub fn add_game(&mut self, name: &str, source_path: &str) -> Result<GameEntry> {
        let entry = GameEntry::validated(name, source_path)?;
        let previous = self.config.games.add(entry.clone());
        if let Err(e) = self.persist() {
            match previous {
                Some(path) => self.config.games.insert(entry.name.clone(), path),
                None => self.config.games.remove(&entry.name),
            };
            return Err(e);
        }
        self.activity.record(&format!("Added game: {}", entry.name));
        Ok(entry)
    }

    /// Unregisters a game. Its snapshots stay on disk.
    pub fn remove_game(&mut self, name: &str) -> Result<String> {
        let source_path = self
            .config
            .games
            .remove(name)
            .ok_or_else(|| BackupError::NotFound(name.to_string()))?;
        self.persist()?;
        self.activity.record(&format!("Removed game: {}", name));
        Ok(source_path)
    }

    /// Points the backup root somewhere else. The directory may not exist yet.
    pub fn set_backup_dir(&mut self, backup_dir: &str) -> Result<()> {
        let backup_dir = backup_dir.trim();
        if backup_dir.is_empty() {
            return Err(BackupError::Validation(
                "Please provide a backup directory.".to_string(),
            ));
        }
        self.config.backup_dir = backup_dir.to_string();
        self.persist()?;
        self.activity
            .record(&format!("Backup directory set to: {}", backup_dir));
        Ok(())
    }

    /// Existing snapshots of a registered game.
    pub fn snapshots(&self, name: &str) -> Result<Vec<Snapshot>> {
        if !self.config.games.contains(name) {
            return Err(BackupError::NotFound(name.to_string()));
        }
        list_snapshots(self.backup_root(), name)
    }

    /// Backs up every registered game under the given policy.
    pub fn backup_all(&mut self, policy: RetentionPolicy) -> BatchResult {
        let engine = BackupEngine::new(&self.clock, &self.activity);
        engine.run(policy, &self.config.games, self.config.backup_root())
    }

    /// Replaces the snapshots of one registered game.
    pub fn replace_backup(&mut self, name: &str) -> Result<ItemOutcome> {
        let engine = BackupEngine::new(&self.clock, &self.activity);
        engine.replace_registered(&self.config.games, name, self.config.backup_root())
    }
}
