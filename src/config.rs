use crate::error::{BackupError, Result};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "games.json";

/// Backup root used when none has been configured.
pub const DEFAULT_BACKUP_DIR: &str = "GameBackups";

fn default_backup_dir() -> String {
    DEFAULT_BACKUP_DIR.to_string()
}

/// Persisted application state: the registry and the backup root.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Tracked games, name to source path.
    #[serde(default)]
    pub games: Registry,
    /// Directory that receives every snapshot.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    /// Unknown top-level keys, carried through a load/save cycle untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            games: Registry::default(),
            backup_dir: default_backup_dir(),
            extra: Map::new(),
        }
    }
}

impl AppConfig {
    pub fn backup_root(&self) -> &Path {
        Path::new(&self.backup_dir)
    }
}

/// Persistence boundary for [`AppConfig`].
pub trait ConfigStore {
    /// Reads the stored configuration.
    ///
    /// `Ok(None)` when nothing is stored yet; `ConfigCorrupt` when the
    /// document cannot be read or parsed.
    fn try_load(&self) -> Result<Option<AppConfig>>;

    fn save(&self, config: &AppConfig) -> Result<()>;

    /// Reads the stored configuration, falling back to the default.
    fn load(&self) -> AppConfig {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                log::info!("Configuration not found, using defaults");
                AppConfig::default()
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                AppConfig::default()
            }
        }
    }
}

/// Configuration stored as an indented JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

/// Serializes the config with four-space indentation.
fn to_pretty_json(config: &AppConfig) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut serializer)?;
    Ok(buf)
}

impl ConfigStore for JsonConfigStore {
    fn try_load(&self) -> Result<Option<AppConfig>> {
        log::info!("Loading configuration from: {:?}", self.path);
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BackupError::ConfigCorrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            }
        };

        let config = serde_json::from_str(&content).map_err(|e| BackupError::ConfigCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        log::info!("Configuration loaded successfully");
        Ok(Some(config))
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        let json = to_pretty_json(config)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BackupError::io(parent, e))?;
            }
        }
        fs::write(&self.path, json).map_err(|e| BackupError::io(&self.path, e))?;
        log::info!("Configuration saved successfully to {:?}", self.path);
        Ok(())
    }
}
