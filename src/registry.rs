use crate::backup::resolve::classify;
use crate::error::{BackupError, Result};
use crate::filename_utils::check_game_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A tracked game and the save location it is backed up from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    pub name: String,
    pub source_path: String,
}

impl GameEntry {
    /// Trims and validates user input for a new entry.
    ///
    /// Both fields must be non-empty, the name must not contain path
    /// separators and the source must exist right now.
    pub fn validated(name: &str, source_path: &str) -> Result<Self> {
        let name = name.trim();
        let source_path = source_path.trim();
        if name.is_empty() || source_path.is_empty() {
            return Err(BackupError::Validation(
                "Please provide both a game name and save path.".to_string(),
            ));
        }
        check_game_name(name)?;
        if !classify(Path::new(source_path)).exists() {
            return Err(BackupError::Validation(format!(
                "The path '{}' does not exist.",
                source_path
            )));
        }
        Ok(Self {
            name: name.to_string(),
            source_path: source_path.to_string(),
        })
    }
}

/// Name to source-path mapping of tracked games, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry(IndexMap<String, String>);

impl Registry {
    /// Inserts or overwrites a game. Overwriting keeps the original position.
    ///
    /// Returns the previous source path, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        source_path: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(name.into(), source_path.into())
    }

    /// Adds a validated entry.
    pub fn add(&mut self, entry: GameEntry) -> Option<String> {
        self.insert(entry.name, entry.source_path)
    }

    /// Removes a game, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn entries(&self) -> Vec<GameEntry> {
        self.iter()
            .map(|(name, source_path)| GameEntry {
                name: name.to_string(),
                source_path: source_path.to_string(),
            })
            .collect()
    }
}

impl<N: Into<String>, P: Into<String>> FromIterator<(N, P)> for Registry {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        Registry(
            iter.into_iter()
                .map(|(n, p)| (n.into(), p.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Tests that insertion order is kept and overwrites stay in place.
    #[test]
    fn test_insertion_order_and_overwrite() {
        let mut registry = Registry::default();
        registry.insert("Zelda", "/z");
        registry.insert("Alpha", "/a");
        registry.insert("Mid", "/m");
        assert_eq!(registry.insert("Alpha", "/a2"), Some("/a".to_string()));

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["Zelda", "Alpha", "Mid"]);
        assert_eq!(registry.get("Alpha"), Some("/a2"));
        assert_eq!(registry.len(), 3);
    }

    /// Tests that adding then removing a new game restores the prior registry.
    #[test]
    fn test_add_then_remove_round_trip() {
        let dir = tempdir().unwrap();
        let mut registry: Registry = [("Foo", "/foo"), ("Bar", "/bar")].into_iter().collect();
        let before = registry.clone();

        let entry = GameEntry::validated("Baz", &dir.path().to_string_lossy()).unwrap();
        registry.add(entry);
        assert!(registry.contains("Baz"));
        registry.remove("Baz");

        assert_eq!(registry, before);
    }

    /// Tests validation of empty fields, nested names and missing paths.
    #[test]
    fn test_validated_rejects_bad_input() {
        let dir = tempdir().unwrap();
        let existing = dir.path().to_string_lossy().to_string();

        assert!(matches!(
            GameEntry::validated("  ", &existing),
            Err(BackupError::Validation(_))
        ));
        assert!(matches!(
            GameEntry::validated("Foo", ""),
            Err(BackupError::Validation(_))
        ));
        let missing = dir.path().join("missing").to_string_lossy().to_string();
        assert!(matches!(
            GameEntry::validated("Foo", &missing),
            Err(BackupError::Validation(_))
        ));

        assert!(matches!(
            GameEntry::validated("Studio/Game", &existing),
            Err(BackupError::Validation(_))
        ));

        let entry = GameEntry::validated(" Foo ", &format!(" {} ", existing)).unwrap();
        assert_eq!(entry.name, "Foo");
        assert_eq!(entry.source_path, existing);
    }

    /// Tests that the registry serializes as a plain ordered JSON object.
    #[test]
    fn test_registry_serialization() {
        let registry: Registry = [("B", "/b"), ("A", "/a")].into_iter().collect();
        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"{"B":"/b","A":"/a"}"#);

        let back: Registry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["B", "A"]);
    }
}
