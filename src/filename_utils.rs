use crate::error::{BackupError, Result};
use chrono::NaiveDateTime;

/// Separator between the game name and the timestamp in a snapshot name.
pub const SNAPSHOT_SEPARATOR: &str = "_backup_";

/// Timestamp layout used in snapshot names (second resolution).
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Returns the prefix shared by every snapshot of a game, e.g. `Foo_backup_`.
pub fn snapshot_prefix(game_name: &str) -> String {
    format!("{}{}", game_name, SNAPSHOT_SEPARATOR)
}

/// Formats the instant the way snapshot names carry it.
pub fn format_snapshot_timestamp(instant: NaiveDateTime) -> String {
    instant.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string()
}

/// Builds the snapshot name for a game at the given instant.
///
/// Format: `{game}_backup_YYYY-MM-DD_HH-MM-SS`. Two calls for the same game
/// within the same second yield the same name.
///
/// # Arguments
///
/// * `game_name` - The registry key of the game.
/// * `instant` - Local wall-clock time of the backup.
pub fn format_snapshot_name(game_name: &str, instant: NaiveDateTime) -> String {
    format!(
        "{}{}",
        snapshot_prefix(game_name),
        format_snapshot_timestamp(instant)
    )
}

/// Parses the timestamp part of a snapshot name.
///
/// Returns None when the suffix does not follow the fixed layout.
pub fn parse_snapshot_timestamp(suffix: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(suffix, SNAPSHOT_TIMESTAMP_FORMAT).ok()
}

/// Checks that a game name can stand as the leading part of a single entry name.
///
/// Separators would place snapshots in subdirectories of the backup root,
/// where listing by prefix no longer finds them.
pub fn check_game_name(game_name: &str) -> Result<()> {
    if game_name.contains(['/', '\\']) || game_name == "." || game_name == ".." {
        return Err(BackupError::Validation(format!(
            "Game name '{}' must not contain path separators.",
            game_name
        )));
    }
    Ok(())
}

/// Returns the suffix after the game's prefix if `entry_name` belongs to that game.
pub fn strip_snapshot_prefix<'a>(entry_name: &'a str, game_name: &str) -> Option<&'a str> {
    entry_name.strip_prefix(snapshot_prefix(game_name).as_str())
}
