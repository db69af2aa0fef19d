//! Backup record and the slice of host workout state the controller reads.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BackupError, Result};

/// The single persisted backup snapshot.
///
/// Stored as JSON under the backup key:
/// `{"state": ..., "date": ..., "timestamp": ..., "exercises": ..., "time": ..., "calories": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Raw serialized workout state, copied verbatim.
    pub state: String,

    /// Host workout date, copied verbatim. `None` serializes as `null`.
    pub date: Option<String>,

    /// ISO-8601 creation time.
    pub timestamp: String,

    /// Completed exercises as displayed when the backup was taken.
    pub exercises: String,

    /// Workout time as displayed.
    pub time: String,

    /// Calories burned as displayed.
    pub calories: String,
}

/// Display text captured from the host page alongside a backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub exercises: String,
    pub time: String,
    pub calories: String,
}

impl BackupRecord {
    pub fn new(
        state: String,
        date: Option<String>,
        created_at: DateTime<Utc>,
        display: DisplaySnapshot,
    ) -> Self {
        Self {
            state,
            date,
            timestamp: format_timestamp(created_at),
            exercises: display.exercises,
            time: display.time,
            calories: display.calories,
        }
    }

    /// Parse a stored backup. Any malformed input is a corrupted backup.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|source| BackupError::CorruptedBackup { source })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Creation time, or `None` when the timestamp does not parse.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Format an instant the way browsers print `Date.toISOString()`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The fields of the host's workout state that drive auto-backup and reset.
///
/// Everything else in the host record is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutStatus {
    pub is_active: bool,
    pub is_paused: bool,
    pub completed_exercises: i64,
}

impl WorkoutStatus {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|source| BackupError::UnreadableState { source })
    }

    /// A running, unpaused workout is worth backing up periodically.
    pub fn is_running(&self) -> bool {
        self.is_active && !self.is_paused
    }

    /// Progress exists that a reset would throw away.
    pub fn has_progress(&self) -> bool {
        self.completed_exercises > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_record() -> BackupRecord {
        let created = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        BackupRecord::new(
            r#"{"isActive":true,"isPaused":false,"completedExercises":3}"#.to_string(),
            Some("Sun Oct 18 2026".to_string()),
            created,
            DisplaySnapshot {
                exercises: "3".to_string(),
                time: "12:40".to_string(),
                calories: "96".to_string(),
            },
        )
    }

    #[test]
    fn test_timestamp_matches_iso_string_format() {
        let record = sample_record();
        assert_eq!(record.timestamp, "2026-10-18T09:30:00.000Z");
        assert_eq!(
            record.created_at(),
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_stored_shape_uses_page_field_names() {
        let json = sample_record().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["calories", "date", "exercises", "state", "time", "timestamp"]
        );
        // state stays a string, not a nested object
        assert!(object["state"].is_string());
    }

    #[test]
    fn test_missing_date_is_null() {
        let mut record = sample_record();
        record.date = None;
        let json = record.to_json().unwrap();
        assert!(json.contains(r#""date":null"#));
        assert_eq!(BackupRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_corrupted_backup_error() {
        let err = BackupRecord::from_json("not json at all").unwrap_err();
        assert!(matches!(err, BackupError::CorruptedBackup { .. }));
    }

    #[test]
    fn test_unparseable_timestamp() {
        let mut record = sample_record();
        record.timestamp = "yesterday-ish".to_string();
        assert!(record.created_at().is_none());
    }

    #[test]
    fn test_workout_status_defaults_and_extra_fields() {
        let status = WorkoutStatus::parse(r#"{"isActive":true,"currentExercise":4}"#).unwrap();
        assert!(status.is_active);
        assert!(!status.is_paused);
        assert_eq!(status.completed_exercises, 0);
        assert!(status.is_running());
        assert!(!status.has_progress());
    }

    #[test]
    fn test_workout_status_paused_not_running() {
        let status =
            WorkoutStatus::parse(r#"{"isActive":true,"isPaused":true,"completedExercises":3}"#)
                .unwrap();
        assert!(!status.is_running());
        assert!(status.has_progress());
    }
}
