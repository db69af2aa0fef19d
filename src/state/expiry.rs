//! Backup expiry
//!
//! Expiry is lazy: a stale backup is only deleted when someone inspects it.
//! Age is the absolute distance from now, so a backup stamped in the future
//! (clock skew) still counts as fresh.

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error::Result;
use crate::state::record::BackupRecord;
use crate::state::storage::KeyValueStore;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Outcome of inspecting the stored backup.
#[derive(Debug, Clone, PartialEq)]
pub enum BackupStatus {
    /// No backup stored.
    Missing,

    /// A backup inside the expiry window.
    Valid {
        record: BackupRecord,
        created_at: DateTime<Utc>,
        age_hours: f64,
    },

    /// The backup was past the window (or had no usable timestamp) and was deleted.
    Expired { age_hours: Option<f64> },
}

impl BackupStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, BackupStatus::Valid { .. })
    }
}

/// Absolute elapsed time between two instants, in hours.
pub fn elapsed_hours(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    now.signed_duration_since(then).num_milliseconds().abs() as f64 / MILLIS_PER_HOUR
}

/// Closed bound: exactly `expiry_hours` old is still valid.
pub fn is_expired(age_hours: f64, expiry_hours: f64) -> bool {
    age_hours > expiry_hours
}

/// Inspect the backup under `key`, deleting it if it has expired.
///
/// A record that is not valid JSON is left in place and reported as
/// `BackupError::CorruptedBackup`.
pub fn check_backup<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    now: DateTime<Utc>,
    expiry_hours: f64,
) -> Result<BackupStatus> {
    let raw = match store.get(key)? {
        Some(raw) => raw,
        None => return Ok(BackupStatus::Missing),
    };

    let record = BackupRecord::from_json(&raw)?;

    let Some(created_at) = record.created_at() else {
        info!("Backup timestamp '{}' is unreadable, removing backup", record.timestamp);
        store.remove(key)?;
        return Ok(BackupStatus::Expired { age_hours: None });
    };

    let age_hours = elapsed_hours(now, created_at);
    if is_expired(age_hours, expiry_hours) {
        info!("Removing expired backup ({:.2} hours old)", age_hours);
        store.remove(key)?;
        return Ok(BackupStatus::Expired {
            age_hours: Some(age_hours),
        });
    }

    debug!("Backup from {} is {:.2} hours old", record.timestamp, age_hours);
    Ok(BackupStatus::Valid {
        record,
        created_at,
        age_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackupError;
    use crate::state::record::DisplaySnapshot;
    use crate::state::storage::MemoryStore;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    const KEY: &str = "eliteTimerBackup";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn store_with_backup_at(created: DateTime<Utc>) -> MemoryStore {
        let record = BackupRecord::new(
            "{}".to_string(),
            None,
            created,
            DisplaySnapshot::default(),
        );
        let mut store = MemoryStore::new();
        store.set(KEY, &record.to_json().unwrap()).unwrap();
        store
    }

    #[test]
    fn test_elapsed_hours_is_absolute() {
        let later = now() + Duration::minutes(90);
        assert_relative_eq!(elapsed_hours(now(), later), 1.5);
        assert_relative_eq!(elapsed_hours(later, now()), 1.5);
    }

    #[test_case(Duration::hours(1), true ; "one hour old")]
    #[test_case(Duration::hours(24), true ; "exactly at the window")]
    #[test_case(Duration::microseconds(86_400_003_600), false ; "a millionth of an hour past the window")]
    #[test_case(Duration::hours(48), false ; "two days old")]
    #[test_case(Duration::hours(-30), false ; "far future counts by distance")]
    #[test_case(Duration::hours(-2), true ; "near future from clock skew")]
    fn test_check_backup_window(age: Duration, valid: bool) {
        let mut store = store_with_backup_at(now() - age);
        let status = check_backup(&mut store, KEY, now(), 24.0).unwrap();

        assert_eq!(status.is_valid(), valid);
        assert_eq!(store.get(KEY).unwrap().is_some(), valid);
    }

    #[test]
    fn test_missing_backup() {
        let mut store = MemoryStore::new();
        let status = check_backup(&mut store, KEY, now(), 24.0).unwrap();
        assert_eq!(status, BackupStatus::Missing);
    }

    #[test]
    fn test_unreadable_timestamp_is_removed() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY,
                r#"{"state":"{}","date":null,"timestamp":"garbage","exercises":"0","time":"0:00","calories":"0"}"#,
            )
            .unwrap();

        let status = check_backup(&mut store, KEY, now(), 24.0).unwrap();
        assert_eq!(status, BackupStatus::Expired { age_hours: None });
        assert!(store.get(KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupted_backup_is_kept() {
        let mut store = MemoryStore::new();
        store.set(KEY, "{{{").unwrap();

        let err = check_backup(&mut store, KEY, now(), 24.0).unwrap_err();
        assert!(matches!(err, BackupError::CorruptedBackup { .. }));
        assert_eq!(store.get(KEY).unwrap(), Some("{{{".to_string()));
    }
}
