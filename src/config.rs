//! Backup configuration
//!
//! Storage keys and timings. Defaults match what the timer page expects, so a
//! config file only needs to name the values it overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BackupError, Result};

/// Key the host app writes its live workout state under.
pub const DEFAULT_STATE_KEY: &str = "eliteWorkoutState";

/// Key the host app writes its workout date under.
pub const DEFAULT_DATE_KEY: &str = "eliteWorkoutDate";

/// Key the single backup record lives under.
pub const DEFAULT_BACKUP_KEY: &str = "eliteTimerBackup";

/// Backups older than this many hours are deleted on inspection.
pub const DEFAULT_EXPIRY_HOURS: f64 = 24.0;

/// Default auto-backup period in seconds (5 minutes).
pub const DEFAULT_AUTO_BACKUP_INTERVAL: u64 = 5 * 60;

/// Delay before initialization, letting the host finish its own setup.
pub const DEFAULT_INIT_DELAY_MS: u64 = 1000;

/// How long a toast stays on screen before its exit animation.
pub const DEFAULT_TOAST_DISPLAY_MS: u64 = 3000;

/// Length of the toast exit animation.
pub const DEFAULT_TOAST_EXIT_MS: u64 = 300;

/// Backup controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Live workout state key (host-owned).
    pub state_key: String,

    /// Live workout date key (host-owned).
    pub date_key: String,

    /// Backup record key.
    pub backup_key: String,

    /// Expiry window in hours, closed bound.
    pub expiry_hours: f64,

    /// Auto-backup period in seconds.
    pub auto_backup_interval_secs: u64,

    /// Initialization delay in milliseconds.
    pub init_delay_ms: u64,

    /// Toast display time in milliseconds.
    pub toast_display_ms: u64,

    /// Toast exit animation time in milliseconds.
    pub toast_exit_ms: u64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            date_key: DEFAULT_DATE_KEY.to_string(),
            backup_key: DEFAULT_BACKUP_KEY.to_string(),
            expiry_hours: DEFAULT_EXPIRY_HOURS,
            auto_backup_interval_secs: DEFAULT_AUTO_BACKUP_INTERVAL,
            init_delay_ms: DEFAULT_INIT_DELAY_MS,
            toast_display_ms: DEFAULT_TOAST_DISPLAY_MS,
            toast_exit_ms: DEFAULT_TOAST_EXIT_MS,
        }
    }
}

impl BackupConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BackupError::ConfigError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| BackupError::ConfigError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        config.validate(path)?;
        Ok(config)
    }

    pub fn auto_backup_interval(&self) -> Duration {
        Duration::from_secs(self.auto_backup_interval_secs)
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let reason = if self.auto_backup_interval_secs == 0 {
            Some("auto_backup_interval_secs must be positive")
        } else if !(self.expiry_hours.is_finite() && self.expiry_hours >= 0.0) {
            Some("expiry_hours must be a non-negative number")
        } else if self.state_key == self.backup_key || self.date_key == self.backup_key {
            Some("backup_key must differ from the live state and date keys")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(BackupError::ConfigError {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}
