//! Error handling for timer backups
//!
//! Every error maps to the short, non-technical alert shown to the user.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for backup operations
pub type Result<T> = std::result::Result<T, BackupError>;

/// Main error type for backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    // Precondition Errors
    #[error("No live workout state under key '{key}'")]
    NoWorkoutData { key: String },

    #[error("No backup stored under key '{key}'")]
    NoBackupFound { key: String },

    // Data Errors
    #[error("Backup record is corrupted: {source}")]
    CorruptedBackup {
        #[source]
        source: serde_json::Error,
    },

    #[error("Live workout state is unreadable: {source}")]
    UnreadableState {
        #[source]
        source: serde_json::Error,
    },

    // Storage Errors
    #[error("Storage quota exceeded writing '{key}': {needed_bytes} bytes over a {quota_bytes} byte quota")]
    QuotaExceeded {
        key: String,
        needed_bytes: usize,
        quota_bytes: usize,
    },

    #[error("Failed to read store file: {path}: {source}")]
    StoreReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store file: {path}: {source}")]
    StoreWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file is not a JSON object of strings: {path}")]
    InvalidStoreFile { path: PathBuf },

    // Configuration Errors
    #[error("Failed to load config {path}: {reason}")]
    ConfigError { path: PathBuf, reason: String },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackupError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            BackupError::NoWorkoutData { .. } => "NO_WORKOUT_DATA",
            BackupError::NoBackupFound { .. } => "NO_BACKUP_FOUND",
            BackupError::CorruptedBackup { .. } => "CORRUPTED_BACKUP",
            BackupError::UnreadableState { .. } => "UNREADABLE_STATE",
            BackupError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            BackupError::StoreReadError { .. } => "STORE_READ_ERROR",
            BackupError::StoreWriteError { .. } => "STORE_WRITE_ERROR",
            BackupError::InvalidStoreFile { .. } => "INVALID_STORE_FILE",
            BackupError::ConfigError { .. } => "CONFIG_ERROR",
            BackupError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether this is a missing-precondition error rather than a failure
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            BackupError::NoWorkoutData { .. } | BackupError::NoBackupFound { .. }
        )
    }

    /// Alert text shown to the user for a failed backup
    pub fn backup_message(&self) -> &'static str {
        match self {
            BackupError::NoWorkoutData { .. } => "No workout data to backup!",
            _ => "Backup failed. Please try again.",
        }
    }

    /// Alert text shown to the user for a failed restore
    pub fn restore_message(&self) -> &'static str {
        match self {
            BackupError::NoBackupFound { .. } => "No backup found!",
            _ => "Restore failed. Backup may be corrupted.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = BackupError::NoBackupFound {
            key: "eliteTimerBackup".to_string(),
        };
        assert_eq!(err.error_code(), "NO_BACKUP_FOUND");
        assert!(err.is_precondition());
    }

    #[test]
    fn test_user_messages() {
        let err = BackupError::NoWorkoutData {
            key: "eliteWorkoutState".to_string(),
        };
        assert_eq!(err.backup_message(), "No workout data to backup!");

        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = BackupError::CorruptedBackup { source: parse };
        assert_eq!(err.restore_message(), "Restore failed. Backup may be corrupted.");
        assert_eq!(err.backup_message(), "Backup failed. Please try again.");
        assert!(!err.is_precondition());
    }
}
