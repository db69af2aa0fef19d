//! State Management Module
//!
//! Backup records, the shared key-value store, lazy expiry and the
//! auto-backup schedule.

pub mod autosave;
pub mod expiry;
pub mod record;
pub mod storage;

pub use autosave::AutoBackupSchedule;
pub use expiry::{check_backup, BackupStatus};
pub use record::{BackupRecord, DisplaySnapshot, WorkoutStatus};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
