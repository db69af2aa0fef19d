//! Timer Backup - workout timer state backup and restore
//!
//! Adds manual and automatic backups to a workout timer page that keeps its
//! state in a flat key-value store.
//!
//! # Architecture
//!
//! A single [`BackupController`] owns every behavior and reaches its
//! collaborators through traits:
//! - [`KeyValueStore`]: the store shared with the host timer app
//! - [`HostPage`]: stat readouts, prompts, controls, history panel, toasts
//! - [`Clock`]: timestamps and toast timing
//!
//! Only one backup record exists at a time. Restoring copies it back over the
//! host's live keys and asks the page to reload.

pub mod cli;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod page;
#[cfg(feature = "async-runtime")]
pub mod scheduler;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BackupConfig;
pub use controller::{BackupController, EnhancedReset, RestoreOutcome};
pub use error::{BackupError, Result};
pub use page::{HostPage, RecordingPage, StatField};
pub use state::{BackupRecord, BackupStatus, KeyValueStore, MemoryStore};
