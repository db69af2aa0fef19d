//! Auto-backup schedule
//!
//! A fixed-period task that asks the controller for an auto-backup tick. The
//! schedule only tracks due times; it is driven by whatever event loop the
//! host runs (the tokio runner in [`crate::scheduler`], or a manual loop).

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::clock::Clock;
use crate::config::DEFAULT_AUTO_BACKUP_INTERVAL;
use crate::controller::BackupController;
use crate::error::Result;
use crate::page::HostPage;
use crate::state::record::BackupRecord;
use crate::state::storage::KeyValueStore;

/// Due-time tracker for the periodic auto-backup.
#[derive(Debug, Clone)]
pub struct AutoBackupSchedule {
    /// Period between ticks.
    pub interval: Duration,

    /// When the next tick is due.
    next_due: DateTime<Utc>,

    cancelled: bool,
}

impl AutoBackupSchedule {
    /// Default 5 minute schedule. The first tick is one full period after `started_at`.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self::with_interval(
            Duration::seconds(DEFAULT_AUTO_BACKUP_INTERVAL as i64),
            started_at,
        )
    }

    pub fn with_interval(interval: Duration, started_at: DateTime<Utc>) -> Self {
        let interval = interval.max(Duration::milliseconds(1));
        Self {
            interval,
            next_due: started_at + interval,
            cancelled: false,
        }
    }

    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_due
    }

    /// Returns true at most once per elapsed deadline. Missed periods are not
    /// replayed; the next deadline is the first one after `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if self.cancelled || now < self.next_due {
            return false;
        }

        while self.next_due <= now {
            self.next_due = self.next_due + self.interval;
        }
        true
    }

    /// Run an auto-backup tick on `controller` if one is due.
    ///
    /// Returns `None` when no tick was due.
    pub fn run_due<S, P, C>(
        &mut self,
        controller: &mut BackupController<S, P, C>,
        now: DateTime<Utc>,
    ) -> Option<Result<Option<BackupRecord>>>
    where
        S: KeyValueStore,
        P: HostPage,
        C: Clock,
    {
        if !self.poll(now) {
            return None;
        }
        debug!("Auto-backup tick at {}", now);
        Some(controller.auto_backup_tick())
    }

    /// Stop the schedule. Later polls never fire.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
