//! Backup Controller
//!
//! Owns every backup behavior of the timer page: the backup/restore controls,
//! snapshot creation, restore, expiry, auto-backup, reset interception and the
//! history panel.
//!
//! Each public operation reports failures to the user through the page
//! (alerts) and also returns them, so programmatic callers can tell what
//! happened. Nothing here panics on bad storage contents.

use chrono::{DateTime, Local, Utc};
use log::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::BackupConfig;
use crate::error::{BackupError, Result};
use crate::page::{HostPage, NotificationCenter, StatField, Toast};
use crate::state::expiry::{self, BackupStatus};
use crate::state::record::{BackupRecord, DisplaySnapshot, WorkoutStatus};
use crate::state::storage::KeyValueStore;

pub const MSG_BACKUP_DONE: &str = "Workout state backed up successfully!";
pub const MSG_NO_HISTORY: &str = "No backup history found";
pub const MSG_NO_BACKUPS: &str = "No backups available";
pub const MSG_CLEARED: &str = "Backup data cleared";
pub const MSG_RESET_DONE: &str = "Workout reset. Backup created if requested.";

pub const ASK_RESTORE: &str = "Restore workout from backup? This will overwrite current progress.";
pub const ASK_CLEAR: &str = "Clear all backup data? This cannot be undone.";
pub const ASK_BACKUP_BEFORE_RESET: &str =
    "Create backup before resetting? You can restore it later if this was a mistake.";
pub const ASK_RESET: &str = "Are you sure you want to reset your workout? This cannot be undone.";

/// Result of a restore request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Live keys overwritten and a reload requested.
    Restored(BackupRecord),
    /// The user declined the overwrite warning.
    Declined,
}

/// Backup controller for one timer page.
pub struct BackupController<S, P, C = SystemClock> {
    config: BackupConfig,
    store: S,
    page: P,
    clock: C,
    notifications: NotificationCenter,
}

impl<S, P, C> BackupController<S, P, C>
where
    S: KeyValueStore,
    P: HostPage,
    C: Clock,
{
    pub fn new(config: BackupConfig, store: S, page: P, clock: C) -> Self {
        let notifications = NotificationCenter::new(
            std::time::Duration::from_millis(config.toast_display_ms),
            std::time::Duration::from_millis(config.toast_exit_ms),
        );
        Self {
            config,
            store,
            page,
            clock,
            notifications,
        }
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Give the store, page and clock back.
    pub fn into_parts(self) -> (S, P, C) {
        (self.store, self.page, self.clock)
    }

    /// Attach to the page: mount the controls, inspect any existing backup,
    /// and mount the history panel.
    ///
    /// Reset wrapping and auto-backup are set up by the caller through
    /// [`EnhancedReset`] and the scheduler, since both outlive this call.
    pub fn initialize(&mut self) {
        if self.page.mount_controls() {
            debug!("Backup controls mounted");
        } else {
            debug!("No stats container, backup controls not mounted");
        }

        // A corrupted record is logged and left for restore to report
        let _ = self.check_for_backup();

        if self.page.mount_history_panel() {
            self.update_backup_list();
        }

        info!("Timer backup initialized");
    }

    /// Inspect the stored backup, deleting it if expired, and reveal the
    /// restore control when a valid one exists.
    pub fn check_for_backup(&mut self) -> Result<BackupStatus> {
        let now = self.clock.now();
        let status = expiry::check_backup(
            &mut self.store,
            &self.config.backup_key,
            now,
            self.config.expiry_hours,
        )
        .map_err(|e| {
            error!("Backup check failed: {}", e);
            e
        })?;

        if let BackupStatus::Valid { created_at, .. } = &status {
            let tooltip = format!("Backup from {}", local_time(*created_at));
            self.page.set_restore_control(true, Some(&tooltip));
        }

        Ok(status)
    }

    /// Snapshot the live workout state into the backup key.
    pub fn backup(&mut self) -> Result<BackupRecord> {
        match self.write_backup() {
            Ok(record) => {
                let tooltip = format!("Backup created at {}", local_time(self.clock.now()));
                self.page.set_restore_control(true, Some(&tooltip));
                self.notify(MSG_BACKUP_DONE);
                info!("Workout state backed up at {}", record.timestamp);
                Ok(record)
            }
            Err(e) => {
                if !e.is_precondition() {
                    error!("Backup failed: {}", e);
                }
                self.page.alert(e.backup_message());
                Err(e)
            }
        }
    }

    fn write_backup(&mut self) -> Result<BackupRecord> {
        let state = self
            .store
            .get(&self.config.state_key)?
            .ok_or_else(|| BackupError::NoWorkoutData {
                key: self.config.state_key.clone(),
            })?;
        let date = self.store.get(&self.config.date_key)?;

        let record = BackupRecord::new(state, date, self.clock.now(), self.display_snapshot());
        self.store.set(&self.config.backup_key, &record.to_json()?)?;
        Ok(record)
    }

    fn display_snapshot(&self) -> DisplaySnapshot {
        let text = |field| self.page.stat_text(field).unwrap_or_default();
        DisplaySnapshot {
            exercises: text(StatField::CompletedExercises),
            time: text(StatField::WorkoutTime),
            calories: text(StatField::CaloriesBurned),
        }
    }

    /// Copy the backup back over the live keys and reload the page.
    ///
    /// The backup is parsed before anything is written, so a corrupted
    /// record leaves the live state untouched.
    pub fn restore(&mut self) -> Result<RestoreOutcome> {
        let raw = match self.store.get(&self.config.backup_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                let e = BackupError::NoBackupFound {
                    key: self.config.backup_key.clone(),
                };
                self.page.alert(e.restore_message());
                return Err(e);
            }
            Err(e) => return Err(self.restore_failed(e)),
        };

        if !self.page.confirm(ASK_RESTORE) {
            debug!("Restore declined");
            return Ok(RestoreOutcome::Declined);
        }

        match self.apply_backup(&raw) {
            Ok(record) => {
                info!("Restored workout state from backup at {}", record.timestamp);
                self.page.reload();
                Ok(RestoreOutcome::Restored(record))
            }
            Err(e) => Err(self.restore_failed(e)),
        }
    }

    fn apply_backup(&mut self, raw: &str) -> Result<BackupRecord> {
        let record = BackupRecord::from_json(raw)?;

        self.store.set(&self.config.state_key, &record.state)?;
        match &record.date {
            Some(date) => self.store.set(&self.config.date_key, date)?,
            None => self.store.remove(&self.config.date_key)?,
        }
        Ok(record)
    }

    fn restore_failed(&mut self, e: BackupError) -> BackupError {
        error!("Restore failed: {}", e);
        self.page.alert(e.restore_message());
        e
    }

    /// Show the details of the (single) stored backup.
    pub fn view_history(&mut self) -> Result<BackupRecord> {
        let raw = self
            .store
            .get(&self.config.backup_key)
            .map_err(|e| self.restore_failed(e))?;
        let Some(raw) = raw else {
            self.page.alert(MSG_NO_HISTORY);
            return Err(BackupError::NoBackupFound {
                key: self.config.backup_key.clone(),
            });
        };

        let record = BackupRecord::from_json(&raw).map_err(|e| self.restore_failed(e))?;
        let details = format!(
            "Backup Details:\n\
             ---------------\n\
             Time: {}\n\
             Exercises Completed: {}\n\
             Workout Time: {}\n\
             Calories Burned: {}\n\
             Date: {}",
            record_time(&record),
            record.exercises,
            record.time,
            record.calories,
            record.date.as_deref().unwrap_or("null"),
        );
        self.page.alert(&details);
        Ok(record)
    }

    /// Text for the history panel. The panel only ever shows the latest
    /// backup because only one is kept.
    pub fn backup_summary(&self) -> Result<String> {
        let Some(raw) = self.store.get(&self.config.backup_key)? else {
            return Ok(MSG_NO_BACKUPS.to_string());
        };

        let record = BackupRecord::from_json(&raw)?;
        Ok(format!(
            "Latest Backup: {}\nProgress: {} exercises, {}, {} calories",
            record_time(&record),
            record.exercises,
            record.time,
            record.calories
        ))
    }

    /// Refresh the history panel from storage.
    pub fn update_backup_list(&mut self) {
        match self.backup_summary() {
            Ok(text) => self.page.set_history_text(&text),
            Err(e) => {
                warn!("Cannot summarize backup: {}", e);
                self.page.set_history_text(MSG_NO_BACKUPS);
            }
        }
    }

    /// Delete the backup regardless of its age. Returns false if the user declined.
    pub fn clear_backups(&mut self) -> Result<bool> {
        if !self.page.confirm(ASK_CLEAR) {
            return Ok(false);
        }

        self.store.remove(&self.config.backup_key).map_err(|e| {
            error!("Clearing backup failed: {}", e);
            e
        })?;
        self.page.set_restore_control(false, None);
        self.page.set_history_text(MSG_NO_BACKUPS);
        self.notify(MSG_CLEARED);

        info!("Backup data cleared");
        Ok(true)
    }

    /// One auto-backup tick: back up only while the workout runs unpaused.
    ///
    /// Returns the new record, or `None` when nothing needed backing up.
    pub fn auto_backup_tick(&mut self) -> Result<Option<BackupRecord>> {
        let Some(raw) = self.store.get(&self.config.state_key)? else {
            return Ok(None);
        };

        let status = WorkoutStatus::parse(&raw).map_err(|e| {
            warn!("Skipping auto-backup: {}", e);
            e
        })?;

        if !status.is_running() {
            debug!("Workout not running, skipping auto-backup");
            return Ok(None);
        }

        self.backup().map(Some)
    }

    /// Reset the workout through the host's own reset, which gets the shared
    /// store to clear its keys in.
    ///
    /// Offers a backup first when there is progress to lose, then asks for
    /// confirmation. Returns whether the reset ran.
    pub fn reset_workout<F: FnOnce(&mut S)>(&mut self, original_reset: F) -> bool {
        match self.store.get(&self.config.state_key) {
            Ok(Some(raw)) => match WorkoutStatus::parse(&raw) {
                Ok(status) if status.has_progress() => {
                    if self.page.confirm(ASK_BACKUP_BEFORE_RESET) {
                        // Failures are already reported to the user
                        let _ = self.backup();
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Not offering a backup before reset: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!("Not offering a backup before reset: {}", e),
        }

        if !self.page.confirm(ASK_RESET) {
            return false;
        }

        original_reset(&mut self.store);
        self.notify(MSG_RESET_DONE);
        info!("Workout reset");
        true
    }

    /// Take finished toasts off the page.
    pub fn sweep_notifications(&mut self) -> usize {
        let now = self.clock.now();
        self.notifications.sweep(&mut self.page, now)
    }

    fn notify(&mut self, message: &str) -> Toast {
        let now = self.clock.now();
        self.notifications.notify(&mut self.page, message, now)
    }
}

/// The host's reset operation wrapped with the backup offer and confirmation.
pub struct EnhancedReset<F> {
    original: F,
}

impl<F> EnhancedReset<F> {
    pub fn new(original: F) -> Self {
        Self { original }
    }

    /// Run the wrapped reset against a controller. Returns whether the reset ran.
    pub fn invoke<S, P, C>(&mut self, controller: &mut BackupController<S, P, C>) -> bool
    where
        F: FnMut(&mut S),
        S: KeyValueStore,
        P: HostPage,
        C: Clock,
    {
        let original = &mut self.original;
        controller.reset_workout(|store| original(store))
    }

    /// Unwrap the original reset.
    pub fn into_inner(self) -> F {
        self.original
    }
}

fn local_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn record_time(record: &BackupRecord) -> String {
    match record.created_at() {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Invalid Date".to_string(),
    }
}
