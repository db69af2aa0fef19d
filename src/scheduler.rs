//! Tokio runner for initialization and auto-backup
//!
//! The controller is shared behind a mutex between the periodic tasks and
//! whatever handles user actions. Locks are never held across an await.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use crate::clock::Clock;
use crate::controller::BackupController;
use crate::page::HostPage;
use crate::state::storage::KeyValueStore;

/// How often finished toasts are taken off the page.
pub const TOAST_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// A controller shared between tasks.
pub type SharedController<S, P, C> = Arc<Mutex<BackupController<S, P, C>>>;

/// Handle to running background tasks. Dropping it leaves them running.
#[derive(Debug)]
pub struct AutoBackupHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl AutoBackupHandle {
    /// Abort every task behind this handle.
    pub fn cancel(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.is_finished())
    }
}

pub fn share<S, P, C>(controller: BackupController<S, P, C>) -> SharedController<S, P, C> {
    Arc::new(Mutex::new(controller))
}

fn lock<S, P, C>(
    shared: &SharedController<S, P, C>,
) -> MutexGuard<'_, BackupController<S, P, C>> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// Spawn the periodic auto-backup. The first tick happens one full period
/// after spawning.
pub fn spawn_auto_backup<S, P, C>(
    controller: SharedController<S, P, C>,
    period: Duration,
) -> AutoBackupHandle
where
    S: KeyValueStore + Send + 'static,
    P: HostPage + Send + 'static,
    C: Clock + Send + 'static,
{
    // tokio rejects a zero period
    let period = period.max(Duration::from_millis(1));
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let result = lock(&controller).auto_backup_tick();
            match result {
                Ok(Some(record)) => debug!("Auto-backup written at {}", record.timestamp),
                Ok(None) => {}
                Err(e) => debug!("Auto-backup tick failed: {}", e),
            }
        }
    });

    AutoBackupHandle { tasks: vec![task] }
}

/// Spawn the task that removes toasts once their exit animation is over.
pub fn spawn_toast_sweeper<S, P, C>(controller: SharedController<S, P, C>) -> AutoBackupHandle
where
    S: KeyValueStore + Send + 'static,
    P: HostPage + Send + 'static,
    C: Clock + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + TOAST_SWEEP_INTERVAL, TOAST_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            lock(&controller).sweep_notifications();
        }
    });

    AutoBackupHandle { tasks: vec![task] }
}

/// Wait for the configured start-up delay, initialize the controller, then
/// start auto-backup and toast sweeping.
pub async fn start<S, P, C>(controller: SharedController<S, P, C>) -> AutoBackupHandle
where
    S: KeyValueStore + Send + 'static,
    P: HostPage + Send + 'static,
    C: Clock + Send + 'static,
{
    let (delay, period) = {
        let guard = lock(&controller);
        (guard.config().init_delay(), guard.config().auto_backup_interval())
    };

    sleep(delay).await;
    lock(&controller).initialize();
    info!("Auto-backup every {}s", period.as_secs());

    let mut handle = spawn_auto_backup(controller.clone(), period);
    handle.tasks.extend(spawn_toast_sweeper(controller).tasks);
    handle
}
