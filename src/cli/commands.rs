//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::{info, warn};

use crate::clock::SystemClock;
use crate::cli::TerminalPage;
use crate::config::BackupConfig;
use crate::controller::{BackupController, EnhancedReset, RestoreOutcome};
use crate::error::Result;
use crate::state::{FileStore, KeyValueStore, WorkoutStatus};

/// Controller wired to a storage file and the terminal.
pub type CliController = BackupController<FileStore, TerminalPage, SystemClock>;

/// Load the config (or defaults) and open the storage file.
pub fn open_controller(
    store_path: &Path,
    config_path: Option<&Path>,
    page: TerminalPage,
) -> Result<CliController> {
    let config = match config_path {
        Some(path) => BackupConfig::load(path)?,
        None => BackupConfig::default(),
    };
    let store = FileStore::open(store_path)?;
    info!("Using storage file: {}", store_path.display());

    Ok(BackupController::new(config, store, page, SystemClock))
}

/// Back up the live workout state.
pub fn backup(controller: &mut CliController) -> Result<()> {
    let record = controller.backup()?;
    println!("Backup timestamp: {}", record.timestamp);
    Ok(())
}

/// Restore the live workout state from the backup.
pub fn restore(controller: &mut CliController) -> Result<()> {
    match controller.restore()? {
        RestoreOutcome::Restored(record) => {
            println!("Restored workout backed up at {}", record.timestamp);
        }
        RestoreOutcome::Declined => println!("Restore cancelled."),
    }
    Ok(())
}

/// Show the stored backup's details.
pub fn show_history(controller: &mut CliController) -> Result<()> {
    controller.view_history()?;
    Ok(())
}

/// Delete the stored backup.
pub fn clear(controller: &mut CliController) -> Result<()> {
    if !controller.clear_backups()? {
        println!("Nothing cleared.");
    }
    Ok(())
}

/// Initialize against the store, expiring a stale backup.
pub fn status(controller: &mut CliController) -> Result<()> {
    controller.initialize();
    Ok(())
}

/// Write live workout state the way the timer app would.
pub fn set_state(controller: &mut CliController, state: &str, date: Option<&str>) -> Result<()> {
    if let Err(e) = WorkoutStatus::parse(state) {
        warn!("Writing workout state that auto-backup cannot read: {}", e);
    }

    let state_key = controller.config().state_key.clone();
    let date_key = controller.config().date_key.clone();
    let store = controller.store_mut();
    store.set(&state_key, state)?;
    if let Some(date) = date {
        store.set(&date_key, date)?;
    }

    println!("Workout state written to {}", store.path().display());
    Ok(())
}

/// Reset the workout through the wrapped reset: the live keys are removed
/// once the user confirms.
pub fn reset(controller: &mut CliController) -> Result<()> {
    let state_key = controller.config().state_key.clone();
    let date_key = controller.config().date_key.clone();

    let mut enhanced = EnhancedReset::new(move |store: &mut FileStore| {
        for key in [&state_key, &date_key] {
            if let Err(e) = store.remove(key) {
                warn!("Reset could not remove {}: {}", key, e);
            }
        }
    });

    if !enhanced.invoke(controller) {
        println!("Reset cancelled.");
    }
    Ok(())
}

/// Initialize after the start-up delay, then back up every period until Ctrl-C.
#[cfg(feature = "async-runtime")]
pub async fn watch(controller: CliController) -> Result<()> {
    use crate::scheduler;

    let shared = scheduler::share(controller);
    let handle = scheduler::start(shared).await;

    println!("Watching for an active workout. Press Ctrl-C to stop.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
    }

    handle.cancel();
    info!("Auto-backup stopped");
    Ok(())
}
