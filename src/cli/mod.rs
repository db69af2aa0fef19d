//! CLI Module
//!
//! Command-line front end that runs the backup controller against a JSON
//! file standing in for the timer page's local storage.

pub mod commands;
pub mod terminal;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use terminal::TerminalPage;

/// Timer Backup - back up and restore workout timer state
#[derive(Parser, Debug)]
#[command(name = "timer-backup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Storage file shared with the timer app
    #[arg(short, long, global = true, default_value = "timer-storage.json")]
    pub store: PathBuf,

    /// Optional JSON config overriding keys and timings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Progress readouts as the timer page currently shows them.
#[derive(Args, Debug, Clone)]
pub struct StatArgs {
    /// Completed exercises readout
    #[arg(long, default_value = "0")]
    pub exercises: String,

    /// Workout time readout
    #[arg(long, default_value = "0:00")]
    pub time: String,

    /// Calories burned readout
    #[arg(long, default_value = "0")]
    pub calories: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up the live workout state
    #[command(name = "backup")]
    Backup {
        #[command(flatten)]
        stats: StatArgs,
    },

    /// Restore the live workout state from the backup
    #[command(name = "restore")]
    Restore,

    /// Show the stored backup's details
    #[command(name = "history")]
    History,

    /// Delete the stored backup
    #[command(name = "clear")]
    Clear,

    /// Initialize against the store: expire stale backups and show the latest one
    #[command(name = "status")]
    Status,

    /// Write the live workout state, as the timer app would
    #[command(name = "set-state")]
    SetState {
        /// Workout state JSON
        state: String,

        /// Workout date string
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Reset the workout, offering a backup first
    #[command(name = "reset")]
    Reset {
        #[command(flatten)]
        stats: StatArgs,
    },

    /// Keep running and back up every period while the workout is active
    #[cfg(feature = "async-runtime")]
    #[command(name = "watch")]
    Watch {
        #[command(flatten)]
        stats: StatArgs,
    },
}
