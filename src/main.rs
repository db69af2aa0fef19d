//! Timer Backup CLI
//!
//! Command-line interface for backing up and restoring workout timer state.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use timer_backup::cli::commands::{self, CliController};
use timer_backup::cli::{Cli, Commands, StatArgs, TerminalPage};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Timer Backup v{}", env!("CARGO_PKG_VERSION"));

    let Some(cmd) = cli.command else {
        println!("Timer Backup v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for available commands");
        return Ok(());
    };

    let stats = match &cmd {
        Commands::Backup { stats } | Commands::Reset { stats } => Some(stats.clone()),
        #[cfg(feature = "async-runtime")]
        Commands::Watch { stats } => Some(stats.clone()),
        _ => None,
    };
    let page = match stats {
        Some(stats) => TerminalPage::new(cli.yes).with_stats(&stats),
        None => TerminalPage::new(cli.yes).with_stats(&default_stats()),
    };

    let controller = commands::open_controller(&cli.store, cli.config.as_deref(), page)
        .with_context(|| format!("cannot open storage {}", cli.store.display()))?;

    handle_command(cmd, controller)
}

fn handle_command(cmd: Commands, mut controller: CliController) -> anyhow::Result<()> {
    match cmd {
        Commands::Backup { .. } => commands::backup(&mut controller)?,
        Commands::Restore => commands::restore(&mut controller)?,
        Commands::History => commands::show_history(&mut controller)?,
        Commands::Clear => commands::clear(&mut controller)?,
        Commands::Status => commands::status(&mut controller)?,
        Commands::SetState { state, date } => {
            commands::set_state(&mut controller, &state, date.as_deref())?
        }
        Commands::Reset { .. } => commands::reset(&mut controller)?,
        #[cfg(feature = "async-runtime")]
        Commands::Watch { .. } => {
            let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
            runtime.block_on(commands::watch(controller))?;
            info!("Watch finished");
        }
    }
    Ok(())
}

fn default_stats() -> StatArgs {
    StatArgs {
        exercises: "0".to_string(),
        time: "0:00".to_string(),
        calories: "0".to_string(),
    }
}
