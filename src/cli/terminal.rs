//! Terminal host page
//!
//! Alerts and toasts go to stdout, confirms are read from stdin unless every
//! answer is forced to yes.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::cli::StatArgs;
use crate::page::notification::TOAST_ICON;
use crate::page::{HostPage, StatField, Toast};

#[derive(Debug, Clone, Default)]
pub struct TerminalPage {
    stats: HashMap<StatField, String>,
    assume_yes: bool,
}

impl TerminalPage {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            stats: HashMap::new(),
            assume_yes,
        }
    }

    pub fn with_stats(mut self, stats: &StatArgs) -> Self {
        self.stats.insert(StatField::CompletedExercises, stats.exercises.clone());
        self.stats.insert(StatField::WorkoutTime, stats.time.clone());
        self.stats.insert(StatField::CaloriesBurned, stats.calories.clone());
        self
    }
}

impl HostPage for TerminalPage {
    fn stat_text(&self, field: StatField) -> Option<String> {
        self.stats.get(&field).cloned()
    }

    fn alert(&mut self, message: &str) {
        println!("{}", message);
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            println!("{} [y/N] y", message);
            return true;
        }

        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Cannot read confirmation: {}", e);
                false
            }
        }
    }

    fn reload(&mut self) {
        println!("Reload the timer page to apply the restored workout.");
    }

    fn mount_controls(&mut self) -> bool {
        true
    }

    fn set_restore_control(&mut self, visible: bool, tooltip: Option<&str>) {
        match (visible, tooltip) {
            (true, Some(tooltip)) => println!("Restore available: {}", tooltip),
            (true, None) => println!("Restore available"),
            (false, _) => debug!("Restore control hidden"),
        }
    }

    fn mount_history_panel(&mut self) -> bool {
        true
    }

    fn set_history_text(&mut self, text: &str) {
        println!("{}", text);
    }

    fn inject_styles(&mut self, _css: &str) {}

    fn show_toast(&mut self, toast: &Toast) {
        println!("{} {}", TOAST_ICON, toast.message);
    }

    fn remove_toast(&mut self, _toast: &Toast) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_args() {
        let args = StatArgs {
            exercises: "4".to_string(),
            time: "20:15".to_string(),
            calories: "150".to_string(),
        };
        let page = TerminalPage::new(true).with_stats(&args);

        assert_eq!(page.stat_text(StatField::WorkoutTime).as_deref(), Some("20:15"));
        assert_eq!(page.stat_text(StatField::CaloriesBurned).as_deref(), Some("150"));
    }

    #[test]
    fn test_assume_yes_confirms_without_stdin() {
        let mut page = TerminalPage::new(true);
        assert!(page.confirm("Proceed?"));
    }
}
