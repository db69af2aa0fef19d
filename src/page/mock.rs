//! Scripted host page for tests and headless use
//!
//! Records every alert, question, toast and reload, and answers confirms from
//! a script. Anchors can be removed to model a page that lacks them.

use std::collections::{HashMap, VecDeque};

use crate::page::{HostPage, StatField, Toast};

#[derive(Debug, Clone)]
pub struct RecordingPage {
    stats: HashMap<StatField, String>,
    has_stats_container: bool,
    has_history_container: bool,
    answers: VecDeque<bool>,

    alerts: Vec<String>,
    questions: Vec<String>,
    reloads: usize,
    controls_mounted: bool,
    restore_visible: bool,
    restore_tooltip: Option<String>,
    history_mounted: bool,
    history_text: Option<String>,
    style_injections: usize,
    toasts: Vec<Toast>,
}

impl Default for RecordingPage {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPage {
    /// A page with every anchor present, zeroed readouts, and confirms answered "yes".
    pub fn new() -> Self {
        let stats = HashMap::from([
            (StatField::CompletedExercises, "0".to_string()),
            (StatField::WorkoutTime, "0:00".to_string()),
            (StatField::CaloriesBurned, "0".to_string()),
        ]);

        Self {
            stats,
            has_stats_container: true,
            has_history_container: true,
            answers: VecDeque::new(),
            alerts: Vec::new(),
            questions: Vec::new(),
            reloads: 0,
            controls_mounted: false,
            restore_visible: false,
            restore_tooltip: None,
            history_mounted: false,
            history_text: None,
            style_injections: 0,
            toasts: Vec::new(),
        }
    }

    /// A page with none of the anchors the controller looks for.
    pub fn bare() -> Self {
        Self {
            stats: HashMap::new(),
            has_stats_container: false,
            has_history_container: false,
            ..Self::new()
        }
    }

    pub fn with_stat(mut self, field: StatField, text: &str) -> Self {
        self.stats.insert(field, text.to_string());
        self
    }

    /// Answer confirms in this order, then answer "yes".
    pub fn with_answers(mut self, answers: &[bool]) -> Self {
        self.answers.extend(answers.iter().copied());
        self
    }

    pub fn set_stat(&mut self, field: StatField, text: &str) {
        self.stats.insert(field, text.to_string());
    }

    pub fn push_answers(&mut self, answers: &[bool]) {
        self.answers.extend(answers.iter().copied());
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(|s| s.as_str())
    }

    /// Every confirm question asked, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn reloads(&self) -> usize {
        self.reloads
    }

    pub fn controls_mounted(&self) -> bool {
        self.controls_mounted
    }

    pub fn restore_visible(&self) -> bool {
        self.restore_visible
    }

    pub fn restore_tooltip(&self) -> Option<&str> {
        self.restore_tooltip.as_deref()
    }

    pub fn history_mounted(&self) -> bool {
        self.history_mounted
    }

    pub fn history_text(&self) -> Option<&str> {
        self.history_text.as_deref()
    }

    pub fn style_injections(&self) -> usize {
        self.style_injections
    }

    /// Toasts currently on the page.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn toast_messages(&self) -> Vec<&str> {
        self.toasts.iter().map(|t| t.message.as_str()).collect()
    }
}

impl HostPage for RecordingPage {
    fn stat_text(&self, field: StatField) -> Option<String> {
        self.stats.get(&field).cloned()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.answers.pop_front().unwrap_or(true)
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }

    fn mount_controls(&mut self) -> bool {
        if self.has_stats_container {
            self.controls_mounted = true;
        }
        self.controls_mounted
    }

    fn set_restore_control(&mut self, visible: bool, tooltip: Option<&str>) {
        // Without mounted controls there is no restore button to update
        if !self.controls_mounted {
            return;
        }
        self.restore_visible = visible;
        if let Some(tooltip) = tooltip {
            self.restore_tooltip = Some(tooltip.to_string());
        }
    }

    fn mount_history_panel(&mut self) -> bool {
        if self.has_history_container {
            self.history_mounted = true;
        }
        self.history_mounted
    }

    fn set_history_text(&mut self, text: &str) {
        if self.history_mounted {
            self.history_text = Some(text.to_string());
        }
    }

    fn inject_styles(&mut self, _css: &str) {
        self.style_injections += 1;
    }

    fn show_toast(&mut self, toast: &Toast) {
        self.toasts.push(toast.clone());
    }

    fn remove_toast(&mut self, toast: &Toast) {
        self.toasts.retain(|t| t.id != toast.id);
    }
}
