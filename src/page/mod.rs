//! Host Page Module
//!
//! The controller never touches a concrete UI. Everything it needs from the
//! timer page (stat text, prompts, the restore control, the history panel,
//! toasts, reload) goes through [`HostPage`]. Anchors the page lacks are
//! reported as `false`/`None` and the controller simply skips that feature.

pub mod mock;
pub mod notification;

pub use mock::RecordingPage;
pub use notification::{NotificationCenter, Toast, ToastPhase};

/// The three progress readouts captured with every backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    CompletedExercises,
    WorkoutTime,
    CaloriesBurned,
}

/// Everything the backup controller needs from the host timer page.
pub trait HostPage {
    /// Current text of a progress readout, `None` if the page has no such element.
    fn stat_text(&self, field: StatField) -> Option<String>;

    /// Blocking, informational message.
    fn alert(&mut self, message: &str);

    /// Blocking yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Reload the page so the host re-reads its state from storage.
    fn reload(&mut self);

    /// Add the backup/restore controls to the stats container.
    /// Returns false when the container does not exist.
    fn mount_controls(&mut self) -> bool;

    /// Show or hide the restore control and set its tooltip.
    fn set_restore_control(&mut self, visible: bool, tooltip: Option<&str>);

    /// Add the backup history panel to the history view.
    /// Returns false when the history tab or its container does not exist.
    fn mount_history_panel(&mut self) -> bool;

    /// Replace the history panel body text.
    fn set_history_text(&mut self, text: &str);

    /// Add the toast animation styles to the page.
    fn inject_styles(&mut self, css: &str);

    /// Display a toast. Removal is driven by [`NotificationCenter::sweep`].
    fn show_toast(&mut self, toast: &Toast);

    /// Take a toast off the page.
    fn remove_toast(&mut self, toast: &Toast);
}
