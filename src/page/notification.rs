//! Toast notifications
//!
//! A toast slides in, stays for the display time, slides out over the exit
//! time and is then removed. Toasts are never merged or queued; several
//! triggers in a row stack on screen.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::{DEFAULT_TOAST_DISPLAY_MS, DEFAULT_TOAST_EXIT_MS};
use crate::page::HostPage;

/// Animation styles injected with the first toast.
pub const TOAST_STYLES: &str = "\
@keyframes slideIn {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
@keyframes slideOut {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}
";

/// Icon shown next to every backup toast.
pub const TOAST_ICON: &str = "\u{1F4BE}";

/// A single toast on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

/// Where a toast is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Slide-in animation.
    Entering,
    Visible,
    /// Slide-out animation.
    Exiting,
    Removed,
}

/// Tracks toasts currently on the page.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    display: Duration,
    exit: Duration,
    toasts: Vec<Toast>,
    next_id: u64,
    styles_injected: bool,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_TOAST_DISPLAY_MS),
            Duration::from_millis(DEFAULT_TOAST_EXIT_MS),
        )
    }
}

impl NotificationCenter {
    pub fn new(display: Duration, exit: Duration) -> Self {
        Self {
            display,
            exit,
            toasts: Vec::new(),
            next_id: 1,
            styles_injected: false,
        }
    }

    /// Show a toast now. Styles are added to the page the first time only.
    pub fn notify<P: HostPage + ?Sized>(
        &mut self,
        page: &mut P,
        message: &str,
        now: DateTime<Utc>,
    ) -> Toast {
        let toast = Toast {
            id: self.next_id,
            message: message.to_string(),
            shown_at: now,
        };
        self.next_id += 1;

        page.show_toast(&toast);
        self.toasts.push(toast.clone());

        if !self.styles_injected {
            page.inject_styles(TOAST_STYLES);
            self.styles_injected = true;
        }

        debug!("Toast #{}: {}", toast.id, toast.message);
        toast
    }

    pub fn phase(&self, toast: &Toast, now: DateTime<Utc>) -> ToastPhase {
        let elapsed = now
            .signed_duration_since(toast.shown_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if elapsed >= self.display + self.exit {
            ToastPhase::Removed
        } else if elapsed >= self.display {
            ToastPhase::Exiting
        } else if elapsed < self.exit {
            ToastPhase::Entering
        } else {
            ToastPhase::Visible
        }
    }

    /// Remove every toast whose exit animation has finished.
    /// Returns how many were removed.
    pub fn sweep<P: HostPage + ?Sized>(&mut self, page: &mut P, now: DateTime<Utc>) -> usize {
        let (done, live): (Vec<Toast>, Vec<Toast>) = std::mem::take(&mut self.toasts)
            .into_iter()
            .partition(|t| self.phase(t, now) == ToastPhase::Removed);

        for toast in &done {
            page.remove_toast(toast);
        }
        self.toasts = live;
        done.len()
    }

    /// Toasts still on the page.
    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn styles_injected(&self) -> bool {
        self.styles_injected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::RecordingPage;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_toast_lifecycle() {
        let mut page = RecordingPage::new();
        let mut center = NotificationCenter::default();
        let toast = center.notify(&mut page, "Backup data cleared", start());

        let at = |ms: i64| start() + ChronoDuration::milliseconds(ms);
        assert_eq!(center.phase(&toast, at(0)), ToastPhase::Entering);
        assert_eq!(center.phase(&toast, at(300)), ToastPhase::Visible);
        assert_eq!(center.phase(&toast, at(2999)), ToastPhase::Visible);
        assert_eq!(center.phase(&toast, at(3000)), ToastPhase::Exiting);
        assert_eq!(center.phase(&toast, at(3299)), ToastPhase::Exiting);
        assert_eq!(center.phase(&toast, at(3300)), ToastPhase::Removed);

        assert_eq!(center.sweep(&mut page, at(3299)), 0);
        assert_eq!(center.sweep(&mut page, at(3300)), 1);
        assert!(center.active().is_empty());
        assert!(page.toasts().is_empty());
    }

    #[test]
    fn test_toasts_stack_without_dedup() {
        let mut page = RecordingPage::new();
        let mut center = NotificationCenter::default();

        center.notify(&mut page, "same", start());
        center.notify(&mut page, "same", start() + ChronoDuration::seconds(1));

        assert_eq!(center.active().len(), 2);
        assert_eq!(page.toasts().len(), 2);

        // Only the first one is gone 3.3s after it appeared
        center.sweep(&mut page, start() + ChronoDuration::milliseconds(3300));
        assert_eq!(center.active().len(), 1);
        assert_eq!(center.active()[0].id, 2);
    }

    #[test]
    fn test_styles_injected_once() {
        let mut page = RecordingPage::new();
        let mut center = NotificationCenter::default();
        assert!(!center.styles_injected());

        center.notify(&mut page, "one", start());
        center.notify(&mut page, "two", start());
        center.notify(&mut page, "three", start());

        assert!(center.styles_injected());
        assert_eq!(page.style_injections(), 1);
    }
}
