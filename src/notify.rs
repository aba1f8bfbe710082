//! Transient notifications.
//!
//! One notice is visible at a time. Showing a notice returns a tick command
//! that resolves into a [`DismissMsg`] carrying the notice id; the dismissal
//! only clears the notice it was created for, so a newer notice is never
//! hidden early.

use bubbletea_rs::{Cmd, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::time::Duration;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Completed action.
    Success,
    /// Failure.
    Danger,
    /// Rejected input.
    Warning,
    /// Neutral information.
    Info,
}

impl Level {
    /// Heading shown before the message.
    pub fn title(self) -> &'static str {
        match self {
            Level::Success => "Success",
            Level::Danger => "Error",
            Level::Warning => "Warning",
            Level::Info => "Notice",
        }
    }

    fn style(self) -> Style {
        let (bg, fg) = match self {
            Level::Success => ("#198754", "#ffffff"),
            Level::Danger => ("#dc3545", "#ffffff"),
            Level::Warning => ("#ffc107", "#000000"),
            Level::Info => ("#0d6efd", "#ffffff"),
        };
        Style::new()
            .background(lipgloss::Color::from(bg))
            .foreground(lipgloss::Color::from(fg))
    }
}

/// A visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Identifies the notice for its dismissal.
    pub id: u64,
    /// Severity.
    pub level: Level,
    /// Message text.
    pub text: String,
}

/// Asks the toaster to hide notice `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissMsg {
    /// Notice to hide.
    pub id: u64,
}

/// Holds the current notice.
#[derive(Debug, Clone)]
pub struct Toaster {
    current: Option<Notice>,
    next_id: u64,
    lifetime: Duration,
}

impl Toaster {
    /// A toaster whose notices live for `lifetime`.
    pub fn new(lifetime: Duration) -> Self {
        Self {
            current: None,
            next_id: 0,
            lifetime,
        }
    }

    /// Replaces the current notice and returns its dismissal timer.
    pub fn show(&mut self, level: Level, text: impl Into<String>) -> Cmd {
        self.next_id += 1;
        let id = self.next_id;
        self.current = Some(Notice {
            id,
            level,
            text: text.into(),
        });
        let lifetime = self.lifetime;
        Box::pin(async move {
            tokio::time::sleep(lifetime).await;
            Some(Box::new(DismissMsg { id }) as Msg)
        })
    }

    /// Shorthand for [`Level::Success`].
    pub fn success(&mut self, text: impl Into<String>) -> Cmd {
        self.show(Level::Success, text)
    }

    /// Shorthand for [`Level::Danger`].
    pub fn danger(&mut self, text: impl Into<String>) -> Cmd {
        self.show(Level::Danger, text)
    }

    /// Shorthand for [`Level::Warning`].
    pub fn warning(&mut self, text: impl Into<String>) -> Cmd {
        self.show(Level::Warning, text)
    }

    /// Hides the notice named by `msg` if it is still the current one.
    /// Returns whether anything was hidden.
    pub fn dismiss(&mut self, msg: &DismissMsg) -> bool {
        if self.current.as_ref().is_some_and(|n| n.id == msg.id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// The visible notice.
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Renders the visible notice, or nothing.
    pub fn view(&self) -> String {
        match &self.current {
            Some(n) => n
                .level
                .style()
                .inline(true)
                .render(&format!(
                    " {}: {} ",
                    n.level.title(),
                    crate::text::clean_line(&n.text)
                )),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stale_dismissal_keeps_newer_notice() {
        let mut toaster = Toaster::new(Duration::from_millis(1));
        let first = toaster.success("Complaint submitted successfully!");
        let second = toaster.danger("Failed to load complaints");

        let msg = first.await.expect("tick yields a message");
        let dismiss = msg.downcast_ref::<DismissMsg>().copied().expect("dismiss msg");
        assert!(!toaster.dismiss(&dismiss));
        assert_eq!(toaster.current().map(|n| n.level), Some(Level::Danger));

        let msg = second.await.expect("tick yields a message");
        let dismiss = msg.downcast_ref::<DismissMsg>().copied().expect("dismiss msg");
        assert!(toaster.dismiss(&dismiss));
        assert!(toaster.current().is_none());
        assert_eq!(toaster.view(), "");
    }

    #[test]
    fn view_shows_sanitized_text() {
        let mut toaster = Toaster::new(Duration::from_secs(4));
        let _ = toaster.warning("Please fill\x1b[2J all required fields");
        let out = strip_ansi_escapes::strip_str(toaster.view());
        assert!(out.contains("Warning: Please fill all required fields"));
    }
}
