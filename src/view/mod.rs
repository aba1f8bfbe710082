//! Screens as pure functions of typed view-models.
//!
//! The application builds a view-model struct for whatever is on screen and
//! passes it to the matching `render` function; nothing here touches the
//! backend or mutates state. Every piece of user-supplied text goes through
//! [`crate::text`] sanitising before it reaches the terminal.

pub mod admin;
pub mod auth;
pub mod detail;
pub mod form;
pub mod home;
pub mod listing;

use crate::domain::{Badge, Status};
use crate::text;
use chrono::{DateTime, Local, Utc};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Top-level sections of the signed-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Quick stats and recent activity.
    #[default]
    Home,
    /// The student's own complaints.
    MyComplaints,
    /// The complaint form.
    NewComplaint,
    /// The administrator dashboard.
    Admin,
}

impl Section {
    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::MyComplaints => "My Complaints",
            Section::NewComplaint => "New Complaint",
            Section::Admin => "Admin",
        }
    }

    /// Sections shown in the navigation bar for a role.
    pub fn visible(is_admin: bool) -> Vec<Section> {
        let mut out = vec![Section::Home, Section::MyComplaints, Section::NewComplaint];
        if is_admin {
            out.push(Section::Admin);
        }
        out
    }
}

const PRIMARY: &str = "#0d6efd";
const MUTED: &str = "#6c757d";

/// Bold section heading.
pub fn heading(s: &str) -> String {
    Style::new()
        .bold(true)
        .foreground(lipgloss::Color::from(PRIMARY))
        .inline(true)
        .render(s)
}

/// Dimmed hint text.
pub fn muted(s: &str) -> String {
    Style::new()
        .foreground(lipgloss::Color::from(MUTED))
        .inline(true)
        .render(s)
}

/// Style of a status badge.
pub fn badge_style(status: Status) -> Style {
    let (bg, fg) = match status.badge() {
        Badge::Warning => ("#ffc107", "#000000"),
        Badge::Info => ("#0dcaf0", "#000000"),
        Badge::Success => ("#198754", "#ffffff"),
    };
    Style::new()
        .background(lipgloss::Color::from(bg))
        .foreground(lipgloss::Color::from(fg))
}

/// A status badge: the label on the status colour.
pub fn badge(status: Status) -> String {
    badge_style(status)
        .inline(true)
        .render(&format!(" {} ", status.label()))
}

/// Formats a server timestamp in local time.
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d %b %Y, %H:%M").to_string()
}

/// The navigation bar view-model.
#[derive(Debug, Clone)]
pub struct NavBar<'a> {
    /// Entries, in order.
    pub sections: Vec<Section>,
    /// Highlighted entry.
    pub active: Section,
    /// Signed-in email.
    pub email: &'a str,
}

/// Renders the navigation bar: numbered entries and the signed-in email.
pub fn nav_bar(nav: &NavBar<'_>) -> String {
    let active = Style::new()
        .bold(true)
        .foreground(lipgloss::Color::from("#ffffff"))
        .background(lipgloss::Color::from(PRIMARY));
    let entries = nav
        .sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let label = format!(" {} {} ", i + 1, s.label());
            if *s == nav.active {
                active.clone().inline(true).render(&label)
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} {}  {}",
        heading("Complaint Desk"),
        entries,
        muted(&text::clean_line(nav.email))
    )
}

/// One labelled form field. `body` is the already-rendered widget.
#[derive(Debug, Clone)]
pub struct Field {
    /// Label above the widget.
    pub label: &'static str,
    /// Rendered widget.
    pub body: String,
    /// Whether the field has keyboard focus.
    pub focused: bool,
}

impl Field {
    /// A field around a rendered widget.
    pub fn new(label: &'static str, body: String, focused: bool) -> Self {
        Self {
            label,
            body,
            focused,
        }
    }

    /// A choice field showing `value` between arrows.
    pub fn choice(label: &'static str, value: &str, focused: bool) -> Self {
        let body = if focused {
            format!("‹ {value} ›")
        } else {
            format!("  {value}")
        };
        Self::new(label, body, focused)
    }
}

/// Renders a field as a label line and an indented widget line.
pub fn field(f: &Field) -> String {
    let marker = if f.focused { "▸ " } else { "  " };
    let label = if f.focused {
        Style::new().bold(true).inline(true).render(f.label)
    } else {
        f.label.to_string()
    };
    format!("{marker}{label}\n    {}", f.body)
}

/// Renders a card: a bordered box with a title line over a body.
pub fn card(title: &str, body: &str) -> String {
    Style::new()
        .border_style(lipgloss::normal_border())
        .border_top(true)
        .border_bottom(true)
        .border_left(true)
        .border_right(true)
        .padding(0, 1, 0, 1)
        .render(&format!("{}\n{}", muted(title), body))
}

/// Puts rendered blocks side by side.
pub fn row(blocks: &[String]) -> String {
    let parts: Vec<&str> = blocks.iter().map(String::as_str).collect();
    lipgloss::join_horizontal(lipgloss::TOP, &parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_entry_only_for_admins() {
        assert_eq!(Section::visible(false).len(), 3);
        assert_eq!(Section::visible(true).last(), Some(&Section::Admin));
    }

    #[test]
    fn nav_bar_numbers_entries_and_cleans_email() {
        let nav = NavBar {
            sections: Section::visible(true),
            active: Section::MyComplaints,
            email: "a@campus.edu\x1b[31m",
        };
        let out = strip_ansi_escapes::strip_str(nav_bar(&nav));
        assert!(out.contains("1 Home"));
        assert!(out.contains("2 My Complaints"));
        assert!(out.contains("4 Admin"));
        assert!(out.ends_with("a@campus.edu"));
    }

    #[test]
    fn badges_show_status_label() {
        for s in Status::ALL {
            let out = strip_ansi_escapes::strip_str(badge(s));
            assert_eq!(out.trim(), s.label());
        }
    }

    #[test]
    fn focused_field_is_marked() {
        let out = strip_ansi_escapes::strip_str(field(&Field::choice("Category", "Mess", true)));
        assert_eq!(out, "▸ Category\n    ‹ Mess ›");
        let out = strip_ansi_escapes::strip_str(field(&Field::choice("Category", "Mess", false)));
        assert_eq!(out, "  Category\n      Mess");
    }
}
