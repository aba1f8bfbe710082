//! The student home screen: quick stats and recent activity.

use super::{badge, card, format_time, heading, muted, row};
use crate::domain::{Category, Status};
use crate::stats::StatusCounts;
use chrono::{DateTime, Utc};

/// One recent-activity entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentItem {
    /// Category.
    pub category: Category,
    /// Status.
    pub status: Status,
    /// Submission time.
    pub submitted: DateTime<Utc>,
}

/// View-model of the home screen.
#[derive(Debug, Clone, Default)]
pub struct HomeView {
    /// Display name of the signed-in user.
    pub name: String,
    /// Own complaints per status.
    pub counts: StatusCounts,
    /// Newest own complaints.
    pub recent: Vec<RecentItem>,
}

/// Renders the home screen.
pub fn render(v: &HomeView) -> String {
    let welcome = if v.name.trim().is_empty() {
        "Welcome".to_string()
    } else {
        format!("Welcome, {}", crate::text::clean_line(&v.name))
    };

    let stats = [
        format!("Total Complaints: {}", v.counts.total),
        format!("Pending: {}", v.counts.pending),
        format!("In Progress: {}", v.counts.in_progress),
        format!("Resolved: {}", v.counts.resolved),
    ]
    .join("\n");

    let activity = if v.recent.is_empty() {
        muted("No recent activity")
    } else {
        v.recent
            .iter()
            .map(|r| {
                format!(
                    "{} {}\n{}",
                    r.category.label(),
                    badge(r.status),
                    muted(&format!("Submitted: {}", format_time(r.submitted)))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    [
        heading(&welcome),
        String::new(),
        row(&[card("Quick Stats", &stats), card("Recent Activity", &activity)]),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_home_has_no_activity() {
        let out = strip_ansi_escapes::strip_str(render(&HomeView::default()));
        assert!(out.contains("Total Complaints: 0"));
        assert!(out.contains("No recent activity"));
    }

    #[test]
    fn recent_items_show_category_and_status() {
        let v = HomeView {
            name: "Asha".into(),
            counts: StatusCounts {
                total: 2,
                pending: 1,
                in_progress: 1,
                resolved: 0,
            },
            recent: vec![RecentItem {
                category: Category::WiFi,
                status: Status::InProgress,
                submitted: Utc::now(),
            }],
        };
        let out = strip_ansi_escapes::strip_str(render(&v));
        assert!(out.contains("Welcome, Asha"));
        assert!(out.contains("Wi-Fi"));
        assert!(out.contains("In Progress"));
        assert!(out.contains("Pending: 1"));
        assert!(!out.contains("No recent activity"));
    }
}
