//! Counting complaints for the dashboards and drawing the counts as text
//! bar charts.

use crate::domain::{Category, Complaint, Status};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Totals per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    /// All complaints.
    pub total: usize,
    /// Pending.
    pub pending: usize,
    /// In progress.
    pub in_progress: usize,
    /// Resolved.
    pub resolved: usize,
}

impl StatusCounts {
    /// Counts `complaints` by status.
    pub fn tally<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Self {
        let mut counts = Self::default();
        for c in complaints {
            counts.total += 1;
            match c.status {
                Status::Pending => counts.pending += 1,
                Status::InProgress => counts.in_progress += 1,
                Status::Resolved => counts.resolved += 1,
            }
        }
        counts
    }

    /// Count for one status.
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::InProgress => self.in_progress,
            Status::Resolved => self.resolved,
        }
    }

    /// `(label, count)` per status in display order.
    pub fn series(&self) -> Vec<(&'static str, usize)> {
        Status::ALL.iter().map(|s| (s.label(), self.get(*s))).collect()
    }
}

/// Complaints per category, every category present (zero when unused).
pub fn by_category<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Vec<(Category, usize)> {
    let mut counts: Vec<(Category, usize)> = Category::ALL.iter().map(|c| (*c, 0)).collect();
    for complaint in complaints {
        if let Some(slot) = counts.iter_mut().find(|(c, _)| *c == complaint.category) {
            slot.1 += 1;
        }
    }
    counts
}

/// Draws one bar per entry, scaled so the largest count spans `width` cells.
/// Labels are right-padded to a common width; zero counts draw no bar.
///
/// ```rust
/// use complaint_desk::stats::bar_chart;
///
/// let chart = bar_chart(&[("Mess", 4), ("Water", 2), ("Other", 0)], 8, "#0d6efd");
/// let plain = strip_ansi_escapes::strip_str(chart);
/// let lines: Vec<&str> = plain.lines().collect();
/// assert_eq!(lines[0], "Mess  ████████ 4");
/// assert_eq!(lines[1], "Water ████ 2");
/// assert_eq!(lines[2], "Other  0");
/// ```
pub fn bar_chart(series: &[(&str, usize)], width: usize, color: &str) -> String {
    let label_width = series
        .iter()
        .map(|(l, _)| crate::text::width(l))
        .max()
        .unwrap_or(0);
    let max = series.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let bar_style = Style::new().foreground(lipgloss::Color::from(color));

    series
        .iter()
        .map(|(label, n)| {
            let len = if max == 0 { 0 } else { (n * width).div_ceil(max) };
            let bar = if len == 0 {
                String::new()
            } else {
                bar_style.clone().inline(true).render(&"█".repeat(len))
            };
            format!("{} {} {}", crate::text::fit(label, label_width), bar, n)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplaintId, UserId};
    use chrono::Utc;

    fn complaint(status: Status, category: Category) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: ComplaintId::generate(),
            submitter_id: UserId("u".into()),
            submitter_email: "u@campus.edu".into(),
            category,
            description: "d".into(),
            status,
            created_at: now,
            updated_at: now,
            image_url: None,
            admin_comment: None,
        }
    }

    #[test]
    fn tallies_each_status() {
        let docs = vec![
            complaint(Status::Pending, Category::Mess),
            complaint(Status::Pending, Category::Water),
            complaint(Status::Resolved, Category::Mess),
        ];
        let counts = StatusCounts::tally(&docs);
        assert_eq!(
            counts,
            StatusCounts {
                total: 3,
                pending: 2,
                in_progress: 0,
                resolved: 1
            }
        );
        assert_eq!(
            counts.series(),
            vec![("Pending", 2), ("In Progress", 0), ("Resolved", 1)]
        );

        let cats = by_category(&docs);
        assert_eq!(cats.len(), Category::ALL.len());
        assert!(cats.contains(&(Category::Mess, 2)));
        assert!(cats.contains(&(Category::WiFi, 0)));
    }

    #[test]
    fn empty_chart_draws_no_bars() {
        let out = strip_ansi_escapes::strip_str(bar_chart(&[("A", 0), ("B", 0)], 10, "#fff"));
        assert_eq!(out, "A  0\nB  0");
    }
}
