//! The administrator dashboard: stat cards, charts, filter bar and the
//! complaint table.

use super::listing::{render_table, TableView};
use super::{card, heading, muted, row};
use crate::domain::{Category, ComplaintFilter};
use crate::stats::{bar_chart, StatusCounts};

const CHART_WIDTH: usize = 20;

/// View-model of the dashboard.
#[derive(Debug, Clone)]
pub struct AdminView<'a> {
    /// Counts per status over every complaint.
    pub counts: StatusCounts,
    /// Counts per category over every complaint.
    pub by_category: Vec<(Category, usize)>,
    /// Active filters.
    pub filter: ComplaintFilter,
    /// The filtered table page.
    pub table: TableView<'a>,
}

/// Renders the dashboard.
pub fn render(v: &AdminView<'_>) -> String {
    let cards = row(&[
        card("Total", &v.counts.total.to_string()),
        card("Pending", &v.counts.pending.to_string()),
        card("In Progress", &v.counts.in_progress.to_string()),
        card("Resolved", &v.counts.resolved.to_string()),
    ]);

    let categories: Vec<(&str, usize)> = v
        .by_category
        .iter()
        .map(|(c, n)| (c.label(), *n))
        .collect();
    let charts = row(&[
        card(
            "Complaints by Category",
            &bar_chart(&categories, CHART_WIDTH, "#0d6efd"),
        ),
        card(
            "Status Distribution",
            &bar_chart(&v.counts.series(), CHART_WIDTH, "#0dcaf0"),
        ),
    ]);

    let filters = format!(
        "Status: {}   Category: {}   {}",
        v.filter.status_label(),
        v.filter.category_label(),
        muted("s status • c category")
    );

    [
        heading("Admin Dashboard"),
        cards,
        charts,
        String::new(),
        filters,
        String::new(),
        render_table(&v.table),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use crate::listing::Pagination;
    use crate::view::listing::{Audience, EMPTY_MESSAGE};

    #[test]
    fn dashboard_shows_counts_filters_and_table() {
        let v = AdminView {
            counts: StatusCounts {
                total: 7,
                pending: 3,
                in_progress: 2,
                resolved: 2,
            },
            by_category: vec![(Category::Mess, 4), (Category::WiFi, 3)],
            filter: ComplaintFilter {
                status: Some(Status::Resolved),
                category: None,
            },
            table: TableView {
                audience: Audience::Admin,
                visible: &[],
                pagination: Pagination::for_len(0, 5, 1),
                selected: 0,
                preview_len: 50,
                loading: false,
            },
        };
        let out = strip_ansi_escapes::strip_str(render(&v));
        assert!(out.starts_with("Admin Dashboard"));
        assert!(out.contains("Status: Resolved"));
        assert!(out.contains("Category: All"));
        assert!(out.contains("Wi-Fi"));
        assert!(out.contains("In Progress"));
        assert!(out.contains(EMPTY_MESSAGE));
    }
}
