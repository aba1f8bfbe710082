//! Complaint tables: the student's "My Complaints" page and the table part of
//! the admin dashboard.

use super::{badge_style, format_time, heading, muted};
use crate::domain::Complaint;
use crate::listing::{self, Pagination};
use crate::table::{self, Cell, Column, Row};
use crate::text;

/// Who is looking at a table or a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The submitting student.
    Student,
    /// An administrator.
    Admin,
}

/// Shown when a listing has nothing on the current page.
pub const EMPTY_MESSAGE: &str = "No complaints found";

/// View-model of one page of a complaint table.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    /// Whose table this is.
    pub audience: Audience,
    /// Records on the current page.
    pub visible: &'a [Complaint],
    /// Page position and count.
    pub pagination: Pagination,
    /// Selected row on the page.
    pub selected: usize,
    /// Graphemes of description shown.
    pub preview_len: usize,
    /// A fetch is in flight.
    pub loading: bool,
}

fn columns(audience: Audience) -> Vec<Column> {
    match audience {
        Audience::Student => vec![
            Column::new("ID", 9),
            Column::new("Category", 11),
            Column::new("Description", 40),
            Column::new("Submitted", 19),
            Column::new("Status", 13),
            Column::new("Actions", 17),
        ],
        Audience::Admin => vec![
            Column::new("ID", 9),
            Column::new("Student", 22),
            Column::new("Category", 11),
            Column::new("Description", 32),
            Column::new("Submitted", 19),
            Column::new("Status", 13),
            Column::new("Actions", 13),
        ],
    }
}

/// The actions a row offers.
pub fn actions(audience: Audience, complaint: &Complaint) -> &'static str {
    match audience {
        Audience::Admin => "view manage",
        Audience::Student if complaint.is_editable() => "view edit delete",
        Audience::Student => "view",
    }
}

fn to_row(audience: Audience, c: &Complaint, preview_len: usize) -> Row {
    let description = text::preview(&text::clean_line(&c.description), preview_len);
    let status = Cell::styled(format!(" {} ", c.status.label()), badge_style(c.status));
    let mut cells = vec![Cell::plain(c.id.short())];
    if audience == Audience::Admin {
        cells.push(Cell::plain(text::clean_line(&c.submitter_email)));
    }
    cells.extend([
        Cell::plain(c.category.label()),
        Cell::plain(description),
        Cell::plain(format_time(c.created_at)),
        status,
        Cell::plain(actions(audience, c)),
    ]);
    Row::new(cells)
}

/// Renders the table, then the pagination controls when there are any.
pub fn render_table(v: &TableView<'_>) -> String {
    let rows = v
        .visible
        .iter()
        .map(|c| to_row(v.audience, c, v.preview_len))
        .collect();
    let table = table::Model::new(columns(v.audience))
        .with_rows(rows)
        .with_empty_message(EMPTY_MESSAGE)
        .with_selected(v.selected);

    let mut out = vec![table.view()];
    if v.pagination.has_controls() {
        out.push(String::new());
        out.push(format!(
            "  {}",
            v.pagination.view(&listing::Styles::default())
        ));
    }
    if v.loading {
        out.push(muted("  Loading…"));
    }
    out.join("\n")
}

/// Renders the "My Complaints" page.
pub fn render(v: &TableView<'_>) -> String {
    [heading("My Complaints"), String::new(), render_table(v)].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ComplaintId, Status, UserId};
    use crate::listing::paginate;
    use chrono::Utc;

    fn complaint(n: usize, status: Status) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: ComplaintId(format!("id{n:04}xyz")),
            submitter_id: UserId("u1".into()),
            submitter_email: "u1@campus.edu".into(),
            category: Category::Mess,
            description: format!("complaint number {n}"),
            status,
            created_at: now,
            updated_at: now,
            image_url: None,
            admin_comment: None,
        }
    }

    fn plain(s: String) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    #[test]
    fn empty_listing_has_one_row_and_no_controls() {
        let v = TableView {
            audience: Audience::Student,
            visible: &[],
            pagination: Pagination::for_len(0, 5, 1),
            selected: 0,
            preview_len: 50,
            loading: false,
        };
        let out = plain(render(&v));
        assert!(out.contains(EMPTY_MESSAGE));
        assert!(!out.contains("Next »"));
        assert_eq!(out.lines().filter(|l| l.contains(EMPTY_MESSAGE)).count(), 1);
    }

    #[test]
    fn second_page_of_twelve() {
        let items: Vec<_> = (0..12).map(|n| complaint(n, Status::Pending)).collect();
        let (visible, total) = paginate(&items, 5, 2);
        let v = TableView {
            audience: Audience::Student,
            visible,
            pagination: Pagination::new(2, total),
            selected: 0,
            preview_len: 50,
            loading: false,
        };
        let out = plain(render(&v));
        assert!(out.contains("complaint number 5"));
        assert!(out.contains("complaint number 9"));
        assert!(!out.contains("complaint number 4"));
        assert!(!out.contains("complaint number 10"));
        assert!(out.contains("« Prev"));
        assert!(out.contains("Next »"));
    }

    #[test]
    fn only_pending_rows_offer_edit() {
        let pending = complaint(1, Status::Pending);
        let resolved = complaint(2, Status::Resolved);
        assert_eq!(actions(Audience::Student, &pending), "view edit delete");
        assert_eq!(actions(Audience::Student, &resolved), "view");
        assert_eq!(actions(Audience::Admin, &resolved), "view manage");
    }

    #[test]
    fn rows_use_short_ids_and_previews() {
        let mut c = complaint(7, Status::InProgress);
        c.description = format!("{}\x1b[2J", "d".repeat(60));
        let v = TableView {
            audience: Audience::Admin,
            visible: std::slice::from_ref(&c),
            pagination: Pagination::for_len(1, 5, 1),
            selected: 0,
            preview_len: 10,
            loading: false,
        };
        let out = plain(render_table(&v));
        assert!(out.contains("id0007..."));
        assert!(out.contains("dddddddddd..."));
        assert!(out.contains("u1@campus.edu"));
        assert!(out.contains("In Progress"));
        assert!(!out.contains("[2J"));
    }
}
