//! Modal views over a single complaint: details, the admin manage dialog and
//! the delete confirmation.

use super::listing::Audience;
use super::{badge, field, format_time, heading, muted, Field};
use crate::domain::Complaint;
use crate::text::{clean_line, Sanitizer};

/// Modal title: `Complaint #` and the short id.
pub fn title(c: &Complaint) -> String {
    format!("Complaint #{}", c.id.short())
}

fn description(c: &Complaint) -> String {
    Sanitizer::default()
        .with_newline("\n    ")
        .sanitize(&c.description)
}

/// View-model of the details modal.
#[derive(Debug, Clone)]
pub struct DetailView<'a> {
    /// The record.
    pub complaint: &'a Complaint,
    /// Student or admin variant.
    pub audience: Audience,
}

/// Renders the details modal.
pub fn render(v: &DetailView<'_>) -> String {
    let c = v.complaint;
    let mut out = vec![heading(&title(c)), String::new()];
    if v.audience == Audience::Admin {
        out.push(format!("Student Email: {}", clean_line(&c.submitter_email)));
    }
    out.push(format!("Category: {}", c.category.label()));
    out.push(format!("Status: {}", badge(c.status)));
    out.push(format!("Submitted: {}", format_time(c.created_at)));
    out.push(format!("Last Updated: {}", format_time(c.updated_at)));
    out.push(String::new());
    out.push("Description".to_string());
    out.push(format!("    {}", description(c)));
    if let Some(url) = &c.image_url {
        out.push(String::new());
        out.push(format!("Image: {}", clean_line(url)));
    }
    if v.audience == Audience::Student {
        if let Some(response) = c.visible_admin_response() {
            out.push(String::new());
            out.push("Admin Response".to_string());
            out.push(format!("    {}", clean_line(response)));
        }
    }
    out.push(String::new());
    out.push(muted("esc close"));
    out.join("\n")
}

/// View-model of the admin manage dialog.
#[derive(Debug, Clone)]
pub struct ManageView<'a> {
    /// The record being managed.
    pub complaint: &'a Complaint,
    /// Status selector and comment, in focus order.
    pub fields: Vec<Field>,
    /// A save is in flight.
    pub busy: bool,
}

/// Renders the manage dialog.
pub fn render_manage(v: &ManageView<'_>) -> String {
    let c = v.complaint;
    let mut out = vec![heading(&title(c)), String::new()];
    out.extend(v.fields.iter().map(field));
    out.push(String::new());
    out.push(format!("Submitted By: {}", clean_line(&c.submitter_email)));
    out.push(format!("Category: {}", c.category.label()));
    out.push("Description".to_string());
    out.push(format!("    {}", description(c)));
    if let Some(url) = &c.image_url {
        out.push(format!("Image: {}", clean_line(url)));
    }
    out.push(String::new());
    out.push(if v.busy {
        muted("Saving…")
    } else {
        muted("tab next field • ←/→ choose status • ctrl+s save • esc cancel")
    });
    out.join("\n")
}

/// Renders the delete confirmation.
pub fn render_confirm_delete(c: &Complaint) -> String {
    [
        heading(&title(c)),
        String::new(),
        "Are you sure you want to delete this complaint?".to_string(),
        String::new(),
        muted("y delete • n keep"),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ComplaintId, Status, UserId};
    use chrono::Utc;

    fn complaint(status: Status, comment: Option<&str>) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: ComplaintId("abcdef123456".into()),
            submitter_id: UserId("u1".into()),
            submitter_email: "u1@campus.edu".into(),
            category: Category::Washroom,
            description: "Leaking tap\nsecond floor".into(),
            status,
            created_at: now,
            updated_at: now,
            image_url: Some("memory:///complaints/u1/1_tap.png".into()),
            admin_comment: comment.map(String::from),
        }
    }

    fn plain(s: String) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    #[test]
    fn student_sees_response_only_after_pending() {
        let pending = complaint(Status::Pending, Some("queued"));
        let out = plain(render(&DetailView {
            complaint: &pending,
            audience: Audience::Student,
        }));
        assert!(out.starts_with("Complaint #abcdef..."));
        assert!(!out.contains("Admin Response"));
        assert!(!out.contains("Student Email"));

        let resolved = complaint(Status::Resolved, Some("Fixed the washer"));
        let out = plain(render(&DetailView {
            complaint: &resolved,
            audience: Audience::Student,
        }));
        assert!(out.contains("Admin Response"));
        assert!(out.contains("Fixed the washer"));
        assert!(out.contains("Image: memory:///complaints/u1/1_tap.png"));
        assert!(out.contains("Leaking tap\n    second floor"));
    }

    #[test]
    fn admin_variant_shows_submitter() {
        let c = complaint(Status::Resolved, Some("done"));
        let out = plain(render(&DetailView {
            complaint: &c,
            audience: Audience::Admin,
        }));
        assert!(out.contains("Student Email: u1@campus.edu"));
        assert!(!out.contains("Admin Response"));
    }

    #[test]
    fn manage_dialog_lists_read_only_fields() {
        let c = complaint(Status::Pending, None);
        let out = plain(render_manage(&ManageView {
            complaint: &c,
            fields: vec![
                Field::choice("Status", "In Progress", true),
                Field::new("Admin Comment", "> ".into(), false),
            ],
            busy: false,
        }));
        assert!(out.contains("‹ In Progress ›"));
        assert!(out.contains("Submitted By: u1@campus.edu"));
        assert!(out.contains("Category: Washroom"));
    }
}
