//! The new/edit complaint form.

use super::{field, heading, muted, Field};

/// View-model of the complaint form.
#[derive(Debug, Clone)]
pub struct FormView {
    /// Editing an existing complaint rather than filing a new one.
    pub editing: bool,
    /// Category, description and image path, in focus order.
    pub fields: Vec<Field>,
    /// Preview line of the attached file.
    pub attachment: Option<String>,
    /// Image already stored with the complaint being edited.
    pub existing_image: Option<String>,
    /// A submission is in flight.
    pub busy: bool,
}

/// Renders the form.
pub fn render(v: &FormView) -> String {
    let title = if v.editing {
        "Edit Complaint"
    } else {
        "New Complaint"
    };
    let mut out = vec![heading(title), String::new()];
    out.extend(v.fields.iter().map(field));
    out.push(String::new());

    match (&v.attachment, &v.existing_image) {
        (Some(summary), _) => out.push(format!(
            "  Attached: {}  {}",
            crate::text::clean_line(summary),
            muted("ctrl+x remove")
        )),
        (None, Some(url)) => out.push(format!(
            "  Current image: {}  {}",
            crate::text::clean_line(url),
            muted("ctrl+x remove")
        )),
        (None, None) => out.push(muted("  No image attached")),
    }
    out.push(String::new());

    if v.busy {
        out.push(muted("Submitting…"));
    } else {
        let action = if v.editing { "save" } else { "submit" };
        out.push(muted(&format!(
            "tab next field • ←/→ choose category • enter on image path attaches • ctrl+s {action} • esc cancel"
        )));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(attachment: Option<&str>, existing: Option<&str>) -> FormView {
        FormView {
            editing: existing.is_some(),
            fields: vec![
                Field::choice("Category", "Select category", true),
                Field::new("Description", "> ".into(), false),
                Field::new("Image path (optional)", "> ".into(), false),
            ],
            attachment: attachment.map(String::from),
            existing_image: existing.map(String::from),
            busy: false,
        }
    }

    #[test]
    fn new_form_without_image() {
        let out = strip_ansi_escapes::strip_str(render(&view(None, None)));
        assert!(out.starts_with("New Complaint"));
        assert!(out.contains("‹ Select category ›"));
        assert!(out.contains("No image attached"));
        assert!(out.contains("ctrl+s submit"));
    }

    #[test]
    fn attachment_preview_wins_over_stored_image() {
        let out = strip_ansi_escapes::strip_str(render(&view(
            Some("tap.jpg (4 B)"),
            Some("file:///data/blobs/old.png"),
        )));
        assert!(out.starts_with("Edit Complaint"));
        assert!(out.contains("Attached: tap.jpg (4 B)"));
        assert!(!out.contains("old.png"));
        assert!(out.contains("ctrl+s save"));
    }
}
