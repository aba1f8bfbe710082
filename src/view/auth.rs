//! The signed-out screen: login form, or the register form in its place.

use super::{field, heading, muted, Field};

/// Which auth form is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Email and password.
    #[default]
    Login,
    /// Name, email, password and role.
    Register,
}

/// View-model of the auth screen.
#[derive(Debug, Clone)]
pub struct AuthView {
    /// Visible form.
    pub mode: AuthMode,
    /// Fields in focus order.
    pub fields: Vec<Field>,
    /// A request is in flight.
    pub busy: bool,
}

/// Renders the auth screen.
pub fn render(v: &AuthView) -> String {
    let (title, hint) = match v.mode {
        AuthMode::Login => ("Login", "enter sign in • ctrl+r create an account"),
        AuthMode::Register => ("Register", "enter create account • esc back to login"),
    };
    let mut out = vec![heading("Complaint Desk"), String::new(), heading(title)];
    out.extend(v.fields.iter().map(field));
    out.push(String::new());
    if v.busy {
        out.push(muted("Please wait…"));
    } else {
        out.push(muted(hint));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_form_lists_its_fields() {
        let v = AuthView {
            mode: AuthMode::Register,
            fields: vec![
                Field::new("Name", "> Asha".into(), true),
                Field::new("Email", "> ".into(), false),
                Field::new("Password", "> ".into(), false),
                Field::choice("Role", "Student", false),
            ],
            busy: false,
        };
        let out = strip_ansi_escapes::strip_str(render(&v));
        assert!(out.contains("Register"));
        assert!(out.contains("▸ Name"));
        assert!(out.contains("  Role"));
        assert!(out.contains("esc back to login"));
    }

    #[test]
    fn busy_login_shows_progress() {
        let v = AuthView {
            mode: AuthMode::Login,
            fields: vec![],
            busy: true,
        };
        let out = strip_ansi_escapes::strip_str(render(&v));
        assert!(out.ends_with("Please wait…"));
    }
}
