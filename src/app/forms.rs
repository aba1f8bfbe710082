//! Form state: text inputs, choice fields and keyboard focus.

use super::keys::AppKeyMap;
use crate::domain::{Category, Complaint, ComplaintId, Registration, Role, Status};
use crate::error::ValidationError;
use crate::textinput::{self, EchoMode};
use crate::upload::Attachment;
use crate::view::auth::AuthMode;
use crate::view::Field;
use crate::Component;
use bubbletea_rs::{KeyMsg, Msg};

/// Which field of a form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRing {
    index: usize,
    len: usize,
}

impl FocusRing {
    /// A ring over `len` fields, starting at the first.
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Focused field.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves to the next field, wrapping around.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.len.max(1);
    }

    /// Moves to the previous field, wrapping around.
    pub fn prev(&mut self) {
        let len = self.len.max(1);
        self.index = (self.index + len - 1) % len;
    }
}

fn input(placeholder: &str) -> textinput::Model {
    let mut m = textinput::new();
    m.set_placeholder(placeholder);
    m
}

fn password_input() -> textinput::Model {
    let mut m = input("at least 6 characters");
    m.set_echo_mode(EchoMode::Password);
    m
}

fn set_focus(m: &mut textinput::Model, on: bool) {
    if on {
        let _ = m.focus();
    } else {
        m.blur();
    }
}

/// A keyboard-driven form.
pub trait Form {
    /// Focus state.
    fn ring(&mut self) -> &mut FocusRing;

    /// Focuses the input matching the ring and blurs the rest.
    fn sync_focus(&mut self);

    /// The focused text input, if the focused field is one.
    fn focused_input(&mut self) -> Option<&mut textinput::Model>;

    /// Steps the focused choice field. Returns false when the focused field
    /// is not a choice.
    fn cycle_choice(&mut self, forward: bool) -> bool;
}

/// What a key did to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Not a form key.
    Ignored,
    /// Focus, choice or text changed.
    Edited,
    /// The user asked to submit.
    Submit,
    /// The user asked to leave.
    Cancel,
}

/// Applies a key to `form`: focus keys, choice keys on choice fields, submit
/// and cancel; anything else goes to the focused text input.
pub fn handle_key<F: Form>(form: &mut F, keys: &AppKeyMap, key: &KeyMsg, msg: &Msg) -> FormAction {
    if keys.next_field.matches(key) {
        form.ring().next();
        form.sync_focus();
        return FormAction::Edited;
    }
    if keys.prev_field.matches(key) {
        form.ring().prev();
        form.sync_focus();
        return FormAction::Edited;
    }
    if keys.submit.matches(key) {
        return FormAction::Submit;
    }
    if keys.cancel.matches(key) {
        return FormAction::Cancel;
    }
    if keys.choice_next.matches(key) && form.cycle_choice(true) {
        return FormAction::Edited;
    }
    if keys.choice_prev.matches(key) && form.cycle_choice(false) {
        return FormAction::Edited;
    }
    match form.focused_input() {
        Some(input) => {
            if input.update(msg) {
                FormAction::Edited
            } else {
                FormAction::Ignored
            }
        }
        None => FormAction::Ignored,
    }
}

/// Email and password.
#[derive(Debug, Clone)]
pub struct LoginForm {
    /// Email.
    pub email: textinput::Model,
    /// Password.
    pub password: textinput::Model,
    ring: FocusRing,
}

impl Default for LoginForm {
    fn default() -> Self {
        let mut f = Self {
            email: input("you@campus.edu"),
            password: password_input(),
            ring: FocusRing::new(2),
        };
        f.sync_focus();
        f
    }
}

impl LoginForm {
    /// View fields.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("Email", self.email.view(), self.ring.index() == 0),
            Field::new("Password", self.password.view(), self.ring.index() == 1),
        ]
    }

    /// Trimmed email and password, or the first empty field.
    pub fn credentials(&self) -> Result<(String, String), ValidationError> {
        let email = required(&self.email, "email")?;
        let password = self.password.value();
        if password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok((email, password))
    }
}

impl Form for LoginForm {
    fn ring(&mut self) -> &mut FocusRing {
        &mut self.ring
    }

    fn sync_focus(&mut self) {
        let i = self.ring.index();
        set_focus(&mut self.email, i == 0);
        set_focus(&mut self.password, i == 1);
    }

    fn focused_input(&mut self) -> Option<&mut textinput::Model> {
        match self.ring.index() {
            0 => Some(&mut self.email),
            _ => Some(&mut self.password),
        }
    }

    fn cycle_choice(&mut self, _forward: bool) -> bool {
        false
    }
}

/// Name, email, password and role.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    /// Display name.
    pub name: textinput::Model,
    /// Email.
    pub email: textinput::Model,
    /// Password.
    pub password: textinput::Model,
    /// Requested role.
    pub role: Role,
    ring: FocusRing,
}

impl Default for RegisterForm {
    fn default() -> Self {
        let mut f = Self {
            name: input("Full name"),
            email: input("you@campus.edu"),
            password: password_input(),
            role: Role::Student,
            ring: FocusRing::new(4),
        };
        f.sync_focus();
        f
    }
}

impl RegisterForm {
    /// View fields.
    pub fn fields(&self) -> Vec<Field> {
        let i = self.ring.index();
        vec![
            Field::new("Name", self.name.view(), i == 0),
            Field::new("Email", self.email.view(), i == 1),
            Field::new("Password", self.password.view(), i == 2),
            Field::choice("Role", self.role.label(), i == 3),
        ]
    }

    /// Sign-up request, or the first empty field.
    pub fn registration(&self) -> Result<Registration, ValidationError> {
        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        let password = self.password.value();
        if password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(Registration {
            name,
            email,
            password,
            role: self.role,
        })
    }
}

fn required(input: &textinput::Model, field: &'static str) -> Result<String, ValidationError> {
    let value = input.value().trim().to_string();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value)
}

impl Form for RegisterForm {
    fn ring(&mut self) -> &mut FocusRing {
        &mut self.ring
    }

    fn sync_focus(&mut self) {
        let i = self.ring.index();
        set_focus(&mut self.name, i == 0);
        set_focus(&mut self.email, i == 1);
        set_focus(&mut self.password, i == 2);
    }

    fn focused_input(&mut self) -> Option<&mut textinput::Model> {
        match self.ring.index() {
            0 => Some(&mut self.name),
            1 => Some(&mut self.email),
            2 => Some(&mut self.password),
            _ => None,
        }
    }

    fn cycle_choice(&mut self, _forward: bool) -> bool {
        if self.ring.index() != 3 {
            return false;
        }
        self.role = self.role.toggle();
        true
    }
}

/// Both auth forms.
#[derive(Debug, Clone, Default)]
pub struct AuthForms {
    /// Visible form.
    pub mode: AuthMode,
    /// Login form.
    pub login: LoginForm,
    /// Register form.
    pub register: RegisterForm,
    /// A request is in flight.
    pub busy: bool,
}

impl AuthForms {
    /// Clears both forms and shows login.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Validated contents of the complaint form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Record being edited.
    pub editing: Option<ComplaintId>,
    /// Category.
    pub category: Category,
    /// Description.
    pub description: String,
    /// Image to upload.
    pub attachment: Option<Attachment>,
    /// Image path typed but not attached yet.
    pub pending_path: Option<String>,
    /// Stored image to keep.
    pub keep_image: Option<String>,
}

const CATEGORY_FIELD: usize = 0;
const DESCRIPTION_FIELD: usize = 1;
/// Index of the image path field.
pub const IMAGE_FIELD: usize = 2;

/// New/edit complaint form.
#[derive(Debug, Clone)]
pub struct ComplaintForm {
    /// Record being edited; `None` files a new one.
    pub editing: Option<ComplaintId>,
    /// Chosen category; `None` until the user picks one.
    pub category: Option<Category>,
    /// Description.
    pub description: textinput::Model,
    /// Path of an image to attach.
    pub image_path: textinput::Model,
    /// Inspected attachment.
    pub attachment: Option<Attachment>,
    /// Image stored with the record being edited.
    pub existing_image: Option<String>,
    /// A submission is in flight.
    pub busy: bool,
    ring: FocusRing,
}

impl Default for ComplaintForm {
    fn default() -> Self {
        let mut f = Self {
            editing: None,
            category: None,
            description: input("Describe the problem"),
            image_path: input("/path/to/photo.jpg"),
            attachment: None,
            existing_image: None,
            busy: false,
            ring: FocusRing::new(3),
        };
        f.sync_focus();
        f
    }
}

impl ComplaintForm {
    /// Clears the form and the attachment.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Loads a record for editing.
    pub fn load(&mut self, c: &Complaint) {
        self.reset();
        self.editing = Some(c.id.clone());
        self.category = Some(c.category);
        self.description.set_value(&c.description);
        self.existing_image = c.image_url.clone();
    }

    /// Whether the image path field has focus.
    pub fn image_field_focused(&self) -> bool {
        self.ring.index() == IMAGE_FIELD
    }

    /// Drops the attachment, the typed path and any stored image.
    pub fn remove_image(&mut self) {
        self.attachment = None;
        self.image_path.reset();
        self.existing_image = None;
    }

    /// Clears the file input after a rejected attachment.
    pub fn clear_file_input(&mut self) {
        self.attachment = None;
        self.image_path.reset();
    }

    /// Checks required fields.
    pub fn draft(&self) -> Result<Draft, ValidationError> {
        let category = self
            .category
            .ok_or(ValidationError::MissingField("category"))?;
        if self.description.is_blank() {
            return Err(ValidationError::MissingField("description"));
        }
        // The path field is the file input: an empty path detaches.
        let typed = self.image_path.value().trim().to_string();
        let (attachment, pending_path) = match &self.attachment {
            _ if typed.is_empty() => (None, None),
            Some(a) if a.path.to_string_lossy() == typed.as_str() => (Some(a.clone()), None),
            _ => (None, Some(typed)),
        };
        Ok(Draft {
            editing: self.editing.clone(),
            category,
            description: self.description.value().trim().to_string(),
            attachment,
            pending_path,
            keep_image: self.existing_image.clone(),
        })
    }

    /// View fields.
    pub fn fields(&self) -> Vec<Field> {
        let i = self.ring.index();
        vec![
            Field::choice(
                "Category",
                self.category.map_or("Select category", Category::label),
                i == CATEGORY_FIELD,
            ),
            Field::new("Description", self.description.view(), i == DESCRIPTION_FIELD),
            Field::new(
                "Image path (optional)",
                self.image_path.view(),
                i == IMAGE_FIELD,
            ),
        ]
    }
}

impl Form for ComplaintForm {
    fn ring(&mut self) -> &mut FocusRing {
        &mut self.ring
    }

    fn sync_focus(&mut self) {
        let i = self.ring.index();
        set_focus(&mut self.description, i == DESCRIPTION_FIELD);
        set_focus(&mut self.image_path, i == IMAGE_FIELD);
    }

    fn focused_input(&mut self) -> Option<&mut textinput::Model> {
        match self.ring.index() {
            DESCRIPTION_FIELD => Some(&mut self.description),
            IMAGE_FIELD => Some(&mut self.image_path),
            _ => None,
        }
    }

    fn cycle_choice(&mut self, forward: bool) -> bool {
        if self.ring.index() != CATEGORY_FIELD {
            return false;
        }
        self.category = Some(match (self.category, forward) {
            (None, true) => Category::ALL[0],
            (None, false) => Category::Other,
            (Some(c), true) => c.next(),
            (Some(c), false) => c.prev(),
        });
        true
    }
}

/// The admin manage dialog.
#[derive(Debug, Clone)]
pub struct ManageForm {
    /// Record being managed.
    pub complaint: Complaint,
    /// Chosen status.
    pub status: Status,
    /// Response to the student.
    pub comment: textinput::Model,
    /// A save is in flight.
    pub busy: bool,
    ring: FocusRing,
}

impl ManageForm {
    /// Opens the dialog with the record's current status and comment.
    pub fn new(complaint: Complaint) -> Self {
        let mut comment = input("Response shown to the student");
        comment.set_value(complaint.admin_comment.as_deref().unwrap_or_default());
        let mut f = Self {
            status: complaint.status,
            complaint,
            comment,
            busy: false,
            ring: FocusRing::new(2),
        };
        f.sync_focus();
        f
    }

    /// View fields.
    pub fn fields(&self) -> Vec<Field> {
        let i = self.ring.index();
        vec![
            Field::choice("Status", self.status.label(), i == 0),
            Field::new("Admin Comment", self.comment.view(), i == 1),
        ]
    }
}

impl Form for ManageForm {
    fn ring(&mut self) -> &mut FocusRing {
        &mut self.ring
    }

    fn sync_focus(&mut self) {
        let i = self.ring.index();
        set_focus(&mut self.comment, i == 1);
    }

    fn focused_input(&mut self) -> Option<&mut textinput::Model> {
        (self.ring.index() == 1).then_some(&mut self.comment)
    }

    fn cycle_choice(&mut self, forward: bool) -> bool {
        if self.ring.index() != 0 {
            return false;
        }
        self.status = if forward {
            self.status.next()
        } else {
            self.status.prev()
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(form: &mut impl Form, code: KeyCode, mods: KeyModifiers) -> FormAction {
        let msg: Msg = Box::new(KeyMsg {
            key: code,
            modifiers: mods,
        });
        let key = msg.downcast_ref::<KeyMsg>().unwrap();
        handle_key(form, &AppKeyMap::default(), key, &msg)
    }

    fn type_str(form: &mut impl Form, s: &str) {
        for c in s.chars() {
            press(form, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn tab_moves_between_inputs() {
        let mut f = LoginForm::default();
        type_str(&mut f, "a@b.co");
        assert_eq!(press(&mut f, KeyCode::Tab, KeyModifiers::NONE), FormAction::Edited);
        type_str(&mut f, "secret");
        assert_eq!(f.email.value(), "a@b.co");
        assert_eq!(f.password.value(), "secret");
        assert!(!f.email.focused());
        assert_eq!(press(&mut f, KeyCode::Enter, KeyModifiers::NONE), FormAction::Submit);
    }

    #[test]
    fn typing_reports_edits_and_unbound_keys_are_ignored() {
        let mut f = LoginForm::default();
        assert_eq!(
            press(&mut f, KeyCode::Char('a'), KeyModifiers::NONE),
            FormAction::Edited
        );
        assert_eq!(press(&mut f, KeyCode::F(5), KeyModifiers::NONE), FormAction::Ignored);
        assert_eq!(f.email.value(), "a");
    }

    #[test]
    fn empty_image_path_drops_the_attachment() {
        let mut f = ComplaintForm::default();
        press(&mut f, KeyCode::Right, KeyModifiers::NONE);
        press(&mut f, KeyCode::Tab, KeyModifiers::NONE);
        type_str(&mut f, "Broken fan");
        f.attachment = Some(Attachment {
            path: "/tmp/x.png".into(),
            file_name: "x.png".into(),
            size: 3,
        });
        let draft = f.draft().unwrap();
        assert!(draft.attachment.is_none());
        assert_eq!(draft.pending_path, None);
    }

    #[test]
    fn auth_forms_name_the_empty_field() {
        let mut login = LoginForm::default();
        assert_eq!(login.credentials().unwrap_err(), ValidationError::MissingField("email"));
        type_str(&mut login, "a@b.co");
        assert_eq!(
            login.credentials().unwrap_err(),
            ValidationError::MissingField("password")
        );

        let mut register = RegisterForm::default();
        type_str(&mut register, "Ravi");
        press(&mut register, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(
            register.registration().unwrap_err(),
            ValidationError::MissingField("email")
        );
        type_str(&mut register, "ravi@campus.edu");
        press(&mut register, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(
            register.registration().unwrap_err(),
            ValidationError::MissingField("password")
        );
        type_str(&mut register, "secret1");
        let r = register.registration().unwrap();
        assert_eq!((r.name.as_str(), r.role), ("Ravi", Role::Student));
    }

    #[test]
    fn role_choice_toggles_only_when_focused() {
        let mut f = RegisterForm::default();
        press(&mut f, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(f.role, Role::Student);
        press(&mut f, KeyCode::BackTab, KeyModifiers::NONE);
        press(&mut f, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(f.role, Role::Admin);
    }

    #[test]
    fn complaint_form_requires_category_and_description() {
        let mut f = ComplaintForm::default();
        assert_eq!(f.draft().unwrap_err(), ValidationError::MissingField("category"));
        press(&mut f, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(f.category, Some(Category::Hostel));
        assert_eq!(
            f.draft().unwrap_err(),
            ValidationError::MissingField("description")
        );
        press(&mut f, KeyCode::Tab, KeyModifiers::NONE);
        type_str(&mut f, "  Broken fan ");
        let draft = f.draft().unwrap();
        assert_eq!(draft.description, "Broken fan");
        assert_eq!(draft.pending_path, None);

        press(&mut f, KeyCode::Tab, KeyModifiers::NONE);
        assert!(f.image_field_focused());
        type_str(&mut f, "/tmp/x.png");
        assert_eq!(f.draft().unwrap().pending_path.as_deref(), Some("/tmp/x.png"));
        f.clear_file_input();
        assert_eq!(f.draft().unwrap().pending_path, None);
    }

    #[test]
    fn manage_form_starts_from_record() {
        let now = chrono::Utc::now();
        let c = Complaint {
            id: ComplaintId("abc".into()),
            submitter_id: crate::domain::UserId("u".into()),
            submitter_email: "u@campus.edu".into(),
            category: Category::Water,
            description: "d".into(),
            status: Status::InProgress,
            created_at: now,
            updated_at: now,
            image_url: None,
            admin_comment: Some("on it".into()),
        };
        let mut f = ManageForm::new(c);
        assert_eq!(f.comment.value(), "on it");
        press(&mut f, KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(f.status, Status::Pending);
        press(&mut f, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut f, KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(f.status, Status::Pending);
        assert_eq!(f.comment.position(), 4);
    }
}
