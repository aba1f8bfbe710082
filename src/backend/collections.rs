//! Document collections and the write rules both local backends share.

use super::password::PasswordHash;
use crate::domain::{
    Complaint, ComplaintEdit, ComplaintId, NewComplaint, Query, Registration, Role, Session,
    Status, StatusUpdate, UserId,
};
use crate::error::{AuthError, BackendError, BackendResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MIN_PASSWORD_LEN: usize = 6;

/// Hands out server timestamps. Successive stamps are strictly increasing
/// even when the wall clock stalls or steps back.
#[derive(Debug, Clone, Default)]
pub struct ServerClock {
    last: Option<DateTime<Utc>>,
}

impl ServerClock {
    /// The next timestamp.
    pub fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last = Some(next);
        next
    }

    /// Makes sure later stamps come after `seen`.
    pub fn observe(&mut self, seen: DateTime<Utc>) {
        if self.last.map_or(true, |last| seen > last) {
            self.last = Some(seen);
        }
    }
}

/// A stored account: profile plus credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account id.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Sign-in email as entered.
    pub email: String,
    /// Stored role; anything but `"admin"` reads as student.
    #[serde(default)]
    pub role: Option<String>,
    /// Credentials.
    pub password: PasswordHash,
    /// Server timestamp of registration.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// The session this account signs in as.
    pub fn session(&self) -> Session {
        Session {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: Role::from_stored(self.role.as_deref()),
        }
    }
}

/// The complaint and account collections.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    complaints: BTreeMap<ComplaintId, Complaint>,
    accounts: BTreeMap<String, Account>,
    clock: ServerClock,
}

impl Collections {
    /// Loads collections from stored documents.
    pub fn from_documents(complaints: Vec<Complaint>, accounts: Vec<Account>) -> Self {
        let mut clock = ServerClock::default();
        for c in &complaints {
            clock.observe(c.created_at);
            clock.observe(c.updated_at);
        }
        for a in &accounts {
            clock.observe(a.created_at);
        }
        Self {
            complaints: complaints.into_iter().map(|c| (c.id.clone(), c)).collect(),
            accounts: accounts
                .into_iter()
                .map(|a| (email_key(&a.email), a))
                .collect(),
            clock,
        }
    }

    /// Every complaint, in id order.
    pub fn complaints(&self) -> impl Iterator<Item = &Complaint> {
        self.complaints.values()
    }

    /// Every account, in email order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Runs `query`.
    pub fn query(&self, query: &Query) -> Vec<Complaint> {
        query.apply(self.complaints.values())
    }

    /// One complaint.
    pub fn get(&self, id: &ComplaintId) -> Option<Complaint> {
        self.complaints.get(id).cloned()
    }

    /// Inserts a new pending complaint.
    pub fn create(&mut self, new: NewComplaint) -> Complaint {
        let at = self.clock.stamp();
        let complaint = Complaint {
            id: ComplaintId::generate(),
            submitter_id: new.submitter_id,
            submitter_email: new.submitter_email,
            category: new.category,
            description: new.description,
            status: Status::Pending,
            created_at: at,
            updated_at: at,
            image_url: new.image_url,
            admin_comment: None,
        };
        self.complaints.insert(complaint.id.clone(), complaint.clone());
        complaint
    }

    /// Applies a student edit. Only pending complaints can change.
    pub fn update_details(&mut self, id: &ComplaintId, edit: ComplaintEdit) -> BackendResult<Complaint> {
        let at = self.clock.stamp();
        let complaint = self.pending_mut(id)?;
        complaint.category = edit.category;
        complaint.description = edit.description;
        complaint.image_url = edit.image_url;
        complaint.updated_at = at;
        Ok(complaint.clone())
    }

    /// Applies a triage decision. `created_at` is left alone.
    pub fn update_status(&mut self, id: &ComplaintId, update: StatusUpdate) -> BackendResult<Complaint> {
        let at = self.clock.stamp();
        let complaint = self
            .complaints
            .get_mut(id)
            .ok_or_else(|| not_found(id))?;
        complaint.status = update.status;
        complaint.admin_comment = Some(update.admin_comment);
        complaint.updated_at = at;
        Ok(complaint.clone())
    }

    /// Removes a pending complaint.
    pub fn delete(&mut self, id: &ComplaintId) -> BackendResult<()> {
        self.pending_mut(id)?;
        self.complaints.remove(id);
        Ok(())
    }

    fn pending_mut(&mut self, id: &ComplaintId) -> BackendResult<&mut Complaint> {
        let complaint = self
            .complaints
            .get_mut(id)
            .ok_or_else(|| not_found(id))?;
        if !complaint.is_editable() {
            return Err(BackendError::PermissionDenied(format!(
                "complaint {} is {}",
                id,
                complaint.status
            )));
        }
        Ok(complaint)
    }

    /// Registers an account.
    pub fn sign_up(&mut self, registration: Registration) -> Result<Account, AuthError> {
        let email = registration.email.trim().to_string();
        validate_email(&email)?;
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let key = email_key(&email);
        if self.accounts.contains_key(&key) {
            return Err(AuthError::EmailInUse);
        }
        let account = Account {
            user_id: UserId::generate(),
            name: registration.name.trim().to_string(),
            email,
            role: Some(
                match registration.role {
                    Role::Admin => "admin",
                    Role::Student => "student",
                }
                .to_string(),
            ),
            password: PasswordHash::new(&registration.password),
            created_at: self.clock.stamp(),
        };
        self.accounts.insert(key, account.clone());
        Ok(account)
    }

    /// Checks credentials.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        validate_email(email)?;
        let account = self
            .accounts
            .get(&email_key(email))
            .ok_or(AuthError::UserNotFound)?;
        if !account.password.verify(password) {
            return Err(AuthError::WrongPassword);
        }
        Ok(account.session())
    }
}

fn not_found(id: &ComplaintId) -> BackendError {
    BackendError::NotFound {
        collection: "complaints",
        id: id.to_string(),
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail);
    };
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    if well_formed {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn registration(email: &str, password: &str, role: Role) -> Registration {
        Registration {
            name: "Asha".into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }

    fn new_complaint(owner: &str) -> NewComplaint {
        NewComplaint {
            submitter_id: UserId(owner.into()),
            submitter_email: format!("{owner}@campus.edu"),
            category: Category::Water,
            description: "No water on floor 3".into(),
            image_url: None,
        }
    }

    #[test]
    fn clock_is_strictly_increasing() {
        let mut clock = ServerClock::default();
        let future = Utc::now() + Duration::hours(1);
        clock.observe(future);
        let a = clock.stamp();
        let b = clock.stamp();
        assert!(a > future);
        assert!(b > a);
    }

    #[test]
    fn sign_up_rules() {
        let mut c = Collections::default();
        assert_eq!(
            c.sign_up(registration("not-an-email", "secret1", Role::Student)).unwrap_err(),
            AuthError::InvalidEmail
        );
        assert_eq!(
            c.sign_up(registration("a@campus.edu", "12345", Role::Student)).unwrap_err(),
            AuthError::WeakPassword
        );
        let account = c
            .sign_up(registration("a@campus.edu", "123456", Role::Admin))
            .unwrap();
        assert_eq!(account.session().role, Role::Admin);
        assert_eq!(
            c.sign_up(registration("A@Campus.edu", "123456", Role::Student)).unwrap_err(),
            AuthError::EmailInUse
        );
    }

    #[test]
    fn sign_in_checks_credentials() {
        let mut c = Collections::default();
        c.sign_up(registration("a@campus.edu", "123456", Role::Student)).unwrap();
        assert_eq!(c.sign_in(" a@campus.edu ", "123456").unwrap().name, "Asha");
        assert_eq!(
            c.sign_in("a@campus.edu", "654321").unwrap_err(),
            AuthError::WrongPassword
        );
        assert_eq!(
            c.sign_in("b@campus.edu", "123456").unwrap_err(),
            AuthError::UserNotFound
        );
    }

    #[test]
    fn status_update_keeps_creation_order() {
        let mut c = Collections::default();
        let first = c.create(new_complaint("u1"));
        let second = c.create(new_complaint("u1"));
        let updated = c
            .update_status(
                &first.id,
                StatusUpdate {
                    status: Status::InProgress,
                    admin_comment: "Plumber booked".into(),
                },
            )
            .unwrap();
        assert_eq!(updated.created_at, first.created_at);
        assert!(updated.updated_at > second.updated_at);

        let listed = c.query(&Query::all());
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert_eq!(listed[1].status, Status::InProgress);
    }

    #[test]
    fn only_pending_complaints_change() {
        let mut c = Collections::default();
        let complaint = c.create(new_complaint("u1"));
        c.update_status(
            &complaint.id,
            StatusUpdate {
                status: Status::Resolved,
                admin_comment: String::new(),
            },
        )
        .unwrap();
        let edit = ComplaintEdit {
            category: Category::Mess,
            description: "changed".into(),
            image_url: None,
        };
        assert!(matches!(
            c.update_details(&complaint.id, edit),
            Err(BackendError::PermissionDenied(_))
        ));
        assert!(matches!(
            c.delete(&complaint.id),
            Err(BackendError::PermissionDenied(_))
        ));
        assert!(matches!(
            c.delete(&ComplaintId("missing".into())),
            Err(BackendError::NotFound { .. })
        ));
    }

    #[test]
    fn unknown_stored_role_reads_as_student() {
        let mut c = Collections::default();
        let mut account = c
            .sign_up(registration("a@campus.edu", "123456", Role::Admin))
            .unwrap();
        account.role = Some("superuser".into());
        assert_eq!(account.session().role, Role::Student);
        account.role = None;
        assert_eq!(account.session().role, Role::Student);
    }
}
