//! Complaint records and the enums that classify them.

use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier assigned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(pub String);

impl ComplaintId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// The abbreviated form shown in tables and modal titles: the first six
    /// characters followed by `...`.
    ///
    /// ```rust
    /// use complaint_desk::domain::ComplaintId;
    ///
    /// let id = ComplaintId("a1b2c3d4e5".to_string());
    /// assert_eq!(id.short(), "a1b2c3...");
    /// ```
    pub fn short(&self) -> String {
        let head: String = self.0.chars().take(6).collect();
        format!("{head}...")
    }

    /// Borrows the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of complaint categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Hostel rooms and buildings.
    Hostel,
    /// Mess and food service.
    Mess,
    /// Wireless network.
    #[serde(rename = "Wi-Fi")]
    WiFi,
    /// Washrooms.
    Washroom,
    /// Power supply.
    Electricity,
    /// Water supply.
    Water,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Hostel,
        Category::Mess,
        Category::WiFi,
        Category::Washroom,
        Category::Electricity,
        Category::Water,
        Category::Other,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Hostel => "Hostel",
            Category::Mess => "Mess",
            Category::WiFi => "Wi-Fi",
            Category::Washroom => "Washroom",
            Category::Electricity => "Electricity",
            Category::Water => "Water",
            Category::Other => "Other",
        }
    }

    /// The category after `self` in [`Category::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The category before `self` in [`Category::ALL`], wrapping around.
    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known category or status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// How a status badge is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Amber.
    Warning,
    /// Cyan.
    Info,
    /// Green.
    Success,
}

/// Lifecycle of a complaint. New complaints start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Filed, not yet picked up.
    #[default]
    Pending,
    /// Being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Closed.
    Resolved,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Resolved];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }

    /// Lower-case label with spaces removed, e.g. `inprogress`.
    pub fn slug(self) -> String {
        self.label().to_lowercase().replace(' ', "")
    }

    /// Badge colour for this status.
    pub fn badge(self) -> Badge {
        match self {
            Status::Pending => Badge::Warning,
            Status::InProgress => Badge::Info,
            Status::Resolved => Badge::Success,
        }
    }

    /// The status after `self`, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Status::Pending => Status::InProgress,
            Status::InProgress => Status::Resolved,
            Status::Resolved => Status::Pending,
        }
    }

    /// The status before `self`, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Status::Pending => Status::Resolved,
            Status::InProgress => Status::Pending,
            Status::Resolved => Status::InProgress,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(' ', "");
        Self::ALL
            .into_iter()
            .find(|st| st.slug() == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// A stored complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    /// Store-assigned identifier.
    pub id: ComplaintId,
    /// Account that filed the complaint.
    pub submitter_id: UserId,
    /// Email of that account at filing time.
    pub submitter_email: String,
    /// Category.
    pub category: Category,
    /// Free-text description.
    pub description: String,
    /// Current status.
    pub status: Status,
    /// Server timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Server timestamp of the last write.
    pub updated_at: DateTime<Utc>,
    /// Retrievable URL of the attached image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Administrator response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
}

impl Complaint {
    /// Students may edit or delete a complaint only while it is pending.
    pub fn is_editable(&self) -> bool {
        self.status == Status::Pending
    }

    /// The admin response a student gets to see: only once work has started
    /// and only when a non-empty comment exists.
    pub fn visible_admin_response(&self) -> Option<&str> {
        if self.status == Status::Pending {
            return None;
        }
        self.admin_comment
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }
}

/// Payload for creating a complaint. The store fills in id, status and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    /// Filing account.
    pub submitter_id: UserId,
    /// Filing account's email.
    pub submitter_email: String,
    /// Category.
    pub category: Category,
    /// Description.
    pub description: String,
    /// Uploaded image URL.
    pub image_url: Option<String>,
}

/// Changes a student may make to a pending complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintEdit {
    /// New category.
    pub category: Category,
    /// New description.
    pub description: String,
    /// Image URL after the edit; `None` removes the image.
    pub image_url: Option<String>,
}

/// An administrator's triage decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// New status.
    pub status: Status,
    /// Response shown to the student.
    pub admin_comment: String,
}

/// Equality filters of the admin listing. `None` means "All".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComplaintFilter {
    /// Required status.
    pub status: Option<Status>,
    /// Required category.
    pub category: Option<Category>,
}

impl ComplaintFilter {
    /// Whether `complaint` passes every set predicate.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.map_or(true, |s| complaint.status == s)
            && self.category.map_or(true, |c| complaint.category == c)
    }

    /// Steps the status filter: All → Pending → In Progress → Resolved → All.
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(Status::Pending),
            Some(Status::Resolved) => None,
            Some(s) => Some(s.next()),
        };
    }

    /// Steps the category filter through All and every category.
    pub fn cycle_category(&mut self) {
        self.category = match self.category {
            None => Some(Category::ALL[0]),
            Some(Category::Other) => None,
            Some(c) => Some(c.next()),
        };
    }

    /// Label of the status filter.
    pub fn status_label(&self) -> &'static str {
        self.status.map_or("All", Status::label)
    }

    /// Label of the category filter.
    pub fn category_label(&self) -> &'static str {
        self.category.map_or("All", Category::label)
    }
}

/// A collection query: equality filters, newest-first ordering by creation
/// time, and an optional result limit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Only complaints filed by this account.
    pub owner: Option<UserId>,
    /// Status/category predicates.
    pub filter: ComplaintFilter,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl Query {
    /// Every complaint.
    pub fn all() -> Self {
        Self::default()
    }

    /// Complaints filed by `owner`.
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    /// Adds status/category predicates.
    pub fn with_filter(mut self, filter: ComplaintFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Restricts the query to one status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.filter.status = Some(status);
        self
    }

    /// Caps the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `complaint` satisfies the predicates.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.owner
            .as_ref()
            .map_or(true, |o| &complaint.submitter_id == o)
            && self.filter.matches(complaint)
    }

    /// Evaluates the query over a set of documents: filter, sort newest
    /// first (ties broken by id), then truncate.
    pub fn apply<'a>(&self, docs: impl IntoIterator<Item = &'a Complaint>) -> Vec<Complaint> {
        let mut out: Vec<Complaint> = docs
            .into_iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}
