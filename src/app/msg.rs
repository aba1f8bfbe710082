//! Messages produced by application commands.

use crate::domain::{Category, Complaint, ComplaintId, Session};
use crate::error::{AuthError, BackendResult, DeskError, ValidationError};
use crate::stats::StatusCounts;
use crate::upload::Attachment;
use crate::view::home::RecentItem;

/// Which auth request finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    /// Sign-in.
    Login,
    /// Sign-up.
    Register,
    /// Sign-out.
    Logout,
}

/// Why a single record was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Details modal.
    View,
    /// Loading into the edit form.
    Edit,
    /// Admin manage dialog.
    Manage,
}

impl Purpose {
    /// Notice shown when the fetch fails.
    pub fn failure(self) -> &'static str {
        match self {
            Purpose::View => "Failed to load complaint details",
            Purpose::Edit => "Failed to load complaint for editing",
            Purpose::Manage => "Failed to load complaint for management",
        }
    }
}

/// Data of the student home screen.
#[derive(Debug, Clone, Default)]
pub struct HomeData {
    /// Own complaints per status.
    pub counts: StatusCounts,
    /// Newest own complaints.
    pub recent: Vec<RecentItem>,
}

/// Data of the admin stat cards and charts.
#[derive(Debug, Clone, Default)]
pub struct AdminStats {
    /// Counts per status.
    pub counts: StatusCounts,
    /// Counts per category.
    pub by_category: Vec<(Category, usize)>,
}

/// Completion of an application command.
#[derive(Debug)]
pub enum AppMsg {
    /// The identity provider reported a sign-in or sign-out.
    SessionChanged(Option<Session>),
    /// An auth request finished.
    AuthDone {
        /// Which request.
        action: AuthAction,
        /// Outcome.
        result: Result<(), AuthError>,
    },
    /// Home data arrived.
    HomeLoaded {
        /// Fetch token.
        generation: u64,
        /// Outcome.
        result: BackendResult<HomeData>,
    },
    /// "My Complaints" arrived.
    MineLoaded {
        /// Fetch token.
        generation: u64,
        /// Requested page.
        page: usize,
        /// Outcome.
        result: BackendResult<Vec<Complaint>>,
    },
    /// The admin listing arrived.
    AdminLoaded {
        /// Fetch token.
        generation: u64,
        /// Requested page.
        page: usize,
        /// Outcome.
        result: BackendResult<Vec<Complaint>>,
    },
    /// Admin stats arrived.
    StatsLoaded {
        /// Fetch token.
        generation: u64,
        /// Outcome.
        result: BackendResult<AdminStats>,
    },
    /// A single record arrived.
    Fetched {
        /// What it is for.
        purpose: Purpose,
        /// Requested id.
        id: ComplaintId,
        /// Outcome; `Ok(None)` when it no longer exists.
        result: BackendResult<Option<Complaint>>,
    },
    /// An image path was inspected.
    Attached(Result<Attachment, ValidationError>),
    /// The complaint form was stored.
    Saved {
        /// An existing record was updated.
        edited: bool,
        /// Outcome.
        result: Result<Complaint, DeskError>,
    },
    /// A delete finished.
    Deleted(BackendResult<()>),
    /// A status update finished.
    StatusSaved(BackendResult<Complaint>),
}
