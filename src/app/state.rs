//! Everything the screen shows, held in one place.

use super::forms::{AuthForms, ComplaintForm, ManageForm};
use crate::domain::{Category, Complaint, ComplaintFilter, Session};
use crate::stats::StatusCounts;
use crate::view::home::RecentItem;
use crate::view::Section;

/// A fetch counter. Every request takes a new generation; a response is
/// applied only if it carries the latest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation {
    latest: u64,
    in_flight: bool,
}

impl Generation {
    /// Starts a request and returns its token.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight = true;
        self.latest
    }

    /// Whether a response with `token` should be applied. Accepting the
    /// latest token ends the in-flight state.
    pub fn accept(&mut self, token: u64) -> bool {
        if token == self.latest {
            self.in_flight = false;
            true
        } else {
            tracing::warn!(token, latest = self.latest, "dropping stale response");
            false
        }
    }

    /// Whether the latest request is still outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Invalidates every outstanding request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.in_flight = false;
    }
}

/// One paginated complaint listing.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Records from the last accepted fetch.
    pub items: Vec<Complaint>,
    /// Current page, 1-based.
    pub page: usize,
    /// Selected row on the page.
    pub selected: usize,
    /// Fetch tokens.
    pub generation: Generation,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            selected: 0,
            generation: Generation::default(),
        }
    }
}

impl Listing {
    /// Records on the current page.
    pub fn visible(&self, page_size: usize) -> &[Complaint] {
        crate::listing::paginate(&self.items, page_size, self.page).0
    }

    /// The selected record on the current page.
    pub fn selected_item(&self, page_size: usize) -> Option<&Complaint> {
        self.visible(page_size).get(self.selected)
    }

    /// Applies a fetch result for `page`.
    pub fn apply(&mut self, page: usize, items: Vec<Complaint>, page_size: usize) {
        self.items = items;
        self.page = page;
        let visible = self.visible(page_size).len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    /// Moves the selection, staying on the page.
    pub fn select_offset(&mut self, delta: isize, page_size: usize) {
        let visible = self.visible(page_size).len();
        if visible == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected.saturating_add_signed(delta);
        self.selected = next.min(visible - 1);
    }
}

/// Home screen data.
#[derive(Debug, Clone, Default)]
pub struct Home {
    /// Own complaints per status.
    pub counts: StatusCounts,
    /// Newest own complaints.
    pub recent: Vec<RecentItem>,
    /// Fetch tokens.
    pub generation: Generation,
}

/// Admin dashboard data.
#[derive(Debug, Clone, Default)]
pub struct Admin {
    /// The filtered listing.
    pub listing: Listing,
    /// Active filters.
    pub filter: ComplaintFilter,
    /// Counts per status over every complaint.
    pub counts: StatusCounts,
    /// Counts per category over every complaint.
    pub by_category: Vec<(Category, usize)>,
    /// Stats fetch tokens.
    pub stats_generation: Generation,
}

/// A dialog over the current section.
#[derive(Debug, Clone, Default)]
pub enum Modal {
    /// Nothing open.
    #[default]
    None,
    /// Read-only details.
    Detail(Complaint),
    /// Admin status change.
    Manage(ManageForm),
    /// Delete confirmation.
    ConfirmDelete(Complaint),
}

impl Modal {
    /// Whether a dialog is open.
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }
}

/// The whole view state.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Signed-in account.
    pub session: Option<Session>,
    /// Visible section while signed in.
    pub section: Section,
    /// Login and register forms.
    pub auth: AuthForms,
    /// Student home.
    pub home: Home,
    /// "My Complaints".
    pub mine: Listing,
    /// Admin dashboard.
    pub admin: Admin,
    /// New/edit complaint form.
    pub form: ComplaintForm,
    /// Open dialog.
    pub modal: Modal,
    /// Terminal width.
    pub width: usize,
    /// Expanded key help.
    pub show_help: bool,
}

impl ViewState {
    /// Whether the signed-in account is an administrator.
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Forgets everything tied to the previous account and drops the
    /// responses still in flight for it.
    pub fn clear_account_data(&mut self) {
        self.home = Home {
            generation: self.home.generation,
            ..Home::default()
        };
        self.home.generation.invalidate();

        self.mine = Listing {
            generation: self.mine.generation,
            ..Listing::default()
        };
        self.mine.generation.invalidate();

        self.admin = Admin {
            listing: Listing {
                generation: self.admin.listing.generation,
                ..Listing::default()
            },
            stats_generation: self.admin.stats_generation,
            ..Admin::default()
        };
        self.admin.listing.generation.invalidate();
        self.admin.stats_generation.invalidate();

        self.form = ComplaintForm::default();
        self.modal = Modal::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_generation_is_accepted() {
        let mut g = Generation::default();
        let first = g.begin();
        let second = g.begin();
        assert!(g.in_flight());
        assert!(!g.accept(first));
        assert!(g.in_flight());
        assert!(g.accept(second));
        assert!(!g.in_flight());

        let third = g.begin();
        g.invalidate();
        assert!(!g.accept(third));
    }

    #[test]
    fn selection_stays_on_page() {
        let mut l = Listing::default();
        l.select_offset(1, 5);
        assert_eq!(l.selected, 0);
        l.selected = 4;
        l.apply(1, Vec::new(), 5);
        assert_eq!(l.selected, 0);
        assert!(l.selected_item(5).is_none());
    }
}
