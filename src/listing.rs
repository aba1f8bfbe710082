//! The listing controller: client-side pagination shared by the student and
//! admin complaint tables.
//!
//! The controller is stateless. Every render calls [`paginate`] with the
//! fetched records, the page size and the current page number; the result is
//! the visible slice plus the page count. [`Pagination`] describes the
//! controls to draw for that result, and [`Pagination::select`] turns the
//! activation of a control into a call of the caller's fetch callback with the
//! requested page. Page numbers are 1-based throughout.
//!
//! # Examples
//!
//! ```rust
//! use complaint_desk::listing::{paginate, ControlKind, Pagination};
//!
//! let items: Vec<u32> = (0..12).collect();
//! let (visible, total_pages) = paginate(&items, 5, 2);
//! assert_eq!(visible, &items[5..10]);
//! assert_eq!(total_pages, 3);
//!
//! let pagination = Pagination::new(2, total_pages);
//! let requested = pagination.select(ControlKind::Next, |page| page);
//! assert_eq!(requested, Some(3));
//! ```

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::{KeyMsg, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Splits `items` into pages of `page_size` and returns page `page` (1-based)
/// together with the number of pages.
///
/// A page past the end yields an empty slice; the page number is never
/// clamped. A page size of zero is treated as one.
///
/// ```rust
/// use complaint_desk::listing::paginate;
///
/// let items = ["a", "b", "c"];
/// assert_eq!(paginate(&items, 2, 2), (&items[2..], 2));
/// assert_eq!(paginate(&items, 2, 9), (&items[..0], 2));
/// assert_eq!(paginate::<&str>(&[], 5, 1), (&[][..], 0));
/// ```
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> (&[T], usize) {
    let size = page_size.max(1);
    let total_pages = items.len().div_ceil(size);
    let start = page.saturating_sub(1).saturating_mul(size);
    if page == 0 || start >= items.len() {
        return (&items[..0], total_pages);
    }
    let end = start.saturating_add(size).min(items.len());
    (&items[start..end], total_pages)
}

/// Which control was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// The "previous" control.
    Prev,
    /// A page-number control.
    Number(usize),
    /// The "next" control.
    Next,
}

/// One rendered pagination control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControl {
    /// What activating it requests.
    pub kind: ControlKind,
    /// Text shown on the control.
    pub label: String,
    /// Activation is ignored.
    pub disabled: bool,
    /// Marks the current page.
    pub active: bool,
}

/// The pagination controls for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page, 1-based.
    pub page: usize,
    /// Number of pages.
    pub total_pages: usize,
}

impl Pagination {
    /// Controls for `page` of `total_pages`.
    pub fn new(page: usize, total_pages: usize) -> Self {
        Self { page, total_pages }
    }

    /// Controls for `page` of a listing with `len` records.
    pub fn for_len(len: usize, page_size: usize, page: usize) -> Self {
        Self::new(page, len.div_ceil(page_size.max(1)))
    }

    /// Whether any controls are shown. A single page needs none.
    pub fn has_controls(&self) -> bool {
        self.total_pages > 1
    }

    /// The controls in display order: previous, one per page, next. Empty
    /// when there is at most one page.
    pub fn controls(&self) -> Vec<PageControl> {
        if !self.has_controls() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(self.total_pages + 2);
        out.push(PageControl {
            kind: ControlKind::Prev,
            label: "« Prev".to_string(),
            disabled: self.page == 1,
            active: false,
        });
        for n in 1..=self.total_pages {
            out.push(PageControl {
                kind: ControlKind::Number(n),
                label: n.to_string(),
                disabled: false,
                active: n == self.page,
            });
        }
        out.push(PageControl {
            kind: ControlKind::Next,
            label: "Next »".to_string(),
            disabled: self.page == self.total_pages,
            active: false,
        });
        out
    }

    /// The page a control requests, or `None` when activating it does
    /// nothing: previous on the first page, next on the last, or a number
    /// outside the listing.
    pub fn request(&self, kind: ControlKind) -> Option<usize> {
        if !self.has_controls() {
            return None;
        }
        match kind {
            ControlKind::Prev if self.page > 1 => Some(self.page - 1),
            ControlKind::Next if self.page < self.total_pages => Some(self.page + 1),
            ControlKind::Number(n) if (1..=self.total_pages).contains(&n) => Some(n),
            _ => None,
        }
    }

    /// Activates a control: when it requests a page, `fetch` is called with
    /// that page and its result returned.
    pub fn select<R>(&self, kind: ControlKind, fetch: impl FnOnce(usize) -> R) -> Option<R> {
        self.request(kind).map(fetch)
    }

    /// Maps a key press to a control using `keymap`.
    pub fn control_for_key(&self, keymap: &ListingKeyMap, msg: &KeyMsg) -> Option<ControlKind> {
        if keymap.prev_page.matches(msg) {
            Some(ControlKind::Prev)
        } else if keymap.next_page.matches(msg) {
            Some(ControlKind::Next)
        } else if keymap.first_page.matches(msg) {
            Some(ControlKind::Number(1))
        } else if keymap.last_page.matches(msg) {
            Some(ControlKind::Number(self.total_pages))
        } else {
            None
        }
    }

    /// Handles a runtime message: a key press bound in `keymap` that requests
    /// a page calls `fetch` with it.
    pub fn update<R>(
        &self,
        keymap: &ListingKeyMap,
        msg: &Msg,
        fetch: impl FnOnce(usize) -> R,
    ) -> Option<R> {
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        let kind = self.control_for_key(keymap, key_msg)?;
        self.select(kind, fetch)
    }

    /// Renders the controls on one line; empty when there are none.
    pub fn view(&self, styles: &Styles) -> String {
        self.controls()
            .iter()
            .map(|c| {
                let style = if c.active {
                    &styles.active
                } else if c.disabled {
                    &styles.disabled
                } else {
                    &styles.normal
                };
                style.clone().inline(true).render(&format!(" {} ", c.label))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Colours of the pagination controls.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Enabled, inactive controls.
    pub normal: Style,
    /// The current page.
    pub active: Style,
    /// Disabled previous/next.
    pub disabled: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            normal: Style::new().foreground(lipgloss::Color::from("#0d6efd")),
            active: Style::new()
                .foreground(lipgloss::Color::from("#ffffff"))
                .background(lipgloss::Color::from("#0d6efd"))
                .bold(true),
            disabled: Style::new().foreground(lipgloss::Color::from("#6c757d")),
        }
    }
}

/// Keys that activate pagination controls.
#[derive(Debug, Clone)]
pub struct ListingKeyMap {
    /// Previous page. Default: ←, h, PgUp.
    pub prev_page: key::Binding,
    /// Next page. Default: →, l, PgDn.
    pub next_page: key::Binding,
    /// First page. Default: Home.
    pub first_page: key::Binding,
    /// Last page. Default: End.
    pub last_page: key::Binding,
}

impl Default for ListingKeyMap {
    fn default() -> Self {
        Self {
            prev_page: key::new_binding(vec![
                key::with_keys_str(&["pgup", "left", "h"]),
                key::with_help("←/h", "prev page"),
            ]),
            next_page: key::new_binding(vec![
                key::with_keys_str(&["pgdown", "right", "l"]),
                key::with_help("→/l", "next page"),
            ]),
            first_page: key::new_binding(vec![
                key::with_keys_str(&["home"]),
                key::with_help("home", "first page"),
            ]),
            last_page: key::new_binding(vec![
                key::with_keys_str(&["end"]),
                key::with_help("end", "last page"),
            ]),
        }
    }
}

impl KeyMapTrait for ListingKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev_page, &self.next_page]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![
            &self.prev_page,
            &self.next_page,
            &self.first_page,
            &self.last_page,
        ]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key_msg(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn twelve_items_page_two() {
        let items: Vec<usize> = (0..12).collect();
        let (visible, total) = paginate(&items, 5, 2);
        assert_eq!(visible, &[5, 6, 7, 8, 9]);
        assert_eq!(total, 3);

        let controls = Pagination::new(2, total).controls();
        assert_eq!(controls.len(), 5);
        let active: Vec<_> = controls.iter().filter(|c| c.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, ControlKind::Number(2));
        assert!(!controls[0].disabled);
        assert!(!controls[4].disabled);
    }

    #[test]
    fn last_page_is_partial() {
        let items: Vec<usize> = (0..12).collect();
        assert_eq!(paginate(&items, 5, 3).0, &[10, 11]);
    }

    #[test]
    fn visible_never_exceeds_page_size() {
        for len in 0..30 {
            let items: Vec<usize> = (0..len).collect();
            for size in 0..8 {
                for page in 0..10 {
                    let (visible, total) = paginate(&items, size, page);
                    assert!(visible.len() <= size.max(1));
                    assert_eq!(paginate(&items, size, page), (visible, total));
                    if len <= size.max(1) {
                        assert!(total <= 1);
                        assert!(Pagination::new(page, total).controls().is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn single_page_and_empty_listings_have_no_controls() {
        let one = Pagination::for_len(3, 5, 1);
        assert_eq!(one.total_pages, 1);
        assert!(one.controls().is_empty());
        assert_eq!(one.view(&Styles::default()), "");

        let none = Pagination::for_len(0, 5, 1);
        assert_eq!(none.total_pages, 0);
        assert!(none.controls().is_empty());
    }

    #[test]
    fn out_of_range_page_is_empty_not_clamped() {
        let items = [1, 2, 3];
        let (visible, total) = paginate(&items, 2, 5);
        assert!(visible.is_empty());
        assert_eq!(total, 2);
    }

    #[test]
    fn edge_controls_disable_at_bounds() {
        let first = Pagination::new(1, 3);
        assert!(first.controls()[0].disabled);
        assert_eq!(first.request(ControlKind::Prev), None);
        assert_eq!(first.request(ControlKind::Next), Some(2));

        let last = Pagination::new(3, 3);
        assert!(last.controls()[4].disabled);
        assert_eq!(last.request(ControlKind::Next), None);
        assert_eq!(last.request(ControlKind::Prev), Some(2));
        assert_eq!(last.request(ControlKind::Number(1)), Some(1));
        assert_eq!(last.request(ControlKind::Number(4)), None);
    }

    #[test]
    fn select_invokes_callback_only_for_real_requests() {
        let mut calls = Vec::new();
        let p = Pagination::new(1, 2);
        assert!(p.select(ControlKind::Prev, |n| calls.push(n)).is_none());
        assert!(p.select(ControlKind::Next, |n| calls.push(n)).is_some());
        assert_eq!(calls, vec![2]);
    }

    #[test]
    fn keys_map_to_controls() {
        let keys = ListingKeyMap::default();
        let p = Pagination::new(2, 4);
        assert_eq!(p.update(&keys, &key_msg(KeyCode::Char('l')), |n| n), Some(3));
        assert_eq!(p.update(&keys, &key_msg(KeyCode::PageUp), |n| n), Some(1));
        assert_eq!(p.update(&keys, &key_msg(KeyCode::End), |n| n), Some(4));
        assert_eq!(p.update(&keys, &key_msg(KeyCode::Home), |n| n), Some(1));
        assert_eq!(p.update(&keys, &key_msg(KeyCode::Char('x')), |n| n), None);
    }

    #[test]
    fn view_lists_every_page() {
        let out = strip_ansi_escapes::strip_str(Pagination::new(2, 3).view(&Styles::default()));
        for label in ["« Prev", "1", "2", "3", "Next »"] {
            assert!(out.contains(label), "missing {label} in {out:?}");
        }
        assert!(out.find("« Prev") < out.find("Next »"));
    }
}
