#![warn(missing_docs)]

//! # complaint-desk
//!
//! A terminal complaint desk built on [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//! Students file complaints about campus services, optionally with an image,
//! and follow their status; administrators triage them from a dashboard with
//! filters, counts and charts.
//!
//! ## Overview
//!
//! The crate is split the way the screen is:
//!
//! - [`app`] holds the bubbletea model: one [`app::state::ViewState`],
//!   key routing and the commands that talk to the backend.
//! - [`view`] turns typed view-models into strings. Views never read
//!   application state directly.
//! - [`listing`] is the listing controller shared by both complaint tables:
//!   client-side pagination with a fetch callback per page change.
//! - [`backend`] defines the identity, complaint and blob collaborators and
//!   ships an in-memory and a file-backed implementation.
//! - [`textinput`], [`table`], [`help`], [`key`] and [`notify`] are the
//!   widgets the views are made of.
//!
//! ## Focus Management
//!
//! Widgets that take keyboard input implement [`Component`]:
//!
//! ```rust
//! use complaint_desk::prelude::*;
//!
//! fn toggle<T: Component>(c: &mut T) {
//!     let _ = c.focus();
//!     assert!(c.focused());
//!     c.blur();
//!     assert!(!c.focused());
//! }
//!
//! let mut input = textinput_new();
//! toggle(&mut input);
//! ```
//!
//! ## Pagination
//!
//! ```rust
//! use complaint_desk::listing::paginate;
//!
//! let items: Vec<u32> = (1..=12).collect();
//! let (page, total) = paginate(&items, 5, 3);
//! assert_eq!(page, &[11, 12]);
//! assert_eq!(total, 3);
//! ```

pub mod app;
pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod help;
pub mod key;
pub mod listing;
pub mod logging;
pub mod notify;
pub mod stats;
pub mod table;
pub mod text;
pub mod textinput;
pub mod upload;
pub mod view;

use bubbletea_rs::Cmd;

/// Focus handling shared by the input widgets.
///
/// A focused component receives key presses; a blurred one ignores them and
/// renders in its inactive style. Forms keep exactly one component focused
/// and move focus with tab and shift+tab.
///
/// ```rust
/// use complaint_desk::prelude::*;
///
/// let mut input = textinput_new();
/// assert!(!input.focused());
/// input.focus();
/// assert!(input.focused());
/// input.blur();
/// assert!(!input.focused());
/// ```
pub trait Component {
    /// Gives the component keyboard focus. May return a command to run
    /// alongside, e.g. a redraw.
    fn focus(&mut self) -> Option<Cmd>;

    /// Takes keyboard focus away.
    fn blur(&mut self);

    /// Whether the component has keyboard focus.
    fn focused(&self) -> bool;
}

pub use app::{App, AppContext};
pub use error::{DeskError, Result};
pub use help::Model as HelpModel;
pub use key::{matches, new_binding, with_help, with_keys_str, Binding, KeyMap, KeyPress};
pub use table::Model as Table;
pub use textinput::{new as textinput_new, EchoMode, Model as TextInput};

/// Common imports for building screens out of the crate's widgets.
///
/// ```rust
/// use complaint_desk::prelude::*;
///
/// let (visible, pages) = paginate(&[1, 2, 3], 2, 1);
/// assert_eq!(visible, &[1, 2]);
/// assert_eq!(Pagination::new(1, pages).controls().len(), 4);
/// ```
pub mod prelude {
    pub use crate::help::Model as HelpModel;
    pub use crate::key::{
        matches, new_binding, with_help, with_keys_str, Binding, KeyMap, KeyPress,
    };
    pub use crate::listing::{paginate, ControlKind, PageControl, Pagination};
    pub use crate::notify::{Level, Toaster};
    pub use crate::table::{Cell, Column, Model as Table, Row};
    pub use crate::textinput::{new as textinput_new, EchoMode, Model as TextInput};
    pub use crate::Component;
}
