//! Single-line text input used by every form field.
//!
//! ```rust
//! use complaint_desk::textinput::{new, EchoMode};
//! use complaint_desk::Component;
//!
//! let mut password = new();
//! password.set_placeholder("Password");
//! password.set_echo_mode(EchoMode::Password);
//! password.focus();
//! password.set_value("hunter2");
//! assert_eq!(password.value(), "hunter2");
//! assert!(!password.view().contains("hunter2"));
//! ```

pub mod keymap;
pub mod model;


pub use keymap::{default_key_map, KeyMap};
pub use model::{new, EchoMode, Model};
