//! Application key bindings and the per-screen help they feed.

use crate::key::{new_binding, with_help, with_keys_str, Binding, KeyMap};
use crate::listing::ListingKeyMap;
use crate::table::TableKeyMap;

/// Every application-level binding.
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Leave the program.
    pub quit: Binding,
    /// Leave the program when no text field has focus.
    pub quit_plain: Binding,
    /// Toggle the expanded help.
    pub help: Binding,
    /// Focus the next form field.
    pub next_field: Binding,
    /// Focus the previous form field.
    pub prev_field: Binding,
    /// Submit the form.
    pub submit: Binding,
    /// Close the dialog or leave the form.
    pub cancel: Binding,
    /// Next option of a choice field.
    pub choice_next: Binding,
    /// Previous option of a choice field.
    pub choice_prev: Binding,
    /// Switch between login and register.
    pub toggle_register: Binding,
    /// Drop the attached or stored image.
    pub remove_image: Binding,
    /// Navigation entries 1 to 4.
    pub sections: [Binding; 4],
    /// Sign out.
    pub logout: Binding,
    /// Reload the current section.
    pub refresh: Binding,
    /// Open the selected complaint.
    pub view: Binding,
    /// Edit the selected complaint.
    pub edit: Binding,
    /// Delete the selected complaint.
    pub delete: Binding,
    /// Manage the selected complaint.
    pub manage: Binding,
    /// Step the status filter.
    pub filter_status: Binding,
    /// Step the category filter.
    pub filter_category: Binding,
    /// Confirm a dialog.
    pub confirm: Binding,
    /// Decline a dialog.
    pub deny: Binding,
    /// Row selection.
    pub rows: TableKeyMap,
    /// Page selection.
    pub pages: ListingKeyMap,
}

fn binding(keys: &[&str], help_key: &str, desc: &str) -> Binding {
    new_binding(vec![with_keys_str(keys), with_help(help_key, desc)])
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            quit: binding(&["ctrl+c"], "ctrl+c", "quit"),
            quit_plain: binding(&["q"], "q", "quit"),
            help: binding(&["?"], "?", "more keys"),
            next_field: binding(&["tab"], "tab", "next field"),
            prev_field: binding(&["shift+tab"], "shift+tab", "previous field"),
            submit: binding(&["enter", "ctrl+s"], "enter", "submit"),
            cancel: binding(&["esc"], "esc", "back"),
            choice_next: binding(&["right"], "→", "next option"),
            choice_prev: binding(&["left"], "←", "previous option"),
            toggle_register: binding(&["ctrl+r"], "ctrl+r", "register"),
            remove_image: binding(&["ctrl+x"], "ctrl+x", "remove image"),
            sections: [
                binding(&["1"], "1", "home"),
                binding(&["2"], "2", "my complaints"),
                binding(&["3"], "3", "new complaint"),
                binding(&["4"], "4", "admin"),
            ],
            logout: binding(&["o"], "o", "log out"),
            refresh: binding(&["r"], "r", "refresh"),
            view: binding(&["v", "enter"], "v", "view"),
            edit: binding(&["e"], "e", "edit"),
            delete: binding(&["d"], "d", "delete"),
            manage: binding(&["m"], "m", "manage"),
            filter_status: binding(&["s"], "s", "status filter"),
            filter_category: binding(&["c"], "c", "category filter"),
            confirm: binding(&["y"], "y", "yes"),
            deny: binding(&["n", "esc"], "n", "no"),
            rows: TableKeyMap::default(),
            pages: ListingKeyMap::default(),
        }
    }
}

/// What the footer describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Login or register form.
    Auth,
    /// Student home.
    Home,
    /// A complaint table; `admin` adds manage and filters.
    Table {
        /// Admin dashboard rather than "My Complaints".
        admin: bool,
    },
    /// Complaint form.
    Form,
    /// Any open dialog.
    Dialog,
}

/// The bindings relevant to one screen, for the help view.
#[derive(Debug, Clone)]
pub struct ScreenHelp<'a> {
    short: Vec<&'a Binding>,
    full: Vec<Vec<&'a Binding>>,
}

impl KeyMap for ScreenHelp<'_> {
    fn short_help(&self) -> Vec<&Binding> {
        self.short.clone()
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        self.full.clone()
    }
}

impl AppKeyMap {
    /// Bindings shown in the footer of `screen`.
    pub fn help_for(&self, screen: Screen, is_admin: bool) -> ScreenHelp<'_> {
        let nav: Vec<&Binding> = self
            .sections
            .iter()
            .take(if is_admin { 4 } else { 3 })
            .chain([&self.logout, &self.quit_plain])
            .collect();
        match screen {
            Screen::Auth => ScreenHelp {
                short: vec![&self.next_field, &self.submit, &self.toggle_register, &self.quit],
                full: vec![
                    vec![&self.next_field, &self.prev_field, &self.submit],
                    vec![&self.choice_prev, &self.choice_next, &self.toggle_register],
                    vec![&self.cancel, &self.quit],
                ],
            },
            Screen::Home => ScreenHelp {
                short: [nav.clone(), vec![&self.refresh, &self.help]].concat(),
                full: vec![nav, vec![&self.refresh, &self.quit]],
            },
            Screen::Table { admin } => {
                let mut actions = vec![&self.view];
                if admin {
                    actions.extend([&self.manage, &self.filter_status, &self.filter_category]);
                } else {
                    actions.extend([&self.edit, &self.delete]);
                }
                let moves = vec![
                    &self.rows.line_up,
                    &self.rows.line_down,
                    &self.pages.prev_page,
                    &self.pages.next_page,
                    &self.pages.first_page,
                    &self.pages.last_page,
                ];
                ScreenHelp {
                    short: [
                        actions.clone(),
                        vec![&self.pages.prev_page, &self.pages.next_page, &self.help],
                    ]
                    .concat(),
                    full: vec![actions, moves, nav, vec![&self.refresh, &self.quit]],
                }
            }
            Screen::Form => ScreenHelp {
                short: vec![&self.next_field, &self.submit, &self.cancel, &self.help],
                full: vec![
                    vec![&self.next_field, &self.prev_field, &self.submit, &self.cancel],
                    vec![&self.choice_prev, &self.choice_next, &self.remove_image],
                    vec![&self.quit],
                ],
            },
            Screen::Dialog => ScreenHelp {
                short: vec![&self.cancel, &self.quit],
                full: vec![vec![&self.confirm, &self.deny, &self.cancel, &self.quit]],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::help;

    #[test]
    fn admin_entry_only_in_admin_help() {
        let keys = AppKeyMap::default();
        let student = keys.help_for(Screen::Home, false);
        let admin = keys.help_for(Screen::Home, true);
        let h = help::Model::new();
        let s = strip_ansi_escapes::strip_str(h.view(&student));
        let a = strip_ansi_escapes::strip_str(h.view(&admin));
        assert!(!s.contains("4 admin"));
        assert!(a.contains("4 admin"));
    }

    #[test]
    fn student_table_offers_edit_not_manage() {
        let keys = AppKeyMap::default();
        let out = strip_ansi_escapes::strip_str(
            help::Model::new().view(&keys.help_for(Screen::Table { admin: false }, false)),
        );
        assert!(out.contains("e edit"));
        assert!(!out.contains("manage"));
    }
}
