//! A fixed-width table with a selectable row.
//!
//! Cells are plain text; each cell may carry a style applied after the text
//! has been fitted to its column, so styled badges never break the alignment.
//! An empty table renders one row with the configured empty message.

use crate::key::{self, KeyMap as KeyMapTrait};
use crate::text;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// A column header and its width in terminal columns.
#[derive(Debug, Clone)]
pub struct Column {
    /// Header text.
    pub title: String,
    /// Width in terminal columns.
    pub width: usize,
}

impl Column {
    /// Creates a column.
    pub fn new(title: impl Into<String>, width: usize) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

/// One table cell.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Plain text.
    pub text: String,
    /// Style applied to the fitted text.
    pub style: Option<Style>,
}

impl Cell {
    /// An unstyled cell.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// A styled cell.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::plain(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::plain(text)
    }
}

/// A table row.
#[derive(Debug, Clone)]
pub struct Row {
    /// Cells, one per column.
    pub cells: Vec<Cell>,
}

impl Row {
    /// Creates a row.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// Row-selection keys.
#[derive(Debug, Clone)]
pub struct TableKeyMap {
    /// Select the row above.
    pub line_up: key::Binding,
    /// Select the row below.
    pub line_down: key::Binding,
}

impl Default for TableKeyMap {
    fn default() -> Self {
        Self {
            line_up: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "up"),
            ]),
            line_down: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "down"),
            ]),
        }
    }
}

impl KeyMapTrait for TableKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.line_up, &self.line_down]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.line_up, &self.line_down]]
    }
}

/// Table styles.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Header row.
    pub header: Style,
    /// Highlight of the selected row's marker.
    pub selected: Style,
    /// The empty-message row.
    pub empty: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new().bold(true),
            selected: Style::new()
                .foreground(lipgloss::Color::from("#0d6efd"))
                .bold(true),
            empty: Style::new().foreground(lipgloss::Color::from("#6c757d")),
        }
    }
}

/// Table state.
#[derive(Debug, Clone)]
pub struct Model {
    columns: Vec<Column>,
    rows: Vec<Row>,
    selected: usize,
    focus: bool,
    /// Shown when there are no rows.
    pub empty_message: String,
    /// Key bindings.
    pub keymap: TableKeyMap,
    /// Styles.
    pub styles: Styles,
}

impl Model {
    /// A table with the given columns and no rows.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            selected: 0,
            focus: true,
            empty_message: "No rows".to_string(),
            keymap: TableKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Sets the rows.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Sets the empty message.
    pub fn with_empty_message(mut self, msg: impl Into<String>) -> Self {
        self.empty_message = msg.into();
        self
    }

    /// Starts at a given selection.
    pub fn with_selected(mut self, index: usize) -> Self {
        self.set_selected(index);
        self
    }

    /// Replaces the rows, keeping the selection in range.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.set_selected(self.selected);
    }

    /// Rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Index of the selected row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Selects row `index`, clamped to the last row.
    pub fn set_selected(&mut self, index: usize) {
        self.selected = index.min(self.rows.len().saturating_sub(1));
    }

    /// Moves the selection up, stopping at the first row.
    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the selection down, stopping at the last row.
    pub fn move_down(&mut self) {
        self.set_selected(self.selected + 1);
    }

    /// Handles selection keys while focused. Returns whether the selection
    /// changed.
    pub fn update(&mut self, msg: &Msg) -> bool {
        if !self.focus {
            return false;
        }
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };
        let before = self.selected;
        if self.keymap.line_up.matches(key_msg) {
            self.move_up();
        } else if self.keymap.line_down.matches(key_msg) {
            self.move_down();
        }
        before != self.selected
    }

    /// Renders header, rule and rows.
    pub fn view(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        let header = self
            .columns
            .iter()
            .map(|c| text::fit(&c.title, c.width))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!(
            "  {}",
            self.styles.header.clone().inline(true).render(&header)
        ));

        let rule = self
            .columns
            .iter()
            .map(|c| "─".repeat(c.width))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("  {rule}"));

        if self.rows.is_empty() {
            lines.push(format!(
                "  {}",
                self.styles
                    .empty
                    .clone()
                    .inline(true)
                    .render(&self.empty_message)
            ));
            return lines.join("\n");
        }

        for (i, row) in self.rows.iter().enumerate() {
            let marker = if self.focus && i == self.selected {
                format!("{} ", self.styles.selected.clone().inline(true).render(">"))
            } else {
                "  ".to_string()
            };
            let cells = self
                .columns
                .iter()
                .enumerate()
                .map(|(ci, col)| {
                    let cell = row.cells.get(ci);
                    let fitted = text::fit(cell.map_or("", |c| c.text.as_str()), col.width);
                    match cell.and_then(|c| c.style.as_ref()) {
                        Some(style) => style.clone().inline(true).render(&fitted),
                        None => fitted,
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(format!("{marker}{cells}"));
        }
        lines.join("\n")
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn table() -> Model {
        Model::new(vec![Column::new("ID", 4), Column::new("Status", 8)])
            .with_rows(vec![
                Row::new(vec!["a1".into(), "Pending".into()]),
                Row::new(vec!["b2".into(), "Resolved".into()]),
            ])
            .with_empty_message("No complaints found")
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn renders_aligned_rows_with_marker() {
        let out = strip_ansi_escapes::strip_str(table().view());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0].trim_end(), "  ID   Status");
        assert_eq!(lines[2].trim_end(), "> a1   Pending");
        assert_eq!(lines[3].trim_end(), "  b2   Resolved");
    }

    #[test]
    fn empty_table_shows_message() {
        let t = table().with_rows(Vec::new());
        let out = strip_ansi_escapes::strip_str(t.view());
        assert_eq!(out.lines().count(), 3);
        assert!(out.ends_with("No complaints found"));
    }

    #[test]
    fn selection_moves_and_clamps() {
        let mut t = table();
        assert!(t.update(&key(KeyCode::Char('j'))));
        assert_eq!(t.selected(), 1);
        assert!(!t.update(&key(KeyCode::Down)));
        assert!(t.update(&key(KeyCode::Up)));
        assert_eq!(t.selected(), 0);

        t.blur();
        assert!(!t.update(&key(KeyCode::Down)));

        let mut t = table().with_selected(1);
        t.set_rows(vec![Row::new(vec!["c3".into()])]);
        assert_eq!(t.selected(), 0);
    }
}
