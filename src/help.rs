//! The key-help footer.
//!
//! Renders the bindings of the active screen either as one line
//! (`←/h prev page • →/l next page`) or, with `show_all`, as aligned columns.
//! Disabled bindings are skipped, and content wider than `width` ends in an
//! ellipsis.

use crate::key::{self, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles of the help view.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Trailing ellipsis when content is cut.
    pub ellipsis: Style,
    /// Key labels.
    pub key: Style,
    /// Descriptions.
    pub desc: Style,
    /// Separators between items and columns.
    pub separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            key: key_style,
            desc: desc_style,
            separator: sep_style,
        }
    }
}

/// Help view state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Render the full multi-column help instead of one line.
    pub show_all: bool,
    /// Maximum width; 0 means unlimited.
    pub width: usize,
    /// Separator between short-help items.
    pub short_separator: String,
    /// Separator between full-help columns.
    pub full_separator: String,
    /// Marker appended when content is cut.
    pub ellipsis: String,
    /// Styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// A help view with default styles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders `keymap` in the current mode.
    pub fn view<K: KeyMap + ?Sized>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    /// One line of `key desc` items.
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.short_separator);

        let mut out = String::new();
        let mut total_width = 0;
        for kb in bindings.iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };
            let item = format!("{}{}", sep, self.render_item(kb));
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.cut(total_width, item_width) {
                out.push_str(&tail);
                break;
            }
            total_width += item_width;
            out.push_str(&item);
        }
        out
    }

    /// Columns of `key desc` rows, one column per group.
    pub fn full_help_view(&self, groups: Vec<Vec<&key::Binding>>) -> String {
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.full_separator);
        let sep_width = lipgloss::width_visible(&separator);

        let mut columns: Vec<String> = Vec::new();
        let mut total_width = 0;
        for group in groups.iter().filter(|g| should_render_column(g)) {
            let col = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| self.render_item(b))
                .collect::<Vec<_>>()
                .join("\n");
            let gap = if columns.is_empty() { 0 } else { sep_width };
            let col_width = lipgloss::width_visible(&col) + gap;

            if let Some(tail) = self.cut(total_width, col_width) {
                if !tail.is_empty() {
                    columns.push(tail);
                }
                break;
            }
            total_width += col_width;
            columns.push(col);
        }

        let mut parts: Vec<&str> = Vec::new();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                parts.push(separator.as_str());
            }
            parts.push(col.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    fn render_item(&self, binding: &key::Binding) -> String {
        let help = binding.help();
        format!(
            "{} {}",
            self.styles.key.clone().inline(true).render(&help.key),
            self.styles.desc.clone().inline(true).render(&help.desc)
        )
    }

    // Some(tail) when the item does not fit; the tail is empty when even the
    // ellipsis would overflow.
    fn cut(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles
                .ellipsis
                .clone()
                .inline(true)
                .render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}

/// Whether a column has at least one enabled binding.
pub fn should_render_column(bindings: &[&key::Binding]) -> bool {
    bindings.iter().any(|b| b.enabled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{new_binding, with_disabled, with_help, with_keys_str, Binding};

    struct Keys {
        prev: Binding,
        next: Binding,
        hidden: Binding,
    }

    impl KeyMap for Keys {
        fn short_help(&self) -> Vec<&Binding> {
            vec![&self.prev, &self.hidden, &self.next]
        }

        fn full_help(&self) -> Vec<Vec<&Binding>> {
            vec![vec![&self.prev, &self.next], vec![&self.hidden]]
        }
    }

    fn keys() -> Keys {
        Keys {
            prev: new_binding(vec![with_keys_str(&["left"]), with_help("←", "prev")]),
            next: new_binding(vec![with_keys_str(&["right"]), with_help("→", "next")]),
            hidden: new_binding(vec![
                with_keys_str(&["x"]),
                with_help("x", "hidden"),
                with_disabled(),
            ]),
        }
    }

    #[test]
    fn short_help_skips_disabled_bindings() {
        let out = strip_ansi_escapes::strip_str(&Model::new().view(&keys()));
        assert_eq!(out, "← prev • → next");
    }

    #[test]
    fn short_help_truncates_to_width() {
        let out = strip_ansi_escapes::strip_str(&Model::new().with_width(10).view(&keys()));
        assert_eq!(out, "← prev …");
    }

    #[test]
    fn full_help_drops_empty_columns() {
        let mut help = Model::new();
        help.show_all = true;
        let out = strip_ansi_escapes::strip_str(&help.view(&keys()));
        assert!(out.contains("← prev"));
        assert!(out.contains("→ next"));
        assert!(!out.contains("hidden"));
    }
}
