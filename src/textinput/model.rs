//! Text input state, editing and rendering.

use super::keymap::{default_key_map, KeyMap};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// How typed characters are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// As typed.
    #[default]
    Normal,
    /// Each character replaced by the echo character.
    Password,
    /// Nothing shown.
    None,
}

/// A single-line text input.
#[derive(Debug, Clone)]
pub struct Model {
    /// Text in front of the value.
    pub prompt: String,
    /// Prompt style.
    pub prompt_style: Style,
    /// Value style.
    pub text_style: Style,
    /// Shown while the value is empty.
    pub placeholder: String,
    /// Placeholder style.
    pub placeholder_style: Style,
    /// Style of the character under the cursor.
    pub cursor_style: Style,
    /// Maximum number of characters; 0 means unlimited.
    pub char_limit: usize,
    /// Display mode.
    pub echo_mode: EchoMode,
    /// Mask character in password mode.
    pub echo_character: char,
    /// Key bindings.
    pub key_map: KeyMap,

    pub(super) value: Vec<char>,
    pub(super) pos: usize,
    pub(super) focus: bool,
}

/// An empty, unfocused input with a `"> "` prompt.
pub fn new() -> Model {
    Model {
        prompt: "> ".to_string(),
        prompt_style: Style::new(),
        text_style: Style::new(),
        placeholder: String::new(),
        placeholder_style: Style::new().foreground(lipgloss::Color::from("240")),
        cursor_style: Style::new().reverse(true),
        char_limit: 0,
        echo_mode: EchoMode::Normal,
        echo_character: '*',
        key_map: default_key_map(),
        value: Vec::new(),
        pos: 0,
        focus: false,
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// Sets the placeholder.
    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    /// Sets the echo mode.
    pub fn set_echo_mode(&mut self, mode: EchoMode) {
        self.echo_mode = mode;
    }

    /// Sets the character limit and truncates the value to it.
    pub fn set_char_limit(&mut self, limit: usize) {
        self.char_limit = limit;
        let value: String = self.value.iter().collect();
        self.set_value(&value);
    }

    /// Replaces the value and moves the cursor to the end. Newlines and other
    /// control characters are dropped.
    pub fn set_value(&mut self, s: &str) {
        let mut chars: Vec<char> = s.chars().filter(|c| !c.is_control()).collect();
        if self.char_limit > 0 {
            chars.truncate(self.char_limit);
        }
        self.value = chars;
        self.pos = self.value.len();
    }

    /// The current value.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Whether the trimmed value is empty.
    pub fn is_blank(&self) -> bool {
        self.value.iter().all(|c| c.is_whitespace())
    }

    /// Cursor position in characters.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor, clamped to the value.
    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos.min(self.value.len());
    }

    /// Clears the value.
    pub fn reset(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    /// Handles an editing key while focused. Returns whether the value or
    /// cursor changed.
    pub fn update(&mut self, msg: &Msg) -> bool {
        if !self.focus {
            return false;
        }
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };
        let before = (self.value.len(), self.pos);
        let km = self.key_map.clone();

        if km.delete_word_backward.matches(key_msg) {
            self.delete_word_backward();
        } else if km.delete_character_backward.matches(key_msg) {
            if self.pos > 0 {
                self.pos -= 1;
                self.value.remove(self.pos);
            }
        } else if km.delete_character_forward.matches(key_msg) {
            if self.pos < self.value.len() {
                self.value.remove(self.pos);
            }
        } else if km.delete_after_cursor.matches(key_msg) {
            self.value.truncate(self.pos);
        } else if km.delete_before_cursor.matches(key_msg) {
            self.value.drain(..self.pos);
            self.pos = 0;
        } else if km.character_backward.matches(key_msg) {
            self.pos = self.pos.saturating_sub(1);
        } else if km.character_forward.matches(key_msg) {
            self.set_cursor(self.pos + 1);
        } else if km.line_start.matches(key_msg) {
            self.pos = 0;
        } else if km.line_end.matches(key_msg) {
            self.pos = self.value.len();
        } else if let KeyCode::Char(ch) = key_msg.key {
            if key_msg.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                return false;
            }
            self.insert(ch);
            return true;
        }
        before != (self.value.len(), self.pos)
    }

    fn insert(&mut self, ch: char) {
        if ch.is_control() || (self.char_limit > 0 && self.value.len() >= self.char_limit) {
            return;
        }
        self.value.insert(self.pos, ch);
        self.pos += 1;
    }

    fn delete_word_backward(&mut self) {
        let mut start = self.pos;
        while start > 0 && self.value[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.value[start - 1].is_whitespace() {
            start -= 1;
        }
        self.value.drain(start..self.pos);
        self.pos = start;
    }

    fn echo(&self, chars: &[char]) -> String {
        match self.echo_mode {
            EchoMode::Normal => chars.iter().collect(),
            EchoMode::Password => std::iter::repeat(self.echo_character)
                .take(chars.len())
                .collect(),
            EchoMode::None => String::new(),
        }
    }

    /// Renders prompt, value and, while focused, the cursor.
    pub fn view(&self) -> String {
        let prompt = self.prompt_style.clone().inline(true).render(&self.prompt);

        if self.value.is_empty() && !self.placeholder.is_empty() {
            let mut chars = self.placeholder.chars();
            let body = if self.focus {
                let first = chars.next().map(String::from).unwrap_or_default();
                let rest: String = chars.collect();
                format!(
                    "{}{}",
                    self.cursor_style.clone().inline(true).render(&first),
                    self.placeholder_style.clone().inline(true).render(&rest)
                )
            } else {
                self.placeholder_style
                    .clone()
                    .inline(true)
                    .render(&self.placeholder)
            };
            return format!("{prompt}{body}");
        }

        let text = |s: &str| {
            if s.is_empty() {
                String::new()
            } else {
                self.text_style.clone().inline(true).render(s)
            }
        };
        let before = self.echo(&self.value[..self.pos]);
        if !self.focus || self.echo_mode == EchoMode::None {
            let after = self.echo(&self.value[self.pos..]);
            return format!("{prompt}{}{}", text(&before), text(&after));
        }

        let under = self
            .value
            .get(self.pos)
            .map(|c| self.echo(std::slice::from_ref(c)))
            .unwrap_or_else(|| " ".to_string());
        let after = if self.pos < self.value.len() {
            self.echo(&self.value[self.pos + 1..])
        } else {
            String::new()
        };
        format!(
            "{prompt}{}{}{}",
            text(&before),
            self.cursor_style.clone().inline(true).render(&under),
            text(&after)
        )
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
