//! Single-line text input state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::utils::truncate_to_width;

/// What a key press did to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The text changed.
    Changed,
    /// Enter was pressed; carries the current text.
    Submitted(String),
    /// The key was not an editing key.
    Ignored,
}

/// Text content and cursor state for a single-line input.
///
/// The cursor is a byte offset into the text, always on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct Input {
    text: String,
    cursor: usize,
    placeholder: String,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text, placing the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    /// Clear the text.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, key: &KeyEvent) -> InputEvent {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('u') => {
                    if self.text.is_empty() {
                        InputEvent::Ignored
                    } else {
                        self.clear();
                        InputEvent::Changed
                    }
                }
                _ => InputEvent::Ignored,
            };
        }

        match key.code {
            KeyCode::Char(c) => {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                InputEvent::Changed
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputEvent::Ignored;
                }
                let start = self.prev_boundary();
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
                InputEvent::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.text.len() {
                    return InputEvent::Ignored;
                }
                let end = self.next_boundary();
                self.text.replace_range(self.cursor..end, "");
                InputEvent::Changed
            }
            KeyCode::Left => {
                self.cursor = self.prev_boundary();
                InputEvent::Ignored
            }
            KeyCode::Right => {
                self.cursor = self.next_boundary();
                InputEvent::Ignored
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputEvent::Ignored
            }
            KeyCode::End => {
                self.cursor = self.text.len();
                InputEvent::Ignored
            }
            KeyCode::Enter => InputEvent::Submitted(self.text.clone()),
            _ => InputEvent::Ignored,
        }
    }

    /// Render the value (or placeholder) into a line of at most `width`
    /// display columns, with a cursor block when focused.
    pub fn line(&self, width: u16, focused: bool) -> Line<'static> {
        let width = width as usize;
        if self.text.is_empty() && !focused {
            let placeholder = truncate_to_width(&self.placeholder, width);
            return Line::from(Span::styled(
                placeholder,
                Style::default().add_modifier(Modifier::DIM),
            ));
        }

        if !focused {
            return Line::from(truncate_to_width(&self.text, width));
        }

        // Keep the cursor visible: show the tail when the text overflows.
        let before = &self.text[..self.cursor];
        let after = &self.text[self.cursor..];
        let mut shown_before = before.to_string();
        while shown_before.width() + 1 > width && !shown_before.is_empty() {
            let mut chars = shown_before.chars();
            chars.next();
            shown_before = chars.collect();
        }
        let cursor_char = after.chars().next().map(String::from).unwrap_or_else(|| " ".into());
        let rest: String = after.chars().skip(1).collect();
        let remaining = width.saturating_sub(shown_before.width() + cursor_char.width());

        Line::from(vec![
            Span::raw(shown_before),
            Span::styled(cursor_char, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(truncate_to_width(&rest, remaining)),
        ])
    }
}
