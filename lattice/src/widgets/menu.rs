//! Dropdown menu state.
//!
//! Shared by the Actions, Export, and column-visibility dropdowns: a
//! trigger button opens an overlay list; activating an entry reports its
//! index to the caller.

use crossterm::event::{KeyCode, KeyEvent};

/// What a key press did to the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    /// The entry at this index was activated.
    Activated(usize),
    /// The cursor moved or the menu opened.
    Changed,
    /// The menu closed without activating.
    Closed,
    /// The key was not for this widget.
    Ignored,
}

/// Open/cursor state for a dropdown menu.
///
/// The entry list itself is supplied at render/activation time by the
/// owner, so menus whose entries change per render (the column toggles)
/// stay in sync without copying labels around.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    open: bool,
    cursor: usize,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply a key press while the menu has focus. `len` is the current
    /// entry count.
    pub fn handle_key(&mut self, key: &KeyEvent, len: usize) -> MenuEvent {
        if !self.open {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
                    self.open();
                    MenuEvent::Changed
                }
                _ => MenuEvent::Ignored,
            };
        }

        match key.code {
            KeyCode::Esc => {
                self.open = false;
                MenuEvent::Closed
            }
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                MenuEvent::Changed
            }
            KeyCode::Down => {
                if len > 0 {
                    self.cursor = (self.cursor + 1).min(len - 1);
                }
                MenuEvent::Changed
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.cursor < len {
                    MenuEvent::Activated(self.cursor)
                } else {
                    MenuEvent::Ignored
                }
            }
            _ => MenuEvent::Ignored,
        }
    }

    /// Activate the entry under a clicked row, if in range.
    pub fn activate_row(&mut self, row: usize, len: usize) -> MenuEvent {
        if row < len {
            self.cursor = row;
            MenuEvent::Activated(row)
        } else {
            MenuEvent::Ignored
        }
    }
}
