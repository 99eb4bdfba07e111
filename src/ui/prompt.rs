//! Prompt state machines for the terminal host.
//!
//! Each prompt consumes key events and eventually settles on an
//! [`Outcome`].  They hold no terminal handle, so every transition can be
//! exercised without a TTY.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::host::{Dialog, DialogReply};

/// Result of feeding one key to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Keep waiting for input.
    Pending,
    Done(T),
    /// The user took the cancel action.
    Cancelled,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

// ───────────────────────────────────────── text field ────────

/// Single-line editable text; the cursor always sits at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Apply an editing key.  Returns `false` when the key is not an edit.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                true
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }
}

// ───────────────────────────────────────── dialog ────────────

/// A modal dialog with a row of buttons and an optional answer field.
#[derive(Debug, Clone)]
pub struct DialogPrompt {
    pub buttons: Vec<String>,
    pub selected: usize,
    cancel_button: Option<String>,
    pub answer: Option<TextField>,
}

impl DialogPrompt {
    pub fn new(dialog: &Dialog) -> Self {
        let buttons = dialog.effective_buttons();
        let selected = dialog
            .effective_default_button()
            .and_then(|d| buttons.iter().position(|b| *b == d))
            .unwrap_or(0);
        Self {
            buttons,
            selected,
            cancel_button: dialog.effective_cancel_button(),
            answer: dialog.default_answer.as_deref().map(TextField::new),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome<DialogReply> {
        if is_interrupt(&key) {
            return Outcome::Cancelled;
        }
        match key.code {
            KeyCode::Left | KeyCode::BackTab => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Tab => {
                if self.selected + 1 < self.buttons.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => return self.press(self.selected),
            KeyCode::Esc => {
                // Esc only works when the dialog has a cancel button.
                if self.cancel_button.is_some() {
                    return Outcome::Cancelled;
                }
            }
            _ => {
                if let Some(field) = self.answer.as_mut() {
                    field.handle_key(&key);
                }
            }
        }
        Outcome::Pending
    }

    fn press(&self, index: usize) -> Outcome<DialogReply> {
        let Some(button) = self.buttons.get(index) else {
            return Outcome::Pending;
        };
        if self.cancel_button.as_ref() == Some(button) {
            return Outcome::Cancelled;
        }
        Outcome::Done(DialogReply {
            button_returned: button.clone(),
            text_returned: self.answer.as_ref().map(|f| f.value.clone()),
        })
    }
}

// ───────────────────────────────────────── list ──────────────

/// Scrollable single-choice list.
#[derive(Debug, Clone, Default)]
pub struct ListPrompt {
    pub items: Vec<String>,
    /// Index of the highlighted item.
    pub selected: usize,
    /// First visible row.
    pub offset: usize,
    /// Rows shown on the last render; drives PageUp/PageDown.
    pub page: usize,
}

impl ListPrompt {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            page: 10,
            ..Self::default()
        }
    }

    pub fn select_next(&mut self, by: usize) {
        let max = self.items.len().saturating_sub(1);
        self.selected = (self.selected + by).min(max);
    }

    pub fn select_prev(&mut self, by: usize) {
        self.selected = self.selected.saturating_sub(by);
    }

    /// Ensure the selected row is visible within a viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        self.page = height;
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }

    /// `Done(None)` is the "nothing chosen" sentinel.
    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome<Option<String>> {
        if is_interrupt(&key) {
            return Outcome::Done(None);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(1),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(1),
            KeyCode::PageUp => self.select_prev(self.page.max(1)),
            KeyCode::PageDown => self.select_next(self.page.max(1)),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.select_next(self.items.len()),
            KeyCode::Enter => return Outcome::Done(self.items.get(self.selected).cloned()),
            KeyCode::Esc | KeyCode::Char('q') => return Outcome::Done(None),
            _ => {}
        }
        Outcome::Pending
    }
}

// ───────────────────────────────────────── folder input ──────

/// Path entry prompt used in place of a graphical folder chooser.
#[derive(Debug, Clone, Default)]
pub struct FolderPrompt {
    pub field: TextField,
    /// Shown under the field after a rejected submission.
    pub error: Option<String>,
}

impl FolderPrompt {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            field: TextField::new(initial),
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome<PathBuf> {
        if is_interrupt(&key) {
            return Outcome::Cancelled;
        }
        match key.code {
            KeyCode::Esc => Outcome::Cancelled,
            KeyCode::Enter => {
                let value = self.field.value.trim();
                if value.is_empty() {
                    self.error = Some("Enter a folder path".to_string());
                    return Outcome::Pending;
                }
                let path = PathBuf::from(value);
                if !path.is_dir() {
                    self.error = Some(format!("Not a folder: {value}"));
                    return Outcome::Pending;
                }
                Outcome::Done(path)
            }
            _ => {
                if self.field.handle_key(&key) {
                    self.error = None;
                }
                Outcome::Pending
            }
        }
    }
}
