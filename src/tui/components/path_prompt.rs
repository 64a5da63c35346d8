//! # Path Prompt Component
//!
//! Single-line overlay asking for a file path, used by Open (Ctrl+O) and by
//! Save As for untitled buffers. Relative input is resolved against the
//! terminal's working directory; `~/` expands to the home directory.

use std::path::{Path, PathBuf};

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::core::buffer::BufferId;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::confirm_dialog::centered_rect;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    Open,
    SaveAs(BufferId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Submit(PathBuf),
    Dismiss,
}

pub struct PathPromptState {
    pub purpose: PromptPurpose,
    pub input: String,
    /// Cursor as a char index into `input`.
    cursor: usize,
    base_dir: PathBuf,
}

impl PathPromptState {
    pub fn new(purpose: PromptPurpose, base_dir: &Path) -> Self {
        Self {
            purpose,
            input: String::new(),
            cursor: 0,
            base_dir: base_dir.to_path_buf(),
        }
    }

    fn byte_at(&self, column: usize) -> usize {
        self.input
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn resolve(&self) -> Option<PathBuf> {
        let raw = self.input.trim();
        if raw.is_empty() {
            return None;
        }
        let path = match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()?.join(rest),
            None => PathBuf::from(raw),
        };
        Some(if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        })
    }
}

impl EventHandler for PathPromptState {
    type Event = PromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PromptEvent> {
        match event {
            TuiEvent::Escape => return Some(PromptEvent::Dismiss),
            TuiEvent::Submit => return self.resolve().map(PromptEvent::Submit),
            TuiEvent::InputChar(c) => {
                let at = self.byte_at(self.cursor);
                self.input.insert(at, *c);
                self.cursor += 1;
            }
            TuiEvent::Paste(text) => {
                let clean: String = text.chars().filter(|c| !c.is_control()).collect();
                let at = self.byte_at(self.cursor);
                self.input.insert_str(at, &clean);
                self.cursor += clean.chars().count();
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_at(self.cursor);
                self.input.remove(at);
            }
            TuiEvent::Delete if self.cursor < self.input.chars().count() => {
                let at = self.byte_at(self.cursor);
                self.input.remove(at);
            }
            TuiEvent::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            TuiEvent::CursorRight => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
            }
            TuiEvent::Home => self.cursor = 0,
            TuiEvent::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the path prompt overlay.
pub struct PathPrompt<'a> {
    state: &'a PathPromptState,
}

impl<'a> PathPrompt<'a> {
    pub fn new(state: &'a PathPromptState) -> Self {
        Self { state }
    }
}

impl Component for PathPrompt<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut overlay = centered_rect(70, 20, area);
        overlay.height = area.height.min(3);
        overlay.y = area.y + area.height.saturating_sub(overlay.height) / 2;
        frame.render_widget(Clear, overlay);

        let title = match self.state.purpose {
            PromptPurpose::Open => " Open file ",
            PromptPurpose::SaveAs(_) => " Save as ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .title_bottom(format!(" in {} ", self.state.base_dir.display()));

        let inner_width = overlay.width.saturating_sub(2) as usize;
        let before: usize = self
            .state
            .input
            .chars()
            .take(self.state.cursor)
            .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(0))
            .sum();
        // Keep the cursor in view on long paths
        let skip = (before + 1).saturating_sub(inner_width);
        let visible: String = self.state.input.chars().skip(skip).collect();

        frame.render_widget(Paragraph::new(visible).block(block), overlay);
        let x = overlay.x + 1 + before.saturating_sub(skip) as u16;
        frame.set_cursor_position(Position::new(x, overlay.y + 1));
    }
}
