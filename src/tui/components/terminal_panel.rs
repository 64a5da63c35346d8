//! # Terminal Panel Component
//!
//! Bottom panel for the embedded command runner: a header with the working
//! directory, the scrollable output log, and a one-line command input.
//!
//! ```text
//! ┌ Terminal: /home/me/proj ───────────────┐
//! │$ cargo test                            │
//! │running 12 tests                        │
//! │[exit code 101]                         │
//! │$ █                                     │
//! └────────────────────────────────────────┘
//! ```
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `TerminalPanelState` (input line, scroll position) lives in `TuiState`
//! - `TerminalPanel` borrows it plus the core `CommandRunner` each frame
//!
//! The output log auto-scrolls while pinned to the bottom; PageUp unpins,
//! scrolling back to the end re-pins.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::core::runner::{CommandRunner, OutputKind};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PROMPT: &str = "$ ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Submit(String),
    HistoryPrev,
    HistoryNext,
    /// Esc: hand focus back to the editor.
    Unfocus,
}

pub struct TerminalPanelState {
    pub input: String,
    /// Cursor as a char index into `input`.
    cursor: usize,
    pub scroll_state: ScrollViewState,
    pub stick_to_bottom: bool,
    viewport_height: u16,
    content_height: u16,
}

impl Default for TerminalPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPanelState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            content_height: 0,
        }
    }

    /// Replace the input line (history recall).
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor = self.input.chars().count();
    }

    fn byte_at(&self, column: usize) -> usize {
        self.input
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn repin_if_at_bottom(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
        }
    }
}

impl EventHandler for TerminalPanelState {
    type Event = TerminalEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<TerminalEvent> {
        match event {
            TuiEvent::Submit => {
                self.cursor = 0;
                self.stick_to_bottom = true;
                return Some(TerminalEvent::Submit(std::mem::take(&mut self.input)));
            }
            TuiEvent::Escape => return Some(TerminalEvent::Unfocus),
            TuiEvent::CursorUp => return Some(TerminalEvent::HistoryPrev),
            TuiEvent::CursorDown => return Some(TerminalEvent::HistoryNext),
            TuiEvent::InputChar(c) => {
                let at = self.byte_at(self.cursor);
                self.input.insert(at, *c);
                self.cursor += 1;
            }
            TuiEvent::Paste(text) => {
                // A pasted newline would submit; keep the line single
                let clean: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
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
            TuiEvent::PageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::PageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

fn output_style(kind: OutputKind) -> Style {
    match kind {
        OutputKind::Command => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        OutputKind::Stdout => Style::default(),
        OutputKind::Stderr => Style::default().fg(Color::LightRed),
        OutputKind::Info => Style::default().fg(Color::Green),
        OutputKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        OutputKind::Status => Style::default().fg(Color::Yellow),
    }
}

/// Transient render wrapper for the terminal panel.
pub struct TerminalPanel<'a> {
    state: &'a mut TerminalPanelState,
    runner: &'a CommandRunner,
    focused: bool,
}

impl<'a> TerminalPanel<'a> {
    pub fn new(state: &'a mut TerminalPanelState, runner: &'a CommandRunner, focused: bool) -> Self {
        Self {
            state,
            runner,
            focused,
        }
    }
}

impl Component for TerminalPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" Terminal: {} ", self.runner.cwd().display()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [output_area, input_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

        // Output log
        let output = self.runner.output();
        let content_width = output_area.width.saturating_sub(1);
        let content_height = output.len().min(u16::MAX as usize) as u16;
        self.state.viewport_height = output_area.height;
        self.state.content_height = content_height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        let lines: Vec<Line> = output
            .iter()
            .map(|l| Line::styled(l.text.as_str(), output_style(l.kind)))
            .collect();
        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, content_height),
        );
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }
        frame.render_stateful_widget(scroll_view, output_area, &mut self.state.scroll_state);

        // Input line
        if self.runner.is_running() {
            let waiting = Span::styled(
                "running… (output streams above)",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(Paragraph::new(Line::from(waiting)), input_area);
            return;
        }
        let prompt = Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(Color::Cyan)),
            Span::raw(self.state.input.as_str()),
        ]);
        frame.render_widget(Paragraph::new(prompt), input_area);

        if self.focused {
            let before: String = self.state.input.chars().take(self.state.cursor).collect();
            let x = input_area.x + (PROMPT.len() + before.width()) as u16;
            frame.set_cursor_position(Position::new(
                x.min(input_area.right().saturating_sub(1)),
                input_area.y,
            ));
        }
    }
}
