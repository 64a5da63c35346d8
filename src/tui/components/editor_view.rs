//! # Editor View Component
//!
//! The editing surface. Holds a working copy of the active buffer's text as
//! lines, edits it in place, and reports every change so core can record it
//! against the buffer it was typed into.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `EditorState` lives in `TuiState`
//! - `EditorView` is created each frame with borrowed state
//!
//! Cursor columns are char indices; screen columns are computed with
//! `unicode-width`, tabs counting as `tab_width` cells.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::core::buffer::{BufferId, Cursor, LiveEdit};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::highlight::{highlight_window, shift_line};

/// What an input event did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Changed,
    CursorMoved,
}

pub struct EditorState {
    buffer: Option<BufferId>,
    lines: Vec<String>,
    cursor: Cursor,
    /// First visible line.
    scroll_top: usize,
    /// Chars hidden to the left of every line.
    scroll_left: usize,
    /// Text rows from the last render (used for paging)
    viewport_height: usize,
    pub language: String,
    pub tab_width: u8,
}

impl EditorState {
    pub fn new(tab_width: u8) -> Self {
        Self {
            buffer: None,
            lines: vec![String::new()],
            cursor: Cursor::default(),
            scroll_top: 0,
            scroll_left: 0,
            viewport_height: 1,
            language: String::new(),
            tab_width,
        }
    }

    /// Replace the surface with a buffer's content. Does not emit a change.
    pub fn install(&mut self, id: BufferId, content: &str, cursor: Cursor, language: &str) {
        self.buffer = Some(id);
        self.lines = content.split('\n').map(str::to_string).collect();
        self.cursor = cursor.clamp_to(content);
        self.language = language.to_string();
        self.scroll_top = self.cursor.line.saturating_sub(self.viewport_height / 2);
        self.scroll_left = 0;
    }

    pub fn buffer(&self) -> Option<BufferId> {
        self.buffer
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Current surface state, tagged with the buffer it shows.
    pub fn live(&self) -> Option<LiveEdit> {
        self.buffer.map(|buffer| LiveEdit {
            buffer,
            content: self.content(),
            cursor: self.cursor,
        })
    }

    fn line(&self) -> &str {
        &self.lines[self.cursor.line]
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines[line].chars().count()
    }

    fn byte_at(&self, column: usize) -> usize {
        let line = self.line();
        line.char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.split_line();
            }
            let at = self.byte_at(self.cursor.column);
            self.lines[self.cursor.line].insert_str(at, part);
            self.cursor.column += part.chars().count();
        }
    }

    fn split_line(&mut self) {
        let at = self.byte_at(self.cursor.column);
        let rest = self.lines[self.cursor.line].split_off(at);
        self.cursor.line += 1;
        self.cursor.column = 0;
        self.lines.insert(self.cursor.line, rest);
    }

    fn backspace(&mut self) -> bool {
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
            let at = self.byte_at(self.cursor.column);
            self.lines[self.cursor.line].remove(at);
            true
        } else if self.cursor.line > 0 {
            let current = self.lines.remove(self.cursor.line);
            self.cursor.line -= 1;
            self.cursor.column = self.line_len(self.cursor.line);
            self.lines[self.cursor.line].push_str(&current);
            true
        } else {
            false
        }
    }

    fn delete(&mut self) -> bool {
        if self.cursor.column < self.line_len(self.cursor.line) {
            let at = self.byte_at(self.cursor.column);
            self.lines[self.cursor.line].remove(at);
            true
        } else if self.cursor.line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor.line + 1);
            self.lines[self.cursor.line].push_str(&next);
            true
        } else {
            false
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let last = self.lines.len() - 1;
        let target = (self.cursor.line as isize + delta).clamp(0, last as isize) as usize;
        self.cursor.line = target;
        self.cursor.column = self.cursor.column.min(self.line_len(target));
    }

    fn move_left(&mut self) {
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.column = self.line_len(self.cursor.line);
        }
    }

    fn move_right(&mut self) {
        if self.cursor.column < self.line_len(self.cursor.line) {
            self.cursor.column += 1;
        } else if self.cursor.line + 1 < self.lines.len() {
            self.cursor.line += 1;
            self.cursor.column = 0;
        }
    }

    fn cell_width(&self, c: char) -> usize {
        if c == '\t' {
            self.tab_width as usize
        } else {
            c.width().unwrap_or(0)
        }
    }

    /// Screen width of the current line between `scroll_left` and the cursor.
    fn cursor_offset(&self) -> usize {
        self.line()
            .chars()
            .skip(self.scroll_left)
            .take(self.cursor.column.saturating_sub(self.scroll_left))
            .map(|c| self.cell_width(c))
            .sum()
    }

    /// Adjust scroll offsets so the cursor is inside a `width` x `height` view.
    fn scroll_to_cursor(&mut self, width: usize, height: usize) {
        self.viewport_height = height.max(1);
        if self.cursor.line < self.scroll_top {
            self.scroll_top = self.cursor.line;
        } else if self.cursor.line >= self.scroll_top + self.viewport_height {
            self.scroll_top = self.cursor.line + 1 - self.viewport_height;
        }

        if self.cursor.column < self.scroll_left {
            self.scroll_left = self.cursor.column;
        }
        while self.scroll_left < self.cursor.column && self.cursor_offset() >= width.max(1) {
            self.scroll_left += 1;
        }
    }
}

impl EventHandler for EditorState {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<EditorEvent> {
        self.buffer?;
        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.insert_str(&c.to_string());
                true
            }
            TuiEvent::Paste(text) => {
                self.insert_str(text);
                true
            }
            TuiEvent::Submit => {
                self.split_line();
                true
            }
            TuiEvent::Indent => {
                self.insert_str(&" ".repeat(self.tab_width as usize));
                true
            }
            TuiEvent::Backspace => self.backspace(),
            TuiEvent::Delete => self.delete(),
            TuiEvent::CursorUp => {
                self.move_vertical(-1);
                return Some(EditorEvent::CursorMoved);
            }
            TuiEvent::CursorDown => {
                self.move_vertical(1);
                return Some(EditorEvent::CursorMoved);
            }
            TuiEvent::PageUp => {
                self.move_vertical(-(self.viewport_height as isize));
                return Some(EditorEvent::CursorMoved);
            }
            TuiEvent::PageDown => {
                self.move_vertical(self.viewport_height as isize);
                return Some(EditorEvent::CursorMoved);
            }
            TuiEvent::CursorLeft => {
                self.move_left();
                return Some(EditorEvent::CursorMoved);
            }
            TuiEvent::CursorRight => {
                self.move_right();
                return Some(EditorEvent::CursorMoved);
            }
            TuiEvent::Home => {
                self.cursor.column = 0;
                return Some(EditorEvent::CursorMoved);
            }
            TuiEvent::End => {
                self.cursor.column = self.line_len(self.cursor.line);
                return Some(EditorEvent::CursorMoved);
            }
            _ => return None,
        };
        changed.then_some(EditorEvent::Changed)
    }
}

/// Transient render wrapper for the editing surface.
pub struct EditorView<'a> {
    state: &'a mut EditorState,
    focused: bool,
}

impl<'a> EditorView<'a> {
    pub fn new(state: &'a mut EditorState, focused: bool) -> Self {
        Self { state, focused }
    }
}

impl Component for EditorView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let state = &mut *self.state;
        let gutter = state.lines.len().to_string().len() as u16 + 1;
        let text_width = area.width.saturating_sub(gutter) as usize;
        let height = area.height as usize;
        state.scroll_to_cursor(text_width, height);

        let tab_width = state.tab_width as usize;
        let highlighted = highlight_window(&state.lines, state.scroll_top, height, &state.language);
        let number_style = Style::default().fg(Color::DarkGray);
        let rows: Vec<Line> = highlighted
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let number = format!("{:>width$} ", state.scroll_top + i + 1, width = gutter as usize - 1);
                let mut spans = vec![Span::styled(number, number_style)];
                spans.extend(shift_line(line, state.scroll_left, tab_width).spans);
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(rows), area);

        if self.focused {
            let x = area.x + gutter + state.cursor_offset() as u16;
            let y = area.y + (state.cursor.line - state.scroll_top) as u16;
            frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn editor(content: &str) -> EditorState {
        let mut state = EditorState::new(4);
        state.install(BufferId::new(1), content, Cursor::default(), "text");
        state
    }

    fn press(state: &mut EditorState, events: &[TuiEvent]) -> Vec<Option<EditorEvent>> {
        events.iter().map(|e| state.handle_event(e)).collect()
    }

    #[test]
    fn test_typing_reports_change() {
        let mut state = editor("");
        let events = press(&mut state, &[TuiEvent::InputChar('h'), TuiEvent::InputChar('é')]);
        assert_eq!(events, vec![Some(EditorEvent::Changed); 2]);
        assert_eq!(state.content(), "hé");
        assert_eq!(state.cursor(), Cursor::new(0, 2));
    }

    #[test]
    fn test_enter_splits_and_backspace_joins() {
        let mut state = editor("abcd");
        press(&mut state, &[TuiEvent::CursorRight, TuiEvent::CursorRight, TuiEvent::Submit]);
        assert_eq!(state.content(), "ab\ncd");
        assert_eq!(state.cursor(), Cursor::new(1, 0));

        press(&mut state, &[TuiEvent::Backspace]);
        assert_eq!(state.content(), "abcd");
        assert_eq!(state.cursor(), Cursor::new(0, 2));
    }

    #[test]
    fn test_backspace_at_start_is_not_a_change() {
        let mut state = editor("x");
        assert_eq!(state.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(state.handle_event(&TuiEvent::Delete), Some(EditorEvent::Changed));
        assert_eq!(state.content(), "");
    }

    #[test]
    fn test_paste_multiline_normalizes_newlines() {
        let mut state = editor("");
        press(&mut state, &[TuiEvent::Paste("one\r\ntwo".into())]);
        assert_eq!(state.content(), "one\ntwo");
        assert_eq!(state.cursor(), Cursor::new(1, 3));
    }

    #[test]
    fn test_vertical_move_clamps_column() {
        let mut state = editor("long line\nab");
        press(&mut state, &[TuiEvent::End]);
        assert_eq!(
            state.handle_event(&TuiEvent::CursorDown),
            Some(EditorEvent::CursorMoved)
        );
        assert_eq!(state.cursor(), Cursor::new(1, 2));
    }

    #[test]
    fn test_indent_inserts_spaces() {
        let mut state = editor("");
        press(&mut state, &[TuiEvent::Indent]);
        assert_eq!(state.content(), "    ");
    }

    #[test]
    fn test_no_buffer_ignores_input() {
        let mut state = EditorState::new(4);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('x')), None);
        assert!(state.live().is_none());
    }

    #[test]
    fn test_live_edit_is_tagged_with_buffer() {
        let mut state = editor("a");
        press(&mut state, &[TuiEvent::End, TuiEvent::InputChar('b')]);
        let live = state.live().unwrap();
        assert_eq!(live.buffer, BufferId::new(1));
        assert_eq!(live.content, "ab");
        assert_eq!(live.cursor, Cursor::new(0, 2));
    }

    #[test]
    fn test_render_shows_line_numbers_and_scrolls_to_cursor() {
        let content = (1..=20).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let mut state = EditorState::new(4);
        state.install(BufferId::new(1), &content, Cursor::new(19, 0), "text");

        let backend = TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| EditorView::new(&mut state, true).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("20 line 20"));
        assert!(!text.contains(" 1 line 1 "));
    }
}
