//! # StatusBar Component
//!
//! Bottom line: which file is active, where the cursor is, what language it
//! is highlighted as, and the latest status message.
//!
//! ```text
//!  ~/proj/main.rs ●  Ln 12, Col 5  Rust │ Saved main.rs
//! ```
//!
//! Stateless; props are copied out of the core App and editor state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::buffer::{Buffer, Cursor};
use crate::core::language;
use crate::tui::component::Component;
use crate::tui::components::tab_bar::MODIFIED_MARKER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBar {
    /// Full path, or the buffer name when untitled.
    pub location: String,
    pub dirty: bool,
    pub cursor: Cursor,
    pub language: String,
    pub message: String,
}

impl StatusBar {
    pub fn new(buffer: Option<&Buffer>, cursor: Cursor, message: &str) -> Self {
        let (location, dirty, language) = match buffer {
            Some(b) => (
                b.path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| b.name().to_string()),
                b.is_dirty(),
                language::display_name(b.language()),
            ),
            None => (String::new(), false, String::new()),
        };
        Self {
            location,
            dirty,
            cursor,
            language,
            message: message.to_string(),
        }
    }

    fn position(&self) -> String {
        format!("Ln {}, Col {}", self.cursor.line + 1, self.cursor.column + 1)
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let base = Style::default().bg(Color::DarkGray).fg(Color::White);
        let mut left = vec![Span::styled(
            format!(" {}", self.location),
            base.add_modifier(Modifier::BOLD),
        )];
        if self.dirty {
            left.push(Span::styled(
                format!(" {MODIFIED_MARKER}"),
                base.fg(Color::Yellow),
            ));
        }
        left.push(Span::styled(format!("  {}  ", self.position()), base));
        left.push(Span::styled(self.language.clone(), base.fg(Color::Cyan)));

        let left = Line::from(left);
        let [left_area, right_area] = Layout::horizontal([
            Constraint::Length(left.width() as u16 + 1),
            Constraint::Min(0),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(left).style(base), left_area);
        let message = Line::from(Span::raw(format!("│ {} ", self.message))).right_aligned();
        frame.render_widget(Paragraph::new(message).style(base), right_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::LanguageTable;
    use crate::core::store::BufferStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn render_text(bar: &mut StatusBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_untitled_buffer_shows_name() {
        let store = BufferStore::new(Arc::new(LanguageTable::default()));
        let bar = StatusBar::new(store.active(), Cursor::new(0, 0), "Welcome to Scribe!");
        assert_eq!(bar.location, "Untitled");
        assert_eq!(bar.language, "Plain Text");
        assert!(!bar.dirty);
    }

    #[test]
    fn test_file_buffer_shows_path_and_language() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tool.py");
        fs::write(&path, "").unwrap();
        let mut store = BufferStore::new(Arc::new(LanguageTable::default()));
        let id = store.create(Some(&path)).unwrap();

        let bar = StatusBar::new(store.get(id), Cursor::default(), "");
        assert!(bar.location.ends_with("tool.py"));
        assert_eq!(bar.language, "Python");
    }

    #[test]
    fn test_render_is_one_based() {
        let mut bar = StatusBar {
            location: "main.rs".into(),
            dirty: true,
            cursor: Cursor::new(11, 4),
            language: "Rust".into(),
            message: "Saved main.rs".into(),
        };
        let text = render_text(&mut bar);
        assert!(text.contains("main.rs ●"));
        assert!(text.contains("Ln 12, Col 5"));
        assert!(text.contains("Rust"));
        assert!(text.contains("Saved main.rs"));
    }
}
