//! # TabBar Component
//!
//! One-line strip of open buffers in tab order. The active tab is
//! highlighted and unsaved buffers carry a `●` marker:
//!
//! ```text
//!  main.rs ● │ lib.rs │ Untitled 2
//! ```
//!
//! Stateless: built from the store each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::store::BufferStore;
use crate::tui::component::Component;

pub const MODIFIED_MARKER: &str = "●";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub name: String,
    pub dirty: bool,
    pub active: bool,
}

pub struct TabBar {
    pub tabs: Vec<TabLabel>,
}

impl TabBar {
    pub fn from_store(store: &BufferStore) -> Self {
        let active = store.active_id();
        let tabs = store
            .buffers()
            .iter()
            .map(|b| TabLabel {
                name: b.name().to_string(),
                dirty: b.is_dirty(),
                active: Some(b.id()) == active,
            })
            .collect();
        Self { tabs }
    }
}

impl Component for TabBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled("│", Style::default().fg(Color::DarkGray));
        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for (i, tab) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(separator.clone());
            }
            let style = if tab.active {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let label = if tab.dirty {
                format!(" {} {} ", tab.name, MODIFIED_MARKER)
            } else {
                format!(" {} ", tab.name)
            };
            spans.push(Span::styled(label, style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::{Cursor, LiveEdit};
    use crate::core::language::LanguageTable;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn render_text(bar: &mut TabBar, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
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
    fn test_from_store_marks_active_and_dirty() {
        let mut store = BufferStore::new(Arc::new(LanguageTable::default()));
        let first = store.active_id().unwrap();
        store.finish_install(first);
        store.apply_edit(&LiveEdit {
            buffer: first,
            content: "x".into(),
            cursor: Cursor::default(),
        });
        store.create(None).unwrap();

        let bar = TabBar::from_store(&store);
        assert_eq!(
            bar.tabs,
            vec![
                TabLabel { name: "Untitled".into(), dirty: true, active: true },
                TabLabel { name: "Untitled 2".into(), dirty: false, active: false },
            ]
        );
    }

    #[test]
    fn test_render_shows_marker_only_for_dirty() {
        let mut bar = TabBar {
            tabs: vec![
                TabLabel { name: "a.py".into(), dirty: true, active: true },
                TabLabel { name: "b.py".into(), dirty: false, active: false },
            ],
        };
        let text = render_text(&mut bar, 40);
        assert!(text.contains("a.py ●"));
        assert!(text.contains("b.py"));
        assert_eq!(text.matches(MODIFIED_MARKER).count(), 1);
    }
}
