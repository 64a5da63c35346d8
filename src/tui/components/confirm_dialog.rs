//! # Confirm Dialog Component
//!
//! Modal Save / Discard / Cancel prompt for a buffer with unsaved changes.
//! While it is open every key goes here; nothing reaches the editor or the
//! tab commands.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::core::buffer::BufferId;
use crate::core::tabs::ConfirmChoice;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub struct ConfirmDialog {
    pub buffer: BufferId,
    pub name: String,
}

impl ConfirmDialog {
    pub fn new(buffer: BufferId, name: impl Into<String>) -> Self {
        Self {
            buffer,
            name: name.into(),
        }
    }
}

impl EventHandler for ConfirmDialog {
    type Event = ConfirmChoice;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<ConfirmChoice> {
        match event {
            TuiEvent::InputChar('s' | 'S' | 'y' | 'Y') => Some(ConfirmChoice::Save),
            TuiEvent::InputChar('d' | 'D' | 'n' | 'N') => Some(ConfirmChoice::Discard),
            TuiEvent::InputChar('c' | 'C') | TuiEvent::Escape => Some(ConfirmChoice::Cancel),
            _ => None,
        }
    }
}

impl Component for ConfirmDialog {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 30, area);
        frame.render_widget(Clear, overlay);

        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let help = Line::from(vec![
            Span::styled(" s ", key),
            Span::raw("Save  "),
            Span::styled(" d ", key),
            Span::raw("Discard  "),
            Span::styled(" c ", key),
            Span::raw("Cancel "),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Unsaved changes ")
            .title_bottom(help.centered())
            .padding(Padding::uniform(1));

        let body = Paragraph::new(format!("Save changes to {} before closing?", self.name))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, overlay);
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
