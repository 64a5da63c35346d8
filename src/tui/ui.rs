use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{ConfirmDialog, EditorView, PathPrompt, StatusBar, TabBar, TerminalPanel};
use crate::tui::{Focus, Overlay, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Terminal panel share of the window when visible.
const TERMINAL_PERCENT: u16 = 35;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min, Percentage};
    let overlay_open = tui.overlay.is_some();

    let [tab_area, editor_area, terminal_area, status_area] = if tui.terminal_visible {
        Layout::vertical([Length(1), Min(3), Percentage(TERMINAL_PERCENT), Length(1)])
            .areas(frame.area())
    } else {
        Layout::vertical([Length(1), Min(3), Length(0), Length(1)]).areas(frame.area())
    };

    TabBar::from_store(&app.store).render(frame, tab_area);

    let editor_focused = !overlay_open && tui.focus == Focus::Editor;
    EditorView::new(&mut tui.editor, editor_focused).render(frame, editor_area);

    if tui.terminal_visible {
        let terminal_focused = !overlay_open && tui.focus == Focus::Terminal;
        TerminalPanel::new(&mut tui.terminal, &app.runner, terminal_focused)
            .render(frame, terminal_area);
    }

    // The surface holds the live cursor; the store only catches up on change
    let active = app.store.active();
    let cursor = match active {
        Some(b) if tui.editor.buffer() == Some(b.id()) => tui.editor.cursor(),
        Some(b) => b.cursor(),
        None => Default::default(),
    };
    StatusBar::new(active, cursor, &app.status_message).render(frame, status_area);

    match &mut tui.overlay {
        Some(Overlay::Confirm(dialog)) => dialog.render(frame, frame.area()),
        Some(Overlay::Path(state)) => PathPrompt::new(state).render(frame, frame.area()),
        None => {}
    }
}

/// Dialog for the buffer the core is asking about.
pub fn confirm_dialog_for(app: &App, buffer: crate::core::buffer::BufferId) -> ConfirmDialog {
    let name = app
        .store
        .get(buffer)
        .map(|b| b.name().to_string())
        .unwrap_or_else(|| buffer.to_string());
    ConfirmDialog::new(buffer, name)
}
