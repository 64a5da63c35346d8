use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Tab and session commands (become core actions)
    NewTab,
    OpenFile,
    Save,
    CloseTab,
    Quit,
    NextTab,
    PreviousTab,
    /// 1-based tab position (Alt+1..9)
    JumpToTab(usize),
    PersistSession,

    // TUI-local events (handled by the focused component)
    ToggleTerminal,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    Submit,
    Indent,
    Escape,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Home,
    End,
    PageUp,
    PageDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, waiting up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            map_key(key_event)
        }
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

/// Translate a key press into a `TuiEvent`. Releases and repeats reported by
/// the keyboard enhancement protocol are dropped.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    match key_event.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'n' => Some(TuiEvent::NewTab),
            'o' => Some(TuiEvent::OpenFile),
            's' => Some(TuiEvent::Save),
            'w' => Some(TuiEvent::CloseTab),
            'q' | 'c' => Some(TuiEvent::Quit),
            't' => Some(TuiEvent::ToggleTerminal),
            'p' => Some(TuiEvent::PersistSession),
            // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
            'j' => Some(TuiEvent::Submit),
            _ => None,
        },
        KeyCode::Char(c) if alt => match c.to_digit(10) {
            Some(n @ 1..=9) => Some(TuiEvent::JumpToTab(n as usize)),
            _ => None,
        },
        KeyCode::Right if alt => Some(TuiEvent::NextTab),
        KeyCode::Left if alt => Some(TuiEvent::PreviousTab),
        KeyCode::PageDown if ctrl => Some(TuiEvent::NextTab),
        KeyCode::PageUp if ctrl => Some(TuiEvent::PreviousTab),

        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Tab => Some(TuiEvent::Indent),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::Home),
        KeyCode::End => Some(TuiEvent::End),
        KeyCode::PageUp => Some(TuiEvent::PageUp),
        KeyCode::PageDown => Some(TuiEvent::PageDown),
        _ => None,
    }
}
