//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! 1. An open overlay (confirm dialog, path prompt) takes every key.
//! 2. Global commands (tabs, save, quit, terminal toggle) go to core.
//! 3. Everything else goes to the focused component, editor or terminal.
//!
//! ## Redraw Strategy
//!
//! The loop only draws after input or a background action. While a
//! command is running the poll timeout drops so streamed output shows up
//! promptly; otherwise it sleeps up to 500ms.

pub mod component;
pub mod components;
pub mod event;
pub mod highlight;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::buffer::BufferId;
use crate::core::process::{CommandExecutor, ExecRequest, ProcessEvent};
use crate::core::state::App;
use crate::core::tabs::TabRequest;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ConfirmDialog, EditorEvent, EditorState, PathPromptState, PromptEvent, PromptPurpose,
    TerminalEvent, TerminalPanelState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which component receives keys that aren't global commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Terminal,
}

/// Modal overlay; while one is open it receives every key.
pub enum Overlay {
    Confirm(ConfirmDialog),
    Path(PathPromptState),
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub editor: EditorState,
    pub terminal: TerminalPanelState,
    pub focus: Focus,
    pub terminal_visible: bool,
    pub overlay: Option<Overlay>,
}

impl TuiState {
    pub fn new(tab_width: u8) -> Self {
        Self {
            editor: EditorState::new(tab_width),
            terminal: TerminalPanelState::new(),
            focus: Focus::Editor,
            terminal_visible: false,
            overlay: None,
        }
    }
}

/// Handles the loop needs to start background work.
#[derive(Clone)]
pub struct Runtime {
    pub executor: Arc<dyn CommandExecutor>,
    pub tx: mpsc::Sender<Action>,
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Ctrl+PageUp and friends through;
        // terminals without it ignore the request
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(mut app: App, files: Vec<PathBuf>, executor: Arc<dyn CommandExecutor>) -> std::io::Result<()> {
    let mut tui = TuiState::new(app.tab_width);
    let (tx, rx) = mpsc::channel();
    let rt = Runtime { executor, tx };

    install_active(&mut app, &mut tui);
    for path in files {
        let action = Action::Tab {
            request: TabRequest::Open(path),
            live: tui.editor.live(),
        };
        dispatch(&mut app, &mut tui, action, &rt);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if app.runner.is_running() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, event, &rt) {
                should_quit = true;
                break;
            }
        }

        // Actions from background tasks (process output)
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit = dispatch(&mut app, &mut tui, action, &rt);
        }

        if should_quit {
            break;
        }
    }

    if app.restore_session {
        match app.persist_session() {
            Ok(count) => info!("Session saved on exit ({} file(s))", count),
            Err(e) => warn!("Failed to save session on exit: {}", e),
        }
    }

    ratatui::restore();
    Ok(())
}

/// Route one input event. Returns true when the app should exit.
pub fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent, rt: &Runtime) -> bool {
    if matches!(event, TuiEvent::Resize) {
        return false;
    }

    if let Some(mut overlay) = tui.overlay.take() {
        let outcome = match &mut overlay {
            Overlay::Confirm(dialog) => dialog
                .handle_event(&event)
                .map(|choice| Some(Action::Resolve(choice))),
            Overlay::Path(prompt) => {
                let purpose = prompt.purpose;
                prompt.handle_event(&event).map(|outcome| match (purpose, outcome) {
                    (PromptPurpose::Open, PromptEvent::Submit(path)) => Some(Action::Tab {
                        request: TabRequest::Open(path),
                        live: tui.editor.live(),
                    }),
                    (PromptPurpose::Open, PromptEvent::Dismiss) => None,
                    (PromptPurpose::SaveAs(buffer), PromptEvent::Submit(path)) => {
                        Some(Action::SavePathChosen {
                            buffer,
                            path: Some(path),
                        })
                    }
                    (PromptPurpose::SaveAs(buffer), PromptEvent::Dismiss) => {
                        Some(Action::SavePathChosen { buffer, path: None })
                    }
                })
            }
        };
        return match outcome {
            // Overlay answered; it closes unless the effect opens another
            Some(Some(action)) => dispatch(app, tui, action, rt),
            Some(None) => false,
            None => {
                tui.overlay = Some(overlay);
                false
            }
        };
    }

    let request = match event {
        TuiEvent::NewTab => Some(TabRequest::New),
        TuiEvent::Save => Some(TabRequest::Save),
        TuiEvent::CloseTab => Some(TabRequest::Close(None)),
        TuiEvent::Quit => Some(TabRequest::Quit),
        TuiEvent::NextTab => Some(TabRequest::Next),
        TuiEvent::PreviousTab => Some(TabRequest::Previous),
        TuiEvent::JumpToTab(position) => Some(TabRequest::JumpTo(position)),
        _ => None,
    };
    if let Some(request) = request {
        let action = Action::Tab {
            request,
            live: tui.editor.live(),
        };
        return dispatch(app, tui, action, rt);
    }

    match event {
        TuiEvent::OpenFile => {
            let prompt = PathPromptState::new(PromptPurpose::Open, app.runner.cwd());
            tui.overlay = Some(Overlay::Path(prompt));
            false
        }
        TuiEvent::PersistSession => dispatch(app, tui, Action::PersistSession, rt),
        TuiEvent::ToggleTerminal => {
            if tui.terminal_visible && tui.focus == Focus::Terminal {
                tui.terminal_visible = false;
                tui.focus = Focus::Editor;
            } else {
                tui.terminal_visible = true;
                tui.focus = Focus::Terminal;
            }
            false
        }
        _ => match tui.focus {
            Focus::Editor => match tui.editor.handle_event(&event) {
                Some(EditorEvent::Changed | EditorEvent::CursorMoved) => match tui.editor.live() {
                    Some(live) => dispatch(app, tui, Action::EditorChanged(live), rt),
                    None => false,
                },
                None => false,
            },
            Focus::Terminal => match tui.terminal.handle_event(&event) {
                Some(TerminalEvent::Submit(line)) => {
                    if app.runner.is_running() {
                        // One command at a time; keep what was typed
                        tui.terminal.set_input(&line);
                        return false;
                    }
                    dispatch(app, tui, Action::SubmitCommand(line), rt)
                }
                Some(TerminalEvent::HistoryPrev) => {
                    let line = app.runner.history_prev().to_string();
                    tui.terminal.set_input(&line);
                    false
                }
                Some(TerminalEvent::HistoryNext) => {
                    let line = app.runner.history_next().to_string();
                    tui.terminal.set_input(&line);
                    false
                }
                Some(TerminalEvent::Unfocus) => {
                    tui.focus = Focus::Editor;
                    false
                }
                None => false,
            },
        },
    }
}

/// Run an action through core and carry out its effect. Returns true when
/// the app should exit.
pub fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, rt: &Runtime) -> bool {
    let effect = update(app, action);
    let quit = apply_effect(app, tui, effect, rt);
    sync_editor(app, tui);
    quit
}

fn apply_effect(app: &mut App, tui: &mut TuiState, effect: Effect, rt: &Runtime) -> bool {
    match effect {
        Effect::None => {}
        Effect::LoadBuffer(id) => {
            load_buffer(app, tui, id);
            tui.focus = Focus::Editor;
        }
        Effect::Confirm(id) => {
            tui.overlay = Some(Overlay::Confirm(ui::confirm_dialog_for(app, id)));
        }
        Effect::PromptSavePath(id) => {
            let prompt = PathPromptState::new(PromptPurpose::SaveAs(id), app.runner.cwd());
            tui.overlay = Some(Overlay::Path(prompt));
        }
        Effect::SpawnCommand(request) => {
            spawn_command(Arc::clone(&rt.executor), request, rt.tx.clone());
        }
        Effect::SaveSession => {
            app.status_message = match app.persist_session() {
                Ok(count) => format!("Session saved ({count} file(s))"),
                Err(e) => {
                    warn!("Failed to save session: {}", e);
                    format!("Session save failed: {e}")
                }
            };
        }
        Effect::Quit => return true,
    }
    false
}

fn load_buffer(app: &mut App, tui: &mut TuiState, id: BufferId) {
    let Some(buffer) = app.store.get(id) else {
        warn!("Asked to load unknown buffer {}", id);
        return;
    };
    tui.editor.install(id, buffer.content(), buffer.cursor(), buffer.language());
    debug!("Installed {} ({})", buffer.name(), id);
    update(app, Action::BufferInstalled(id));
}

fn install_active(app: &mut App, tui: &mut TuiState) {
    if let Some(id) = app.store.active_id() {
        load_buffer(app, tui, id);
    }
}

/// Keep the surface showing the active buffer and its current language.
/// Closing a tab can change the active buffer without a `LoadBuffer`.
fn sync_editor(app: &mut App, tui: &mut TuiState) {
    if app.tabs.pending().is_some() {
        return;
    }
    if tui.editor.buffer() != app.store.active_id() {
        install_active(app, tui);
        return;
    }
    if let Some(buffer) = app.store.active()
        && tui.editor.language != buffer.language()
    {
        tui.editor.language = buffer.language().to_string();
    }
}

/// Run a command line in the background. Process events are forwarded to
/// the action channel in the order the executor produced them.
pub fn spawn_command(
    executor: Arc<dyn CommandExecutor>,
    request: ExecRequest,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning `{}` via {} in {}",
        request.line,
        executor.name(),
        request.cwd.display()
    );

    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<ProcessEvent>(256);
    let tx_exec = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = executor.execute(request, event_tx).await {
            warn!("Command failed to start: {}", e);
            if tx_exec
                .send(Action::Process(ProcessEvent::SpawnFailed(e.to_string())))
                .is_err()
            {
                warn!("Failed to send spawn error: receiver dropped");
            }
        }
    });

    tokio::spawn(async move {
        let mut forwarded = 0usize;
        while let Some(event) = event_rx.recv().await {
            forwarded += 1;
            if tx.send(Action::Process(event)).is_err() {
                warn!("Failed to forward process event: receiver dropped");
                return;
            }
        }
        debug!("Process channel closed after {} event(s)", forwarded);
    });
}
