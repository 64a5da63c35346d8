//! # Actions
//!
//! Everything that can happen in Scribe becomes an `Action`.
//! User presses Ctrl+W? That's `Action::Tab { request: Close(None), .. }`.
//! A running command prints a line? That's `Action::Process(Stdout(..))`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any follow-up work the
//! adapter must do (install a buffer, show a prompt, spawn a process).
//! No I/O on the terminal here; the adapter owns that.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Actions arrive on a single queue in FIFO order, so `update()` never
//! runs concurrently with itself.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::core::buffer::{BufferId, LiveEdit};
use crate::core::error::EditorError;
use crate::core::process::{ExecRequest, ProcessEvent};
use crate::core::runner::Submission;
use crate::core::state::App;
use crate::core::tabs::{ConfirmChoice, TabRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A buffer-affecting request, with the editing surface's state at the
    /// moment it was made.
    Tab {
        request: TabRequest,
        live: Option<LiveEdit>,
    },
    /// Answer to the three-way unsaved-changes prompt.
    Resolve(ConfirmChoice),
    /// Answer to a save-path prompt (`None` = dismissed).
    SavePathChosen {
        buffer: BufferId,
        path: Option<PathBuf>,
    },
    /// The editing surface reported new content or cursor.
    EditorChanged(LiveEdit),
    /// The surface finished installing a buffer's content.
    BufferInstalled(BufferId),
    SubmitCommand(String),
    Process(ProcessEvent),
    PersistSession,
}

/// Follow-up work for the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Install this buffer into the editing surface and focus it.
    LoadBuffer(BufferId),
    /// Show the Save / Discard / Cancel prompt for this buffer.
    Confirm(BufferId),
    /// Ask for a path to save this buffer to.
    PromptSavePath(BufferId),
    SpawnCommand(ExecRequest),
    SaveSession,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Tab { request, live } => {
            let saving = request == TabRequest::Save;
            let result = app.tabs.handle(&mut app.store, request, live);
            let effect = settle(app, result);
            if saving
                && effect == Effect::None
                && let Some(buffer) = app.store.active()
                && !buffer.is_dirty()
            {
                app.status_message = format!("Saved {}", buffer.name());
            }
            effect
        }

        Action::Resolve(choice) => {
            let result = app.tabs.resolve(&mut app.store, choice);
            settle(app, result)
        }

        Action::SavePathChosen { buffer, path } => {
            let label = path.as_deref().map(crate::core::buffer::file_label);
            match app.tabs.save_as(&mut app.store, buffer, path) {
                Ok(effect) => {
                    if let Some(label) = label {
                        app.status_message = format!("Saved {label}");
                    }
                    effect
                }
                // Outside a close/quit flow a failed save-as asks again
                Err(e) if app.tabs.pending().is_none() => {
                    warn!("{}", e);
                    app.status_message = e.to_string();
                    Effect::PromptSavePath(buffer)
                }
                Err(e) => settle(app, Err(e)),
            }
        }

        Action::EditorChanged(live) => {
            app.store.apply_edit(&live);
            Effect::None
        }

        Action::BufferInstalled(id) => {
            app.store.finish_install(id);
            Effect::None
        }

        Action::SubmitCommand(line) => match app.runner.submit(&line) {
            Submission::Spawn(request) => Effect::SpawnCommand(request),
            Submission::DirectoryChanged(path) => {
                debug!("Terminal now in {}", path.display());
                Effect::None
            }
            Submission::Handled | Submission::Ignored => Effect::None,
        },

        Action::Process(event) => {
            app.runner.on_process_event(event);
            Effect::None
        }

        Action::PersistSession => {
            if app.session_file.is_none() {
                app.status_message = "No session file configured".to_string();
                return Effect::None;
            }
            Effect::SaveSession
        }
    }
}

/// Turn a controller result into an effect, reporting errors in the
/// status bar. A prompt that survives an error is shown again.
fn settle(app: &mut App, result: Result<Effect, EditorError>) -> Effect {
    match result {
        Ok(effect) => {
            if effect == Effect::Quit {
                info!("Quitting");
            }
            effect
        }
        Err(EditorError::ConfirmationAborted) => {
            app.status_message = "Cancelled".to_string();
            Effect::None
        }
        Err(e) => {
            warn!("{}", e);
            app.status_message = e.to_string();
            match app.tabs.pending() {
                Some(buffer) => Effect::Confirm(buffer),
                None => Effect::None,
            }
        }
    }
}
