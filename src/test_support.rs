//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::error::EditorError;
use crate::core::language::LanguageTable;
use crate::core::process::{CommandExecutor, ExecRequest, ProcessEvent};
use crate::core::runner::CommandRunner;
use crate::core::state::App;
use crate::core::store::BufferStore;

/// An executor that replays canned events and records what it was asked
/// to run.
#[derive(Default)]
pub struct ScriptedExecutor {
    pub events: Vec<ProcessEvent>,
    pub seen: Mutex<Vec<ExecRequest>>,
}

impl ScriptedExecutor {
    pub fn new(events: Vec<ProcessEvent>) -> Self {
        Self {
            events,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn execute(
        &self,
        request: ExecRequest,
        sender: Sender<ProcessEvent>,
    ) -> Result<(), EditorError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request);
        }
        for event in &self.events {
            if sender.send(event.clone()).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Creates a test App with one untitled buffer and the terminal in the
/// system temp directory.
pub fn test_app() -> App {
    test_app_in(&std::env::temp_dir())
}

/// Creates a test App whose terminal starts (and whose `~` points) at `dir`.
pub fn test_app_in(dir: &Path) -> App {
    let store = BufferStore::new(Arc::new(LanguageTable::default()));
    let runner = CommandRunner::new(dir.to_path_buf()).with_home(Some(dir.to_path_buf()));
    App::new(store, runner)
}
