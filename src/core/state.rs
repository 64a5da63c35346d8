//! # Application State
//!
//! Core session state for Scribe. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── store: BufferStore             // open buffers, tab order, active id
//! ├── tabs: TabController            // close/quit confirmation state
//! ├── runner: CommandRunner          // terminal cwd, history, output
//! ├── status_message: String         // status bar text
//! ├── tab_width: u8                  // spaces per Tab key
//! ├── restore_session: bool          // persist at quit
//! └── session_file: Option<SessionFile>
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::core::config::ResolvedConfig;
use crate::core::language::LanguageTable;
use crate::core::runner::CommandRunner;
use crate::core::session::{self, RestoredSession, SessionFile};
use crate::core::store::BufferStore;
use crate::core::tabs::TabController;

pub struct App {
    pub store: BufferStore,
    pub tabs: TabController,
    pub runner: CommandRunner,
    pub status_message: String,
    pub tab_width: u8,
    pub restore_session: bool,
    pub session_file: Option<SessionFile>,
}

impl App {
    pub fn new(store: BufferStore, runner: CommandRunner) -> Self {
        Self {
            store,
            tabs: TabController::new(),
            runner,
            status_message: String::from("Welcome to Scribe!"),
            tab_width: 4,
            restore_session: false,
            session_file: None,
        }
    }

    /// Build the session from resolved config. When restoring is enabled
    /// the last session's files are reopened before anything is shown.
    pub fn from_config(config: &ResolvedConfig, launch_dir: PathBuf) -> Self {
        let languages = Arc::new(LanguageTable::with_overrides(&config.languages));
        let session_file = config.session_file.clone().map(SessionFile::new);

        let (store, warnings) = match &session_file {
            Some(file) if config.restore_session => {
                let RestoredSession { store, warnings } =
                    session::restore_store(&file.read(), Arc::clone(&languages));
                (store, warnings)
            }
            _ => (BufferStore::new(languages), Vec::new()),
        };

        let runner = CommandRunner::new(launch_dir)
            .with_limits(config.max_output_lines, config.max_history);

        let mut app = Self::new(store, runner);
        app.tab_width = config.tab_width;
        app.restore_session = config.restore_session;
        app.session_file = session_file;
        if !warnings.is_empty() {
            app.status_message = format!(
                "Skipped {} file(s) from last session",
                warnings.len()
            );
        }
        app
    }

    /// Write the session snapshot. Returns the number of files recorded.
    pub fn persist_session(&self) -> io::Result<usize> {
        let Some(file) = &self.session_file else {
            return Ok(0);
        };
        let snapshot = session::snapshot(&self.store);
        file.write(&snapshot)?;
        info!("Persisted {} open file(s)", snapshot.entries.len());
        Ok(snapshot.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, ScribeConfig, resolve_with_env};
    use crate::core::session::{SessionEntry, SessionSnapshot};
    use crate::test_support::test_app;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_session(path: PathBuf, restore: bool) -> ResolvedConfig {
        let mut config = resolve_with_env(&ScribeConfig::default(), &CliOverrides::default(), |_| None);
        config.session_file = Some(path);
        config.restore_session = restore;
        config
    }

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Scribe!");
        assert_eq!(app.store.len(), 1);
        assert!(!app.runner.is_running());
    }

    #[test]
    fn test_from_config_restores_and_reports_skips() {
        let dir = TempDir::new().unwrap();
        let kept = dir.path().join("kept.rs");
        fs::write(&kept, "fn kept() {}\n").unwrap();
        let session_path = dir.path().join("session.json");
        SessionFile::new(&session_path)
            .write(&SessionSnapshot {
                entries: vec![
                    SessionEntry { path: kept, cursor: Default::default() },
                    SessionEntry { path: dir.path().join("gone.rs"), cursor: Default::default() },
                ],
                active_index: Some(0),
                saved_at: 0,
            })
            .unwrap();

        let app = App::from_config(&config_with_session(session_path, true), dir.path().into());
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.active().unwrap().name(), "kept.rs");
        assert_eq!(app.status_message, "Skipped 1 file(s) from last session");
        assert_eq!(app.runner.cwd(), dir.path());
    }

    #[test]
    fn test_from_config_without_restore_starts_untitled() {
        let dir = TempDir::new().unwrap();
        let session_path = dir.path().join("session.json");
        let app = App::from_config(&config_with_session(session_path, false), dir.path().into());
        assert!(app.store.active().unwrap().is_untitled());
    }

    #[test]
    fn test_persist_session_writes_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "").unwrap();
        let session_path = dir.path().join("session.json");

        let mut app = App::from_config(&config_with_session(session_path.clone(), true), dir.path().into());
        app.store.create(Some(&file)).unwrap();
        assert_eq!(app.persist_session().unwrap(), 1);
        assert_eq!(SessionFile::new(session_path).read().entries.len(), 1);
    }

    #[test]
    fn test_from_config_language_overrides_reach_opened_buffers() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("build.zig");
        fs::write(&file, "const std = @import(\"std\");\n").unwrap();
        let mut config = config_with_session(dir.path().join("session.json"), false);
        config.languages.insert("zig".into(), "zig".into());

        let mut app = App::from_config(&config, dir.path().into());
        let id = app.store.create(Some(&file)).unwrap();
        assert_eq!(app.store.get(id).unwrap().language(), "zig");

        let plain = App::from_config(
            &config_with_session(dir.path().join("session.json"), false),
            dir.path().into(),
        );
        assert_eq!(plain.store.languages().classify(&file), "text");
    }
}
