//! # Command Runner
//!
//! State behind the terminal panel: working directory, command history,
//! and the output log. The runner never blocks: `submit` either handles a
//! built-in on the spot or hands back an `ExecRequest` for the event loop to
//! run on a background task. Process output comes back later through
//! `on_process_event`, on the same thread as everything else.
//!
//! ```text
//! submit("cd src")   → Cd(Some("src"))  → cwd updated, "Changed to: ..."
//! submit("pwd")      → Pwd              → prints cwd
//! submit("clear")    → Clear            → output log emptied
//! submit("make -j4") → External(..)     → Submission::Spawn(ExecRequest)
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::core::error::EditorError;
use crate::core::process::{ExecRequest, ProcessEvent};

pub const DEFAULT_MAX_OUTPUT_LINES: usize = 5000;
pub const DEFAULT_MAX_HISTORY: usize = 500;

/// A tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `cd` with its (optional) target.
    Cd(Option<String>),
    Pwd,
    Clear,
    /// Anything else, verbatim.
    External(String),
}

impl Command {
    /// Split off the first word and decide who handles the line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));
        match word {
            "cd" if rest.is_empty() => Command::Cd(None),
            "cd" => Command::Cd(Some(unquote(rest).to_string())),
            "pwd" => Command::Pwd,
            "clear" => Command::Clear,
            _ => Command::External(line.to_string()),
        }
    }
}

/// Strip one pair of matching outer quotes, so `cd "my dir"` names `my dir`.
fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}

/// Shell exit statuses that mean the command never started.
const EXIT_NOT_FOUND: i32 = 127;
const EXIT_NOT_EXECUTABLE: i32 = 126;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Echo of a submitted external command (`$ make`).
    Command,
    Stdout,
    Stderr,
    /// Runner messages such as directory changes.
    Info,
    Error,
    /// Exit-status markers.
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: OutputKind,
    pub text: String,
}

/// Outcome of `CommandRunner::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank line, nothing recorded.
    Ignored,
    /// A built-in ran to completion.
    Handled,
    /// `cd` succeeded; the header should show the new directory.
    DirectoryChanged(PathBuf),
    /// Start this process; feed its events back via `on_process_event`.
    Spawn(ExecRequest),
}

pub struct CommandRunner {
    cwd: PathBuf,
    home: Option<PathBuf>,
    history: Vec<String>,
    /// `history.len()` means "past the end" (empty input line).
    history_cursor: usize,
    output: Vec<OutputLine>,
    running: bool,
    max_output_lines: usize,
    max_history: usize,
}

impl CommandRunner {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            home: dirs::home_dir(),
            history: Vec::new(),
            history_cursor: 0,
            output: Vec::new(),
            running: false,
            max_output_lines: DEFAULT_MAX_OUTPUT_LINES,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    pub fn with_limits(mut self, max_output_lines: usize, max_history: usize) -> Self {
        self.max_output_lines = max_output_lines.max(1);
        self.max_history = max_history.max(1);
        self
    }

    /// Override the directory `~` expands to.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn output(&self) -> &[OutputLine] {
        &self.output
    }

    /// True while an external process is in flight. The panel disables
    /// input meanwhile; the runner itself doesn't police it.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn submit(&mut self, line: &str) -> Submission {
        let line = line.trim();
        if line.is_empty() {
            return Submission::Ignored;
        }
        self.record_history(line);

        match Command::parse(line) {
            Command::Cd(target) => match self.change_dir(target.as_deref()) {
                Ok(path) => {
                    self.push(OutputKind::Info, format!("Changed to: {}", path.display()));
                    Submission::DirectoryChanged(path)
                }
                Err(e) => {
                    self.push(OutputKind::Error, e.to_string());
                    Submission::Handled
                }
            },
            Command::Pwd => {
                let cwd = self.cwd.display().to_string();
                self.push(OutputKind::Stdout, cwd);
                Submission::Handled
            }
            Command::Clear => {
                self.output.clear();
                Submission::Handled
            }
            Command::External(line) => {
                self.push(OutputKind::Command, format!("$ {line}"));
                self.running = true;
                Submission::Spawn(ExecRequest {
                    line,
                    cwd: self.cwd.clone(),
                })
            }
        }
    }

    /// Step back through history, stopping at the oldest entry.
    pub fn history_prev(&mut self) -> &str {
        if self.history.is_empty() {
            return "";
        }
        self.history_cursor = self.history_cursor.saturating_sub(1);
        &self.history[self.history_cursor]
    }

    /// Step forward through history; past the newest entry is an empty line.
    pub fn history_next(&mut self) -> &str {
        if self.history_cursor < self.history.len() {
            self.history_cursor += 1;
        }
        self.history
            .get(self.history_cursor)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Append process output or completion. Output that arrives after a
    /// `clear` simply starts the new log.
    pub fn on_process_event(&mut self, event: ProcessEvent) {
        match event {
            ProcessEvent::Stdout(text) => self.push(OutputKind::Stdout, text),
            ProcessEvent::Stderr(text) => self.push(OutputKind::Stderr, text),
            ProcessEvent::Exited(code) => {
                self.running = false;
                match code {
                    Some(0) => {}
                    Some(EXIT_NOT_FOUND) => {
                        self.push(OutputKind::Error, "[spawn error] command not found".into())
                    }
                    Some(EXIT_NOT_EXECUTABLE) => {
                        self.push(OutputKind::Error, "[spawn error] permission denied".into())
                    }
                    Some(code) => self.push(OutputKind::Status, format!("[exit code {code}]")),
                    None => self.push(OutputKind::Status, "[terminated by signal]".into()),
                }
            }
            ProcessEvent::SpawnFailed(msg) => {
                self.running = false;
                self.push(OutputKind::Error, format!("[spawn error] {msg}"));
            }
        }
    }

    fn record_history(&mut self, line: &str) {
        self.history.push(line.to_string());
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
        self.history_cursor = self.history.len();
    }

    fn push(&mut self, kind: OutputKind, text: String) {
        self.output.push(OutputLine { kind, text });
        if self.output.len() > self.max_output_lines {
            let excess = self.output.len() - self.max_output_lines;
            self.output.drain(..excess);
        }
    }

    fn change_dir(&mut self, target: Option<&str>) -> Result<PathBuf, EditorError> {
        let requested = match target {
            None => self.home_dir(Path::new("~"))?,
            Some("~") => self.home_dir(Path::new("~"))?,
            Some(t) => match t.strip_prefix("~/") {
                Some(rest) => self.home_dir(Path::new(t))?.join(rest),
                None => PathBuf::from(t),
            },
        };
        let resolved = normalize(&self.cwd.join(requested));

        let unresolved = |reason: &str| EditorError::PathResolution {
            path: resolved.clone(),
            reason: reason.to_string(),
        };
        let meta = fs::metadata(&resolved).map_err(|_| unresolved("No such directory"))?;
        if !meta.is_dir() {
            return Err(unresolved("Not a directory"));
        }
        fs::read_dir(&resolved).map_err(|_| unresolved("Permission denied"))?;

        info!("cwd {} -> {}", self.cwd.display(), resolved.display());
        self.cwd = resolved.clone();
        Ok(resolved)
    }

    fn home_dir(&self, shown_as: &Path) -> Result<PathBuf, EditorError> {
        self.home.clone().ok_or_else(|| EditorError::PathResolution {
            path: shown_as.to_path_buf(),
            reason: "home directory unknown".into(),
        })
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem, so
/// symlinked directories keep the name the user typed.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    debug!("`..` above root in {}", path.display());
                }
                if out.as_os_str().is_empty() {
                    out.push(Component::RootDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}
