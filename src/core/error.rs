use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised by the buffer and command subsystems.
///
/// None of these are fatal. `TabController` and `CommandRunner` turn every
/// variant into a status message or an output line before it reaches the UI.
#[derive(Debug)]
pub enum EditorError {
    /// Reading or writing a file failed.
    Io { path: PathBuf, source: io::Error },
    /// The user picked Cancel in a confirmation prompt.
    ConfirmationAborted,
    /// An external command could not be started.
    Spawn(String),
    /// `cd` target is missing, not a directory, or unreadable.
    PathResolution { path: PathBuf, reason: String },
    /// Save-as target is already open in another tab.
    PathInUse(PathBuf),
    /// A tab action arrived while a confirmation prompt is still open.
    PromptPending,
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            EditorError::ConfirmationAborted => write!(f, "cancelled"),
            EditorError::Spawn(msg) => write!(f, "failed to start command: {msg}"),
            EditorError::PathResolution { path, reason } => {
                write!(f, "cd: {}: {reason}", path.display())
            }
            EditorError::PathInUse(path) => {
                write!(f, "{} is already open in another tab", path.display())
            }
            EditorError::PromptPending => write!(f, "answer the open prompt first"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
