//! # Buffer
//!
//! One open document: its text, cursor, language tag and modification state.
//!
//! ```text
//! Buffer
//! ├── id: BufferId          // never reused within a session
//! ├── name: String          // tab label ("main.rs", "Untitled 2")
//! ├── path: Option<PathBuf> // canonical; None = untitled
//! ├── content: String       // live text
//! ├── saved: String         // last saved / loaded snapshot
//! ├── cursor: Cursor        // always clamped to content
//! ├── language: String      // derived from path
//! ├── dirty: bool           // content != saved
//! └── loading: bool         // being installed into the editing surface
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::error::EditorError;
use crate::core::language::{LanguageTable, PLAIN_TEXT};

/// Stable buffer identity. Assigned by `BufferStore`, monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Zero-based line and column (in chars).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Clamp to the last line of `content` and to that line's length.
    pub fn clamp_to(self, content: &str) -> Self {
        let last_line = content.split('\n').count() - 1;
        let line = self.line.min(last_line);
        let width = content
            .split('\n')
            .nth(line)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        Self {
            line,
            column: self.column.min(width),
        }
    }
}

/// State of the editing surface at a point in time, tagged with the buffer
/// it was showing. Change notifications and tab requests carry one of these
/// so every edit lands in the buffer it was typed into.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveEdit {
    pub buffer: BufferId,
    pub content: String,
    pub cursor: Cursor,
}

#[derive(Debug, Clone)]
pub struct Buffer {
    id: BufferId,
    name: String,
    path: Option<PathBuf>,
    content: String,
    saved: String,
    cursor: Cursor,
    language: String,
    dirty: bool,
    loading: bool,
}

impl Buffer {
    pub(crate) fn untitled(id: BufferId, name: String) -> Self {
        Self {
            id,
            name,
            path: None,
            content: String::new(),
            saved: String::new(),
            cursor: Cursor::default(),
            language: PLAIN_TEXT.to_string(),
            dirty: false,
            loading: false,
        }
    }

    /// Load `path` from disk. The stored path is the canonical one.
    pub(crate) fn from_file(
        id: BufferId,
        path: &Path,
        languages: &LanguageTable,
    ) -> Result<Self, EditorError> {
        let content = fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        let path = resolve_path(path);
        debug!("Loaded {} ({} bytes)", path.display(), content.len());
        Ok(Self {
            id,
            name: file_label(&path),
            language: languages.classify(&path),
            path: Some(path),
            saved: content.clone(),
            content,
            cursor: Cursor::default(),
            dirty: false,
            loading: false,
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_untitled(&self) -> bool {
        self.path.is_none()
    }

    /// Record a change reported by the editing surface.
    ///
    /// Ignored while the buffer is being installed: the surface is echoing
    /// content we gave it, not user input. Returns whether it was applied.
    pub fn apply_edit(&mut self, content: &str, cursor: Cursor) -> bool {
        if self.loading {
            debug!("Ignoring change for {} while loading", self.id);
            return false;
        }
        if self.content != content {
            self.content = content.to_string();
        }
        self.cursor = cursor.clamp_to(&self.content);
        self.dirty = self.content != self.saved;
        true
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor.clamp_to(&self.content);
    }

    pub(crate) fn begin_install(&mut self) {
        self.loading = true;
    }

    pub(crate) fn finish_install(&mut self) {
        self.loading = false;
    }

    /// Write content to the buffer's path.
    pub fn save(&mut self) -> Result<(), EditorError> {
        let Some(path) = self.path.clone() else {
            return Err(EditorError::io(
                self.name.clone(),
                io::Error::new(io::ErrorKind::NotFound, "buffer has no file path"),
            ));
        };
        fs::write(&path, &self.content).map_err(|e| EditorError::io(&path, e))?;
        self.mark_saved();
        Ok(())
    }

    /// Write content to `path` and adopt it as the buffer's path.
    /// On failure the buffer keeps its old path and stays dirty.
    pub fn save_as(&mut self, path: &Path, languages: &LanguageTable) -> Result<(), EditorError> {
        fs::write(path, &self.content).map_err(|e| EditorError::io(path, e))?;
        self.set_path(path, languages);
        self.mark_saved();
        Ok(())
    }

    pub(crate) fn set_path(&mut self, path: &Path, languages: &LanguageTable) {
        let path = resolve_path(path);
        self.name = file_label(&path);
        self.language = languages.classify(&path);
        self.path = Some(path);
    }

    fn mark_saved(&mut self) {
        self.saved = self.content.clone();
        self.dirty = false;
    }
}

/// Canonical form used for duplicate-open detection. Falls back to an
/// absolute path when the file doesn't exist (yet).
pub fn resolve_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn untitled() -> Buffer {
        Buffer::untitled(BufferId::new(1), "Untitled".into())
    }

    #[test]
    fn test_cursor_clamps_to_content() {
        let content = "ab\ncdef";
        assert_eq!(Cursor::new(5, 9).clamp_to(content), Cursor::new(1, 4));
        assert_eq!(Cursor::new(0, 9).clamp_to(content), Cursor::new(0, 2));
        assert_eq!(Cursor::new(3, 3).clamp_to(""), Cursor::new(0, 0));
    }

    #[test]
    fn test_cursor_counts_chars_not_bytes() {
        assert_eq!(Cursor::new(0, 10).clamp_to("héllo"), Cursor::new(0, 5));
    }

    #[test]
    fn test_new_untitled_is_clean() {
        let buffer = untitled();
        assert!(!buffer.is_dirty());
        assert!(buffer.is_untitled());
        assert_eq!(buffer.language(), PLAIN_TEXT);
    }

    #[test]
    fn test_dirty_tracks_difference_from_saved() {
        let mut buffer = untitled();
        assert!(buffer.apply_edit("x", Cursor::new(0, 1)));
        assert!(buffer.is_dirty());
        buffer.apply_edit("", Cursor::default());
        assert!(!buffer.is_dirty(), "reverting to the saved text is clean");
    }

    #[test]
    fn test_edits_ignored_while_loading() {
        let mut buffer = untitled();
        buffer.begin_install();
        assert!(!buffer.apply_edit("installed text", Cursor::default()));
        assert!(!buffer.is_dirty());
        assert_eq!(buffer.content(), "");

        buffer.finish_install();
        assert!(buffer.apply_edit("typed", Cursor::new(0, 5)));
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_from_file_sets_language_and_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "print(1)\n").unwrap();

        let buffer =
            Buffer::from_file(BufferId::new(7), &path, &LanguageTable::default()).unwrap();
        assert_eq!(buffer.name(), "a.py");
        assert_eq!(buffer.language(), "python");
        assert_eq!(buffer.content(), "print(1)\n");
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = Buffer::from_file(
            BufferId::new(1),
            &dir.path().join("gone.rs"),
            &LanguageTable::default(),
        );
        assert!(matches!(result, Err(EditorError::Io { .. })));
    }

    #[test]
    fn test_save_as_updates_path_language_and_clears_dirty() {
        let dir = TempDir::new().unwrap();
        let mut buffer = untitled();
        buffer.apply_edit("fn main() {}", Cursor::default());

        let target = dir.path().join("main.rs");
        buffer.save_as(&target, &LanguageTable::default()).unwrap();

        assert_eq!(buffer.name(), "main.rs");
        assert_eq!(buffer.language(), "rust");
        assert!(!buffer.is_dirty());
        assert_eq!(fs::read_to_string(&target).unwrap(), "fn main() {}");
    }

    #[test]
    fn test_failed_save_keeps_buffer_dirty() {
        let dir = TempDir::new().unwrap();
        let mut buffer = untitled();
        buffer.apply_edit("data", Cursor::default());

        let bad = dir.path().join("no-such-dir").join("x.txt");
        assert!(buffer.save_as(&bad, &LanguageTable::default()).is_err());
        assert!(buffer.is_dirty());
        assert!(buffer.is_untitled());
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut buffer = untitled();
        assert!(buffer.save().is_err());
    }
}
