//! # Buffer Store
//!
//! Ordered collection of open buffers plus the id of the active one.
//! Order is tab order. Only `TabController` mutates the store in the running
//! app; everything here is synchronous and free of UI concerns.
//!
//! Invariant: once constructed through `new()` the store is never left empty.
//! Removing the last buffer creates a fresh untitled one.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::buffer::{Buffer, BufferId, LiveEdit, resolve_path};
use crate::core::error::EditorError;
use crate::core::language::LanguageTable;

const UNTITLED: &str = "Untitled";

pub struct BufferStore {
    buffers: Vec<Buffer>,
    active: Option<BufferId>,
    next_id: u64,
    languages: Arc<LanguageTable>,
}

impl BufferStore {
    /// A store holding one untitled, active buffer.
    pub fn new(languages: Arc<LanguageTable>) -> Self {
        let mut store = Self::empty(languages);
        store.ensure_active();
        store
    }

    /// A store with no buffers. Callers must finish with `ensure_active()`.
    pub(crate) fn empty(languages: Arc<LanguageTable>) -> Self {
        Self {
            buffers: Vec::new(),
            active: None,
            next_id: 1,
            languages,
        }
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Buffers in tab order.
    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.iter().find(|b| b.id() == id)
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|b| b.id() == id)
    }

    pub fn active_id(&self) -> Option<BufferId> {
        self.active
    }

    pub fn active(&self) -> Option<&Buffer> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn position(&self, id: BufferId) -> Option<usize> {
        self.buffers.iter().position(|b| b.id() == id)
    }

    pub fn id_at(&self, index: usize) -> Option<BufferId> {
        self.buffers.get(index).map(Buffer::id)
    }

    /// Build a new buffer and insert it right after the active tab (or at
    /// the end when nothing is active). Does not activate it.
    ///
    /// With a path the file is loaded; an unreadable file is an `Io` error
    /// and the store is left untouched.
    pub fn create(&mut self, path: Option<&Path>) -> Result<BufferId, EditorError> {
        let id = BufferId::new(self.next_id);
        let buffer = match path {
            Some(path) => Buffer::from_file(id, path, &self.languages)?,
            None => Buffer::untitled(id, self.next_untitled_name()),
        };
        self.next_id += 1;

        let index = self
            .active
            .and_then(|active| self.position(active))
            .map(|i| i + 1)
            .unwrap_or(self.buffers.len());
        debug!("Created buffer {} '{}' at tab {}", id, buffer.name(), index + 1);
        self.buffers.insert(index, buffer);
        Ok(id)
    }

    /// Find the buffer showing `path`, comparing canonical forms.
    pub fn find_by_path(&self, path: &Path) -> Option<BufferId> {
        let wanted = resolve_path(path);
        self.buffers
            .iter()
            .find(|b| b.path() == Some(wanted.as_path()))
            .map(Buffer::id)
    }

    /// Remove a buffer. When it was active, activation falls to the left
    /// neighbour, then the right one, then a fresh untitled buffer.
    pub fn remove(&mut self, id: BufferId) -> Option<Buffer> {
        let index = self.position(id)?;
        let removed = self.buffers.remove(index);
        info!("Closed buffer {} '{}'", id, removed.name());

        if self.active == Some(id) {
            self.active = None;
            let fallback = if index > 0 {
                self.id_at(index - 1)
            } else {
                self.id_at(0)
            };
            match fallback {
                Some(next) => self.activate(next),
                None => {
                    self.ensure_active();
                }
            }
        }
        Some(removed)
    }

    /// Make `id` the active buffer.
    ///
    /// The outgoing surface state in `live` is written into its buffer
    /// *before* the switch, so nothing typed is lost. No-op (returns false)
    /// when `id` is already active or unknown.
    pub fn set_active(&mut self, id: BufferId, live: Option<&LiveEdit>) -> bool {
        if self.active == Some(id) || self.get(id).is_none() {
            return false;
        }
        if let Some(live) = live {
            self.apply_edit(live);
        }
        self.activate(id);
        true
    }

    /// Apply a surface change to the buffer it names. Unknown ids (the buffer
    /// was closed in the meantime) are dropped.
    pub fn apply_edit(&mut self, edit: &LiveEdit) -> bool {
        match self.get_mut(edit.buffer) {
            Some(buffer) => buffer.apply_edit(&edit.content, edit.cursor),
            None => {
                warn!("Dropping edit for closed buffer {}", edit.buffer);
                false
            }
        }
    }

    /// Write buffer `id` to its own path.
    pub fn save(&mut self, id: BufferId) -> Result<(), EditorError> {
        match self.get_mut(id) {
            Some(buffer) => {
                buffer.save()?;
                info!("Saved {}", buffer.name());
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Write buffer `id` to `path` and adopt that path. Refuses a path that
    /// another open buffer already shows.
    pub fn save_as(&mut self, id: BufferId, path: &Path) -> Result<(), EditorError> {
        if let Some(other) = self.find_by_path(path)
            && other != id
        {
            return Err(EditorError::PathInUse(resolve_path(path)));
        }
        let languages = Arc::clone(&self.languages);
        match self.get_mut(id) {
            Some(buffer) => {
                buffer.save_as(path, &languages)?;
                info!("Saved {} as {}", id, path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// The editing surface finished installing `id`; edits count again.
    pub fn finish_install(&mut self, id: BufferId) {
        if let Some(buffer) = self.get_mut(id) {
            buffer.finish_install();
        }
    }

    /// Guarantee a non-empty store with an active buffer. Returns the active id.
    pub(crate) fn ensure_active(&mut self) -> BufferId {
        if let Some(id) = self.active {
            return id;
        }
        let id = match self.id_at(0) {
            Some(first) => first,
            None => {
                let id = BufferId::new(self.next_id);
                self.next_id += 1;
                let name = self.next_untitled_name();
                self.buffers.push(Buffer::untitled(id, name));
                id
            }
        };
        self.activate(id);
        id
    }

    /// Id of the tab `offset` positions away from the active one, wrapping.
    pub fn neighbour(&self, offset: isize) -> Option<BufferId> {
        let len = self.buffers.len() as isize;
        let current = self.active.and_then(|id| self.position(id))? as isize;
        let index = (current + offset).rem_euclid(len);
        self.id_at(index as usize)
    }

    fn activate(&mut self, id: BufferId) {
        self.active = Some(id);
        if let Some(buffer) = self.get_mut(id) {
            buffer.begin_install();
        }
        debug!("Active buffer is now {}", id);
    }

    fn next_untitled_name(&self) -> String {
        (1..)
            .map(|n| {
                if n == 1 {
                    UNTITLED.to_string()
                } else {
                    format!("{UNTITLED} {n}")
                }
            })
            .find(|name| {
                !self
                    .buffers
                    .iter()
                    .any(|b| b.is_untitled() && b.name() == name)
            })
            .unwrap_or_else(|| UNTITLED.to_string())
    }
}
