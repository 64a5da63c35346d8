//! # Tab Controller
//!
//! Orchestrates every user-facing buffer transition over `BufferStore`.
//!
//! ```text
//!            switch / next / prev / jump
//!   ┌──────┐ ─────────────────────────▶ ┌───────────┐
//!   │ Idle │ ◀───────────────────────── │ Switching │
//!   └──────┘                            └───────────┘
//!     │  ▲
//!     │  │ Save ok / Discard / Cancel
//!     ▼  │
//!   ┌──────────────────────────┐
//!   │ PendingConfirm(buffer)   │  close or quit hit a dirty buffer
//!   └──────────────────────────┘
//! ```
//!
//! Close and quit share one dirty-gated confirmation routine; they differ
//! only in what happens once a prompt resolves (`CloseIntent`).
//!
//! While a prompt is open every further tab request is rejected with
//! `EditorError::PromptPending`, so a prompt can never resolve against the
//! wrong buffer.

use std::collections::VecDeque;
use std::path::PathBuf;

use log::{debug, info};

use crate::core::action::Effect;
use crate::core::buffer::{BufferId, LiveEdit};
use crate::core::error::EditorError;
use crate::core::store::BufferStore;

/// What the user asked the tab layer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum TabRequest {
    New,
    Open(PathBuf),
    /// Close a specific buffer, or the active one when `None`.
    Close(Option<BufferId>),
    SwitchTo(BufferId),
    Next,
    Previous,
    /// 1-based position in tab order.
    JumpTo(usize),
    /// Save the active buffer.
    Save,
    Quit,
}

/// Three-way answer to an unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Save,
    Discard,
    Cancel,
}

/// What to do after the pending prompt resolves with Save or Discard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseIntent {
    Close,
    /// Dirty buffers still to be asked about, in tab order.
    Quit { remaining: VecDeque<BufferId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabState {
    Idle,
    PendingConfirm { buffer: BufferId, intent: CloseIntent },
    Switching,
}

pub struct TabController {
    state: TabState,
}

impl Default for TabController {
    fn default() -> Self {
        Self::new()
    }
}

impl TabController {
    pub fn new() -> Self {
        Self {
            state: TabState::Idle,
        }
    }

    pub fn state(&self) -> &TabState {
        &self.state
    }

    /// Buffer the open prompt is about, if any.
    pub fn pending(&self) -> Option<BufferId> {
        match &self.state {
            TabState::PendingConfirm { buffer, .. } => Some(*buffer),
            _ => None,
        }
    }

    /// Handle a tab request. `live` is the editing surface's current state;
    /// it is written into its buffer before anything else happens.
    pub fn handle(
        &mut self,
        store: &mut BufferStore,
        request: TabRequest,
        live: Option<LiveEdit>,
    ) -> Result<Effect, EditorError> {
        if self.pending().is_some() {
            debug!("Rejecting {:?} while a prompt is open", request);
            return Err(EditorError::PromptPending);
        }

        match request {
            TabRequest::New => {
                let id = store.create(None)?;
                Ok(self.switch(store, id, live))
            }
            TabRequest::Open(path) => {
                let id = match store.find_by_path(&path) {
                    Some(existing) => {
                        debug!("{} already open as {}", path.display(), existing);
                        existing
                    }
                    None => store.create(Some(&path))?,
                };
                Ok(self.switch(store, id, live))
            }
            TabRequest::SwitchTo(id) => Ok(self.switch(store, id, live)),
            TabRequest::Next => Ok(self.switch_by(store, 1, live)),
            TabRequest::Previous => Ok(self.switch_by(store, -1, live)),
            TabRequest::JumpTo(position) => {
                let target = position.checked_sub(1).and_then(|i| store.id_at(i));
                Ok(match target {
                    Some(id) => self.switch(store, id, live),
                    None => Effect::None,
                })
            }
            TabRequest::Close(target) => {
                sync(store, live);
                match target.or(store.active_id()) {
                    Some(id) => Ok(self.close(store, id)),
                    None => Ok(Effect::None),
                }
            }
            TabRequest::Save => {
                sync(store, live);
                let Some(buffer) = store.active() else {
                    return Ok(Effect::None);
                };
                let id = buffer.id();
                if buffer.is_untitled() {
                    return Ok(Effect::PromptSavePath(id));
                }
                store.save(id)?;
                Ok(Effect::None)
            }
            TabRequest::Quit => {
                sync(store, live);
                let dirty: VecDeque<BufferId> = store
                    .buffers()
                    .iter()
                    .filter(|b| b.is_dirty())
                    .map(|b| b.id())
                    .collect();
                info!("Quit requested, {} unsaved buffer(s)", dirty.len());
                Ok(self.next_quit_step(store, dirty))
            }
        }
    }

    /// Resolve the open prompt.
    ///
    /// Cancel returns `ConfirmationAborted` and ends the close or the whole
    /// quit sequence. A failed save leaves the prompt open.
    pub fn resolve(
        &mut self,
        store: &mut BufferStore,
        choice: ConfirmChoice,
    ) -> Result<Effect, EditorError> {
        let TabState::PendingConfirm { buffer, intent } = self.state.clone() else {
            return Ok(Effect::None);
        };
        info!("Prompt for {} resolved with {:?}", buffer, choice);

        match choice {
            ConfirmChoice::Cancel => {
                self.state = TabState::Idle;
                Err(EditorError::ConfirmationAborted)
            }
            ConfirmChoice::Discard => Ok(self.proceed(store, buffer, intent)),
            ConfirmChoice::Save => {
                let untitled = store.get(buffer).map(|b| b.is_untitled());
                match untitled {
                    None => Ok(self.proceed(store, buffer, intent)),
                    Some(true) => Ok(Effect::PromptSavePath(buffer)),
                    Some(false) => {
                        store.save(buffer)?;
                        Ok(self.proceed(store, buffer, intent))
                    }
                }
            }
        }
    }

    /// The user answered a save-path prompt for `buffer` (`None` = dismissed).
    ///
    /// Inside a confirmation flow a dismissed path prompt returns to the
    /// three-way prompt, and a successful save continues the flow.
    pub fn save_as(
        &mut self,
        store: &mut BufferStore,
        buffer: BufferId,
        path: Option<PathBuf>,
    ) -> Result<Effect, EditorError> {
        let confirming = self.pending() == Some(buffer);
        let Some(path) = path else {
            return Ok(if confirming {
                Effect::Confirm(buffer)
            } else {
                Effect::None
            });
        };

        store.save_as(buffer, &path)?;

        if let TabState::PendingConfirm { intent, .. } = self.state.clone()
            && confirming
        {
            return Ok(self.proceed(store, buffer, intent));
        }
        Ok(Effect::None)
    }

    fn switch(&mut self, store: &mut BufferStore, id: BufferId, live: Option<LiveEdit>) -> Effect {
        self.state = TabState::Switching;
        let changed = store.set_active(id, live.as_ref());
        self.state = TabState::Idle;
        if changed {
            Effect::LoadBuffer(id)
        } else {
            sync(store, live);
            Effect::None
        }
    }

    fn switch_by(&mut self, store: &mut BufferStore, offset: isize, live: Option<LiveEdit>) -> Effect {
        match store.neighbour(offset) {
            Some(id) => self.switch(store, id, live),
            None => Effect::None,
        }
    }

    /// The shared dirty gate: clean buffers go immediately, dirty ones
    /// open a prompt.
    fn close(&mut self, store: &mut BufferStore, id: BufferId) -> Effect {
        match store.get(id) {
            Some(buffer) if buffer.is_dirty() => {
                self.state = TabState::PendingConfirm {
                    buffer: id,
                    intent: CloseIntent::Close,
                };
                Effect::Confirm(id)
            }
            Some(_) => remove(store, id),
            None => Effect::None,
        }
    }

    fn proceed(&mut self, store: &mut BufferStore, buffer: BufferId, intent: CloseIntent) -> Effect {
        match intent {
            CloseIntent::Close => {
                self.state = TabState::Idle;
                remove(store, buffer)
            }
            CloseIntent::Quit { remaining } => self.next_quit_step(store, remaining),
        }
    }

    fn next_quit_step(&mut self, store: &BufferStore, mut remaining: VecDeque<BufferId>) -> Effect {
        while let Some(id) = remaining.pop_front() {
            if store.get(id).is_some_and(|b| b.is_dirty()) {
                self.state = TabState::PendingConfirm {
                    buffer: id,
                    intent: CloseIntent::Quit { remaining },
                };
                return Effect::Confirm(id);
            }
        }
        self.state = TabState::Idle;
        Effect::Quit
    }
}

fn sync(store: &mut BufferStore, live: Option<LiveEdit>) {
    if let Some(live) = live {
        store.apply_edit(&live);
    }
}

/// Remove `id` and report the newly active buffer if activation moved.
fn remove(store: &mut BufferStore, id: BufferId) -> Effect {
    let before = store.active_id();
    store.remove(id);
    match store.active_id() {
        Some(after) if Some(after) != before => Effect::LoadBuffer(after),
        _ => Effect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Cursor;
    use crate::core::language::LanguageTable;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store() -> BufferStore {
        let mut store = BufferStore::new(Arc::new(LanguageTable::default()));
        let id = store.active_id().unwrap();
        store.finish_install(id);
        store
    }

    fn type_into(store: &mut BufferStore, id: BufferId, text: &str) {
        store.finish_install(id);
        store.apply_edit(&LiveEdit {
            buffer: id,
            content: text.to_string(),
            cursor: Cursor::default(),
        });
    }

    /// Two files a.py (dirty) and b.py (clean), a.py active.
    fn two_files(dir: &TempDir) -> (BufferStore, TabController, BufferId, BufferId) {
        let a_path = dir.path().join("a.py");
        let b_path = dir.path().join("b.py");
        fs::write(&a_path, "a = 1\n").unwrap();
        fs::write(&b_path, "b = 2\n").unwrap();

        let mut store = store();
        let mut tabs = TabController::new();
        let untitled = store.active_id().unwrap();
        tabs.handle(&mut store, TabRequest::Open(a_path), None).unwrap();
        let a = store.active_id().unwrap();
        tabs.handle(&mut store, TabRequest::Open(b_path), None).unwrap();
        let b = store.active_id().unwrap();
        tabs.handle(&mut store, TabRequest::Close(Some(untitled)), None)
            .unwrap();
        tabs.handle(&mut store, TabRequest::SwitchTo(a), None).unwrap();
        type_into(&mut store, a, "a = 42\n");
        (store, tabs, a, b)
    }

    #[test]
    fn test_close_clean_buffer_is_immediate() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);

        let effect = tabs.handle(&mut store, TabRequest::Close(Some(b)), None).unwrap();
        assert_eq!(effect, Effect::None);
        assert_eq!(tabs.state(), &TabState::Idle);
        assert!(store.get(b).is_none());
        assert_eq!(store.active_id(), Some(a));
    }

    #[test]
    fn test_close_dirty_then_discard_leaves_fresh_untitled() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);
        tabs.handle(&mut store, TabRequest::Close(Some(b)), None).unwrap();

        let effect = tabs.handle(&mut store, TabRequest::Close(None), None).unwrap();
        assert_eq!(effect, Effect::Confirm(a));
        assert_eq!(tabs.pending(), Some(a));

        let effect = tabs.resolve(&mut store, ConfirmChoice::Discard).unwrap();
        let fresh = store.active_id().unwrap();
        assert_eq!(effect, Effect::LoadBuffer(fresh));
        assert_eq!(store.len(), 1);
        assert!(store.active().unwrap().is_untitled());
        assert_eq!(tabs.state(), &TabState::Idle);
        // Discard never writes
        assert_eq!(fs::read_to_string(dir.path().join("a.py")).unwrap(), "a = 1\n");
    }

    #[test]
    fn test_cancel_keeps_store_untouched() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, _b) = two_files(&dir);
        tabs.handle(&mut store, TabRequest::Close(Some(a)), None).unwrap();

        let result = tabs.resolve(&mut store, ConfirmChoice::Cancel);
        assert!(matches!(result, Err(EditorError::ConfirmationAborted)));
        assert_eq!(store.len(), 2);
        assert!(store.get(a).unwrap().is_dirty());
        assert_eq!(tabs.state(), &TabState::Idle);
    }

    #[test]
    fn test_save_in_prompt_writes_then_closes() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);
        tabs.handle(&mut store, TabRequest::Close(Some(a)), None).unwrap();

        let effect = tabs.resolve(&mut store, ConfirmChoice::Save).unwrap();
        assert_eq!(effect, Effect::LoadBuffer(b));
        assert!(store.get(a).is_none());
        assert_eq!(fs::read_to_string(dir.path().join("a.py")).unwrap(), "a = 42\n");
    }

    #[test]
    fn test_failed_save_stays_pending() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, _b) = two_files(&dir);
        tabs.handle(&mut store, TabRequest::Close(Some(a)), None).unwrap();
        // Make the write fail by replacing the file with a directory
        let a_path = dir.path().join("a.py");
        fs::remove_file(&a_path).unwrap();
        fs::create_dir(&a_path).unwrap();

        let result = tabs.resolve(&mut store, ConfirmChoice::Save);
        assert!(matches!(result, Err(EditorError::Io { .. })));
        assert_eq!(tabs.pending(), Some(a));
        assert!(store.get(a).unwrap().is_dirty());
    }

    #[test]
    fn test_save_untitled_in_prompt_asks_for_path() {
        let dir = TempDir::new().unwrap();
        let mut store = store();
        let mut tabs = TabController::new();
        let id = store.active_id().unwrap();
        type_into(&mut store, id, "notes");

        tabs.handle(&mut store, TabRequest::Close(None), None).unwrap();
        let effect = tabs.resolve(&mut store, ConfirmChoice::Save).unwrap();
        assert_eq!(effect, Effect::PromptSavePath(id));
        assert_eq!(tabs.pending(), Some(id));

        // Dismissing the path prompt goes back to the three-way prompt
        let effect = tabs.save_as(&mut store, id, None).unwrap();
        assert_eq!(effect, Effect::Confirm(id));

        let target = dir.path().join("notes.md");
        let effect = tabs.save_as(&mut store, id, Some(target.clone())).unwrap();
        assert!(matches!(effect, Effect::LoadBuffer(_)));
        assert!(store.get(id).is_none());
        assert_eq!(fs::read_to_string(target).unwrap(), "notes");
    }

    #[test]
    fn test_requests_rejected_while_prompt_open() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);
        tabs.handle(&mut store, TabRequest::Close(Some(a)), None).unwrap();

        for request in [
            TabRequest::New,
            TabRequest::Close(Some(b)),
            TabRequest::Quit,
            TabRequest::SwitchTo(b),
        ] {
            let result = tabs.handle(&mut store, request, None);
            assert!(matches!(result, Err(EditorError::PromptPending)));
        }
        assert_eq!(store.len(), 2);
        assert_eq!(tabs.pending(), Some(a));
    }

    #[test]
    fn test_open_same_path_twice_switches() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);
        assert_eq!(store.active_id(), Some(a));

        let effect = tabs
            .handle(&mut store, TabRequest::Open(dir.path().join("b.py")), None)
            .unwrap();
        assert_eq!(effect, Effect::LoadBuffer(b));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_new_tab_goes_after_active() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);
        // order: a, b ; a active
        let effect = tabs.handle(&mut store, TabRequest::New, None).unwrap();
        let new = store.active_id().unwrap();
        assert_eq!(effect, Effect::LoadBuffer(new));
        assert_eq!(store.position(a), Some(0));
        assert_eq!(store.position(new), Some(1));
        assert_eq!(store.position(b), Some(2));
    }

    #[test]
    fn test_jump_is_one_based_and_ignores_out_of_range() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);

        assert_eq!(
            tabs.handle(&mut store, TabRequest::JumpTo(2), None).unwrap(),
            Effect::LoadBuffer(b)
        );
        for out_of_range in [0, 3, 9] {
            let effect = tabs
                .handle(&mut store, TabRequest::JumpTo(out_of_range), None)
                .unwrap();
            assert_eq!(effect, Effect::None);
            assert_eq!(store.active_id(), Some(b));
        }
        tabs.handle(&mut store, TabRequest::JumpTo(1), None).unwrap();
        assert_eq!(store.active_id(), Some(a));
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);
        tabs.handle(&mut store, TabRequest::Next, None).unwrap();
        assert_eq!(store.active_id(), Some(b));
        tabs.handle(&mut store, TabRequest::Next, None).unwrap();
        assert_eq!(store.active_id(), Some(a));
        tabs.handle(&mut store, TabRequest::Previous, None).unwrap();
        assert_eq!(store.active_id(), Some(b));
    }

    #[test]
    fn test_switch_persists_live_edit_to_outgoing_buffer() {
        let dir = TempDir::new().unwrap();
        let (mut store, mut tabs, a, b) = two_files(&dir);
        let live = LiveEdit {
            buffer: a,
            content: "a = 'latest'\n".into(),
            cursor: Cursor::new(0, 3),
        };

        tabs.handle(&mut store, TabRequest::SwitchTo(b), Some(live)).unwrap();
        assert_eq!(store.get(a).unwrap().content(), "a = 'latest'\n");
        assert_eq!(store.get(a).unwrap().cursor(), Cursor::new(0, 3));
        assert_eq!(store.get(b).unwrap().content(), "b = 2\n");
    }

    fn edit(buffer: BufferId, content: &str) -> LiveEdit {
        LiveEdit {
            buffer,
            content: content.to_string(),
            cursor: Cursor::default(),
        }
    }

    fn assert_contents(store: &BufferStore, expected: &[(BufferId, &str)]) {
        for (id, content) in expected {
            assert_eq!(store.get(*id).unwrap().content(), *content, "buffer {id}");
        }
    }

    #[test]
    fn test_switch_sequence_keeps_every_buffer_intact() {
        let dir = TempDir::new().unwrap();
        let mut store = store();
        let mut tabs = TabController::new();
        let untitled = store.active_id().unwrap();
        let mut ids = Vec::new();
        for (name, text) in [("a.txt", "alpha\n"), ("b.txt", "beta\n"), ("c.txt", "gamma\n")] {
            let path = dir.path().join(name);
            fs::write(&path, text).unwrap();
            tabs.handle(&mut store, TabRequest::Open(path), None).unwrap();
            ids.push(store.active_id().unwrap());
        }
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        tabs.handle(&mut store, TabRequest::Close(Some(untitled)), None)
            .unwrap();
        tabs.handle(&mut store, TabRequest::SwitchTo(a), None).unwrap();
        for id in [a, b, c] {
            store.finish_install(id);
        }

        // A -> B, then a change for A that was queued before the switch
        tabs.handle(&mut store, TabRequest::SwitchTo(b), Some(edit(a, "alpha 1\n")))
            .unwrap();
        assert!(store.apply_edit(&edit(a, "alpha 2\n")));
        assert_contents(&store, &[(a, "alpha 2\n"), (b, "beta\n"), (c, "gamma\n")]);
        // B is still loading, so nothing lands in it yet
        assert!(!store.apply_edit(&edit(b, "stale\n")));
        assert_contents(&store, &[(b, "beta\n")]);
        store.finish_install(b);

        // B -> C with a late change for B
        tabs.handle(&mut store, TabRequest::SwitchTo(c), Some(edit(b, "beta 1\n")))
            .unwrap();
        store.apply_edit(&edit(b, "beta 2\n"));
        assert_contents(&store, &[(a, "alpha 2\n"), (b, "beta 2\n"), (c, "gamma\n")]);
        store.finish_install(c);

        // C -> A with a late change for C
        tabs.handle(&mut store, TabRequest::SwitchTo(a), Some(edit(c, "gamma 1\n")))
            .unwrap();
        store.apply_edit(&edit(c, "gamma 2\n"));
        assert_contents(&store, &[(a, "alpha 2\n"), (b, "beta 2\n"), (c, "gamma 2\n")]);
        store.finish_install(a);

        // Next: A -> B
        tabs.handle(&mut store, TabRequest::Next, Some(edit(a, "alpha 3\n")))
            .unwrap();
        assert_eq!(store.active_id(), Some(b));
        store.apply_edit(&edit(a, "alpha 4\n"));
        assert_contents(&store, &[(a, "alpha 4\n"), (b, "beta 2\n"), (c, "gamma 2\n")]);
        store.finish_install(b);

        // Previous: B -> A
        tabs.handle(&mut store, TabRequest::Previous, Some(edit(b, "beta 3\n")))
            .unwrap();
        assert_eq!(store.active_id(), Some(a));
        store.apply_edit(&edit(b, "beta 4\n"));
        assert_contents(&store, &[(a, "alpha 4\n"), (b, "beta 4\n"), (c, "gamma 2\n")]);
        store.finish_install(a);

        // JumpTo(3): A -> C
        tabs.handle(&mut store, TabRequest::JumpTo(3), Some(edit(a, "alpha 5\n")))
            .unwrap();
        assert_eq!(store.active_id(), Some(c));
        store.apply_edit(&edit(a, "alpha 6\n"));
        assert_contents(&store, &[(a, "alpha 6\n"), (b, "beta 4\n"), (c, "gamma 2\n")]);
        for id in [a, b, c] {
            assert!(store.get(id).unwrap().is_dirty());
        }
    }

    #[test]
    fn test_quit_with_no_dirty_buffers_quits() {
        let mut store = store();
        let mut tabs = TabController::new();
        assert_eq!(tabs.handle(&mut store, TabRequest::Quit, None).unwrap(), Effect::Quit);
    }

    #[test]
    fn test_quit_walks_dirty_buffers_in_tab_order() {
        let mut store = store();
        let mut tabs = TabController::new();
        let first = store.active_id().unwrap();
        tabs.handle(&mut store, TabRequest::New, None).unwrap();
        let second = store.active_id().unwrap();
        type_into(&mut store, first, "one");
        type_into(&mut store, second, "two");

        assert_eq!(
            tabs.handle(&mut store, TabRequest::Quit, None).unwrap(),
            Effect::Confirm(first)
        );
        assert_eq!(
            tabs.resolve(&mut store, ConfirmChoice::Discard).unwrap(),
            Effect::Confirm(second)
        );
        assert_eq!(
            tabs.resolve(&mut store, ConfirmChoice::Discard).unwrap(),
            Effect::Quit
        );
    }

    #[test]
    fn test_quit_aborted_by_first_cancel() {
        let mut store = store();
        let mut tabs = TabController::new();
        let first = store.active_id().unwrap();
        tabs.handle(&mut store, TabRequest::New, None).unwrap();
        let second = store.active_id().unwrap();
        type_into(&mut store, first, "one");
        type_into(&mut store, second, "two");

        tabs.handle(&mut store, TabRequest::Quit, None).unwrap();
        let result = tabs.resolve(&mut store, ConfirmChoice::Cancel);
        assert!(matches!(result, Err(EditorError::ConfirmationAborted)));
        assert_eq!(tabs.state(), &TabState::Idle);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_untitled_prompts_for_path() {
        let mut store = store();
        let mut tabs = TabController::new();
        let id = store.active_id().unwrap();
        assert_eq!(
            tabs.handle(&mut store, TabRequest::Save, None).unwrap(),
            Effect::PromptSavePath(id)
        );
        assert_eq!(tabs.state(), &TabState::Idle);
    }
}
