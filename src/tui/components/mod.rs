//! # TUI Components
//!
//! UI pieces of the editor window. They follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built from core state every frame and thrown away:
//! - `TabBar`: open buffers in tab order, dirty markers
//! - `StatusBar`: active file, cursor position, language, status message
//! - `ConfirmDialog`: Save / Discard / Cancel overlay
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state in `TuiState`, a transient wrapper for rendering:
//! - `EditorState` / `EditorView`: the editing surface
//! - `TerminalPanelState` / `TerminalPanel`: command input and output log
//! - `PathPromptState` / `PathPrompt`: file path entry for Open and Save As
//!
//! Each file holds the component's state, event type, rendering, and tests.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── tab_bar.rs
//! ├── editor_view.rs
//! ├── terminal_panel.rs
//! ├── status_bar.rs
//! ├── confirm_dialog.rs
//! └── path_prompt.rs
//! ```

pub mod confirm_dialog;
pub mod editor_view;
pub mod path_prompt;
pub mod status_bar;
pub mod tab_bar;
pub mod terminal_panel;

pub use confirm_dialog::ConfirmDialog;
pub use editor_view::{EditorEvent, EditorState, EditorView};
pub use path_prompt::{PathPrompt, PathPromptState, PromptEvent, PromptPurpose};
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
pub use terminal_panel::{TerminalEvent, TerminalPanel, TerminalPanelState};
