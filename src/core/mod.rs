//! # Core Session Logic
//!
//! This module contains Scribe's buffer and terminal logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • BufferStore + tabs   │
//!                    │  • CommandRunner        │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │  process   │
//!            │  Adapter   │            │  executor  │
//!            │ (ratatui)  │            │  (tokio)   │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`buffer`] / [`store`]: documents and their tab order
//! - [`tabs`]: new/close/switch/quit transitions and the confirmation flow
//! - [`runner`] / [`process`]: the embedded command runner
//! - [`session`]: open-file persistence across restarts

pub mod action;
pub mod buffer;
pub mod config;
pub mod error;
pub mod language;
pub mod process;
pub mod runner;
pub mod session;
pub mod state;
pub mod store;
pub mod tabs;
