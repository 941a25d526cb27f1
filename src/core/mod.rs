//! # Core Application Logic
//!
//! This module contains runpad's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • submission driver    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Headless  │      │  Executor  │
//!     │  Adapter   │      │   (--run)  │      │   (HTTP)   │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`submission`]: Status classification and the persist → execute → interpret cycle
//! - [`diagnostics`]: Syntax error line extraction
//! - [`navigation`]: Editor navigation requests and the `EditorAdapter` seam
//! - [`draft`]: Draft text persistence
//! - [`config`]: Settings resolution

pub mod action;
pub mod config;
pub mod diagnostics;
pub mod draft;
pub mod navigation;
pub mod state;
pub mod submission;
