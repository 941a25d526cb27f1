//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, endpoint and status message
//! - `SubmitBar`: submit button or spinner, verdict glyph, key hints
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `CodeEditor`: the source buffer; emits `EditorEvent::Changed`
//! - `OutputPane`: editable result text over `OutputPaneState`; emits `OutputEvent::Changed`
//!
//! Each component file keeps its state types, event types, rendering,
//! event handling and tests together.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs
//! ├── submit_bar.rs
//! ├── output_pane.rs
//! └── editor/          (CodeEditor, line math, syntect highlighting)
//! ```

pub mod editor;
pub mod output_pane;
pub mod submit_bar;
mod title_bar;

pub use editor::{CodeEditor, EditorEvent};
pub use output_pane::{OutputEvent, OutputPane, OutputPaneState};
pub use submit_bar::SubmitBar;
pub use title_bar::TitleBar;
