//! Editor Core - incremental syntax highlighting for a live text buffer.
//!
//! This crate contains the buffer, undo history and highlighting engine
//! without any dependencies on windowing or rendering systems.

pub mod buffer;
pub mod editor;
pub mod error;
pub mod filter;
pub mod history;
pub mod settings;
pub mod syntax;

pub use buffer::{BufferChange, ChangeKind, StyledBuffer, TextBuffer};
pub use editor::{Editor, HighlightTask};
pub use error::{BufferError, EditorError, HighlightError};
pub use filter::TabsToSpaces;
pub use history::{EditOperation, History};
pub use settings::Settings;
pub use syntax::{HighlightStateRegistry, SyntaxHighlighter, Theme, TokenStyle};
