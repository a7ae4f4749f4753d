//! Syntax highlighting module.
//!
//! Provides incremental highlighting driven by a line-oriented lexer.

mod highlighter;
mod lexer;
mod parser;
mod region;
mod registry;
mod rows;
mod rules;
mod theme;
mod token;

pub use highlighter::{
    Edit, EditKind, FileHighlightState, RelexWindow, SyntaxHighlighter, SENTINEL_PAD,
};
pub use lexer::{DefaultLexer, LexOutput, Lexer};
pub use parser::{DefaultParser, Parser};
pub use region::{Region, RegionIndex};
pub use registry::HighlightStateRegistry;
pub use rows::RowBuckets;
pub use rules::{Category, Overload, StyleRules, TokenClass, TYPE_KEYWORDS};
pub use theme::{to_rgb8, Color, Theme, TokenStyle};
pub use token::{Fragment, Location, MultilineKind, MultilineToken, Token, TokenKind};
