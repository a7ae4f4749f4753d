//! Error types for the buffer, the highlighter and the editor session.

use crate::syntax::{Fragment, Location, MultilineKind, Region};
use std::io;
use thiserror::Error;

/// A buffer operation addressed text the buffer does not have.
///
/// Raised when an edit or a style span outlives the text it was computed
/// for, which is expected while queued highlight tasks catch up with edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("range {start}..{end} is outside the buffer (length {len})")]
    OutOfRange { start: usize, end: usize, len: usize },
}

/// The row buckets or the region index are internally inconsistent.
///
/// These are never recoverable: painting further would silently produce
/// output that disagrees with a full re-lex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    #[error("unexpected {fragment:?} fragment of {kind:?} at {location}")]
    UnexpectedFragment {
        kind: MultilineKind,
        fragment: Fragment,
        location: Location,
    },

    #[error("expected a {expected:?} fragment but found {found:?} at {location}")]
    MismatchedMultiline {
        expected: MultilineKind,
        found: MultilineKind,
        location: Location,
    },

    #[error("no opening token for the unclosed multi-line token at {location}")]
    MissingOpeningToken { location: Location },

    #[error("region {region} overlaps existing region {existing}")]
    OverlappingRegion { region: Region, existing: Region },

    #[error("token at {location} lies outside rows {start_row}..={end_row}")]
    TokenOutsideWindow {
        location: Location,
        start_row: usize,
        end_row: usize,
    },
}

/// Errors surfaced by the editor session.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Highlight(#[from] HighlightError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
