//! Incremental syntax highlighter.
//!
//! For every edit the highlighter re-lexes the smallest run of whole lines
//! that can have changed, keeps the [`RegionIndex`] of multi-line constructs
//! in step with the text, and paints the re-lexed rows into the buffer.
//!
//! The region index is the only state kept between edits. Row buckets live
//! in [`FileHighlightState`] only between [`SyntaxHighlighter::relex`] and
//! [`SyntaxHighlighter::apply`].

use super::lexer::{DefaultLexer, Lexer};
use super::parser::{DefaultParser, Parser};
use super::region::{Region, RegionIndex};
use super::rows::RowBuckets;
use super::rules::StyleRules;
use super::theme::TokenStyle;
use super::token::{Fragment, MultilineKind};
use crate::buffer::{BufferChange, ChangeKind, StyledBuffer};
use crate::error::HighlightError;
use ropey::Rope;
use std::ops::Range;

/// How far past the end of the file an unclosed construct's region extends,
/// so that edits at the very end still intersect it.
pub const SENTINEL_PAD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Remove,
}

/// One buffer edit, in the coordinates of the text before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub length: usize,
    pub kind: EditKind,
}

impl Edit {
    pub fn insert(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            kind: EditKind::Insert,
        }
    }

    pub fn remove(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            kind: EditKind::Remove,
        }
    }

    /// Net change in text length.
    pub fn delta(&self) -> isize {
        match self.kind {
            EditKind::Insert => self.length as isize,
            EditKind::Remove => -(self.length as isize),
        }
    }

    /// Maps an offset in the text before the edit to the text after it.
    fn map_forward(&self, offset: usize) -> usize {
        if offset < self.offset {
            return offset;
        }
        match self.kind {
            EditKind::Insert => offset + self.length,
            EditKind::Remove => offset.saturating_sub(self.length).max(self.offset),
        }
    }

    /// Maps a range of the text before the edit to the text after it.
    pub(crate) fn map_range(&self, range: Range<usize>) -> Range<usize> {
        self.map_forward(range.start)..self.map_forward(range.end)
    }

    /// Maps an offset after the edited text back to the text before the edit.
    fn map_back(&self, offset: usize) -> usize {
        match self.kind {
            EditKind::Insert => offset.saturating_sub(self.length).max(self.offset),
            EditKind::Remove => offset + self.length,
        }
    }
}

impl From<&BufferChange> for Edit {
    fn from(change: &BufferChange) -> Self {
        match change.kind {
            ChangeKind::Inserted => Edit::insert(change.offset, change.length),
            ChangeKind::Removed => Edit::remove(change.offset, change.length),
        }
    }
}

/// The text that was re-lexed for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelexWindow {
    /// Start offset, always at a line start.
    pub start: usize,
    /// End offset, at a line end or the end of the file.
    pub end: usize,
    pub start_row: usize,
    pub end_row: usize,
    /// Whether an unclosed construct forced a re-lex through end of file.
    pub tail_rebuilt: bool,
}

/// Highlighting state of one open file.
#[derive(Debug, Clone, Default)]
pub struct FileHighlightState {
    rows: RowBuckets,
    regions: RegionIndex,
}

impl FileHighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row buckets of the last re-lex that has not been painted yet.
    pub fn rows(&self) -> &RowBuckets {
        &self.rows
    }

    pub fn regions(&self) -> &RegionIndex {
        &self.regions
    }
}

/// Incremental highlighter over a pluggable lexer and parser.
pub struct SyntaxHighlighter<L = DefaultLexer, P = DefaultParser> {
    lexer: L,
    parser: P,
    rules: StyleRules,
    enabled: bool,
}

impl SyntaxHighlighter {
    /// Creates a highlighter with the bundled lexer, parser and rules.
    pub fn new() -> Self {
        Self::with_parts(DefaultLexer::new(), DefaultParser::new(), StyleRules::standard())
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Lexer, P: Parser> SyntaxHighlighter<L, P> {
    /// Creates a highlighter. Diagnostics of `lexer` and `parser` are turned
    /// off, since partial windows routinely look malformed.
    pub fn with_parts(mut lexer: L, mut parser: P, rules: StyleRules) -> Self {
        lexer.set_error_reporting(false);
        parser.set_error_reporting(false);
        Self {
            lexer,
            parser,
            rules,
            enabled: true,
        }
    }

    /// Turns highlighting on or off. While off, every request is a no-op
    /// and the region index goes stale, so turning it back on must be
    /// followed by a whole-file highlight.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Re-lexes and repaints what `edit` may have changed.
    ///
    /// `text` is the text right after `edit`; `state` must be in step with
    /// the text right before it. Returns `None` when highlighting is off.
    pub fn highlight_region<B: StyledBuffer>(
        &mut self,
        text: &Rope,
        edit: Edit,
        state: &mut FileHighlightState,
        buffer: &mut B,
    ) -> Result<Option<RelexWindow>, HighlightError> {
        if !self.enabled {
            return Ok(None);
        }
        let window = self.relex(text, edit, state)?;
        self.apply(text, state, buffer);
        Ok(Some(window))
    }

    /// Rebuilds the region index from scratch and repaints every row.
    pub fn highlight_entire_file<B: StyledBuffer>(
        &mut self,
        text: &Rope,
        state: &mut FileHighlightState,
        buffer: &mut B,
    ) -> Result<Option<RelexWindow>, HighlightError> {
        if !self.enabled {
            return Ok(None);
        }
        let window = self.relex_entire_file(text, state)?;
        self.apply(text, state, buffer);
        Ok(Some(window))
    }

    /// Lexes all of `text` and rebuilds the region index from scratch. The
    /// row buckets are left in `state` for [`Self::apply`].
    pub fn relex_entire_file(
        &mut self,
        text: &Rope,
        state: &mut FileHighlightState,
    ) -> Result<RelexWindow, HighlightError> {
        let len = text.len_chars();
        let end_row = text.len_lines() - 1;
        state.regions.clear();
        state.rows = self.lex_rows(text, 0, len, 0, end_row)?;
        if let Some((open, kind)) = derive_regions(&state.rows, text, &mut state.regions)? {
            state
                .regions
                .insert(Region::new(open, len + SENTINEL_PAD, kind))?;
        }
        log::debug!(
            "highlighted {} rows, {} regions",
            end_row + 1,
            state.regions.len()
        );

        Ok(RelexWindow {
            start: 0,
            end: len,
            start_row: 0,
            end_row,
            tail_rebuilt: false,
        })
    }

    /// Repaints the whole lines covering `range` from the current text.
    ///
    /// The region index must already be in step with `text`. The lines are
    /// widened to every multi-line construct they touch, so lexing starts
    /// and ends outside any construct. Regions are left unchanged.
    pub fn repaint<B: StyledBuffer>(
        &mut self,
        text: &Rope,
        range: Range<usize>,
        state: &mut FileHighlightState,
        buffer: &mut B,
    ) -> Result<Option<RelexWindow>, HighlightError> {
        if !self.enabled {
            return Ok(None);
        }
        let mut start = line_start(text, range.start);
        let mut end = line_end(text, range.end);
        loop {
            let (mut wider_start, mut wider_end) = (start, end);
            // The probe covers the line break but not the next line.
            for region in state.regions.intersecting(start..end + 1) {
                wider_start = wider_start.min(line_start(text, region.start));
                wider_end = wider_end.max(line_end(text, region.end));
            }
            if (wider_start, wider_end) == (start, end) {
                break;
            }
            start = wider_start;
            end = wider_end;
        }

        let start_row = text.char_to_line(start);
        let end_row = text.char_to_line(end);
        state.rows = self.lex_rows(text, start, end, start_row, end_row)?;
        log::debug!("repainting rows {}..={} ({}..{})", start_row, end_row, start, end);
        self.apply(text, state, buffer);

        Ok(Some(RelexWindow {
            start,
            end,
            start_row,
            end_row,
            tail_rebuilt: false,
        }))
    }

    /// Re-lexes the window affected by `edit` and brings the region index in
    /// step with `text`. The new row buckets are left in `state` for
    /// [`Self::apply`].
    pub fn relex(
        &mut self,
        text: &Rope,
        edit: Edit,
        state: &mut FileHighlightState,
    ) -> Result<RelexWindow, HighlightError> {
        let len = text.len_chars();
        let offset = edit.offset.min(len);
        let edit_end = match edit.kind {
            EditKind::Insert => offset.saturating_add(edit.length).min(len),
            EditKind::Remove => offset,
        };

        // A break inserted at column 0 belongs to the line above.
        let anchor = if offset > 0 && text.char(offset - 1) == '\n' {
            offset - 1
        } else {
            offset
        };
        let mut start = line_start(text, anchor);
        let mut end = line_end(text, edit_end);

        // Stored regions are still in pre-edit coordinates.
        loop {
            let touched = state.regions.remove_intersecting(start..edit.map_back(end));
            if touched.is_empty() {
                break;
            }
            for region in touched {
                start = start.min(line_start(text, edit.map_forward(region.start)));
                end = end.max(line_end(text, edit.map_forward(region.end)));
            }
        }
        state.regions.shift_from(edit.map_back(end), edit.delta());

        let start_row = text.char_to_line(start);
        let end_row = text.char_to_line(end);
        state.rows = self.lex_rows(text, start, end, start_row, end_row)?;

        let mut window = RelexWindow {
            start,
            end,
            start_row,
            end_row,
            tail_rebuilt: false,
        };
        if let Some((open, kind)) = derive_regions(&state.rows, text, &mut state.regions)? {
            if end >= len {
                state
                    .regions
                    .insert(Region::new(open, len + SENTINEL_PAD, kind))?;
            } else {
                self.rebuild_tail(text, state, &mut window)?;
            }
        }

        log::debug!(
            "re-lexed rows {}..={} ({}..{}) for {:?}",
            window.start_row,
            window.end_row,
            window.start,
            window.end,
            edit
        );
        Ok(window)
    }

    /// Paints the pending row buckets into `buffer` and drops them.
    ///
    /// Each row, line break included, is reset to the default style before
    /// its tokens are painted. Spans the buffer does not have are skipped.
    pub fn apply<B: StyledBuffer>(
        &self,
        text: &Rope,
        state: &mut FileHighlightState,
        buffer: &mut B,
    ) {
        for (row, tokens) in state.rows.iter() {
            if row >= text.len_lines() {
                break;
            }
            let row_start = text.line_to_char(row);
            let row_end = text.line_to_char(row + 1);
            paint(buffer, row_start, row_end - row_start, TokenStyle::Default);

            for token in tokens {
                let style = self.rules.resolve(token);
                paint(
                    buffer,
                    row_start + token.location.column,
                    token.len_chars(),
                    style,
                );
            }
        }
        state.rows.clear();
    }

    /// Re-lexes from the unclosed opening token in the window to the end of
    /// the file, replacing everything cached from that token on.
    fn rebuild_tail(
        &mut self,
        text: &Rope,
        state: &mut FileHighlightState,
        window: &mut RelexWindow,
    ) -> Result<(), HighlightError> {
        let len = text.len_chars();
        let end_row = text.len_lines() - 1;
        let opening = state.rows.unclosed_opening()?;
        let open = text.line_to_char(opening.row) + opening.column;

        let dropped = state.regions.remove_from(open);
        let mut tail = self.lex_rows(text, open, len, opening.row, end_row)?;
        tail.offset_first_row(opening.column);
        if let Some((open, kind)) = derive_regions(&tail, text, &mut state.regions)? {
            state
                .regions
                .insert(Region::new(open, len + SENTINEL_PAD, kind))?;
        }
        state.rows.splice_tail(opening, tail);

        log::debug!(
            "unclosed construct at {} extends the window to row {}, {} stale regions dropped",
            opening,
            end_row,
            dropped
        );
        window.end = len;
        window.end_row = end_row;
        window.tail_rebuilt = true;
        Ok(())
    }

    fn lex_rows(
        &mut self,
        text: &Rope,
        start: usize,
        end: usize,
        start_row: usize,
        end_row: usize,
    ) -> Result<RowBuckets, HighlightError> {
        let source = text.slice(start..end).to_string();
        self.lexer.reset();
        self.parser.reset();
        let mut output = self.lexer.lex(&source, start_row);
        self.parser.parse(&mut output.statements);
        let (tokens, invalid) = output.into_parts();
        RowBuckets::from_tokens(tokens, invalid, start_row, end_row)
    }
}

/// Adds a region for every construct that opens and closes within `rows`.
///
/// Returns the offset and kind of a construct still open after the last row.
fn derive_regions(
    rows: &RowBuckets,
    text: &Rope,
    regions: &mut RegionIndex,
) -> Result<Option<(usize, MultilineKind)>, HighlightError> {
    let mut open: Option<(usize, MultilineKind)> = None;

    for (row, tokens) in rows.iter() {
        let row_start = text.line_to_char(row);
        for token in tokens {
            let Some(multiline) = token.multiline() else {
                continue;
            };
            let offset = row_start + token.location.column;

            match (multiline.fragment, open) {
                (Fragment::Opening, None) => open = Some((offset, multiline.kind)),
                (_, Some((_, kind))) if kind != multiline.kind => {
                    return Err(HighlightError::MismatchedMultiline {
                        expected: kind,
                        found: multiline.kind,
                        location: token.location,
                    });
                }
                (Fragment::Middle, Some(_)) => {}
                (Fragment::Closing, Some((start, kind))) => {
                    regions.insert(Region::new(start, offset + token.len_chars(), kind))?;
                    open = None;
                }
                (fragment, _) => {
                    return Err(HighlightError::UnexpectedFragment {
                        kind: multiline.kind,
                        fragment,
                        location: token.location,
                    });
                }
            }
        }
    }
    Ok(open)
}

fn paint<B: StyledBuffer>(buffer: &mut B, offset: usize, len: usize, style: TokenStyle) {
    if let Err(err) = buffer.set_style(offset, len, style) {
        log::trace!("skipping stale span: {}", err);
    }
}

fn line_start(text: &Rope, offset: usize) -> usize {
    text.line_to_char(text.char_to_line(offset.min(text.len_chars())))
}

/// Offset of the line break ending the line of `offset`, or the end of text.
fn line_end(text: &Rope, offset: usize) -> usize {
    let line = text.char_to_line(offset.min(text.len_chars()));
    if line + 1 < text.len_lines() {
        text.line_to_char(line + 1) - 1
    } else {
        text.len_chars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use crate::syntax::lexer::LexOutput;
    use crate::syntax::token::{Location, MultilineToken, Token, TokenKind};

    /// A buffer plus its highlight state, kept in step edit by edit.
    struct Fixture {
        highlighter: SyntaxHighlighter,
        state: FileHighlightState,
        buffer: TextBuffer,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            let mut fixture = Self {
                highlighter: SyntaxHighlighter::new(),
                state: FileHighlightState::new(),
                buffer: TextBuffer::from_text(text),
            };
            let rope = fixture.buffer.rope().clone();
            fixture
                .highlighter
                .highlight_entire_file(&rope, &mut fixture.state, &mut fixture.buffer)
                .unwrap();
            fixture
        }

        fn insert(&mut self, offset: usize, text: &str) -> RelexWindow {
            let change = self.buffer.insert(offset, text).unwrap();
            self.highlight(&change)
        }

        fn remove(&mut self, offset: usize, length: usize) -> RelexWindow {
            let change = self.buffer.remove(offset, length).unwrap();
            self.highlight(&change)
        }

        fn highlight(&mut self, change: &BufferChange) -> RelexWindow {
            let rope = self.buffer.rope().clone();
            self.highlighter
                .highlight_region(&rope, Edit::from(change), &mut self.state, &mut self.buffer)
                .unwrap()
                .unwrap()
        }

        fn regions(&self) -> Vec<(usize, usize)> {
            self.state.regions().iter().map(|r| (r.start, r.end)).collect()
        }

        /// Regions and styles a full re-highlight of the current text gives.
        fn expected(&self) -> (Vec<(usize, usize)>, Vec<TokenStyle>) {
            let fresh = Fixture::new(&self.buffer.to_string());
            (fresh.regions(), fresh.buffer.styles().to_vec())
        }

        fn assert_matches_full(&self) {
            let (regions, styles) = self.expected();
            assert_eq!(self.regions(), regions);
            assert_eq!(self.buffer.styles(), styles.as_slice());
        }
    }

    #[test]
    fn test_edit_mapping() {
        let insert = Edit::insert(5, 3);
        assert_eq!(insert.map_forward(4), 4);
        assert_eq!(insert.map_forward(5), 8);
        assert_eq!(insert.map_back(10), 7);

        let remove = Edit::remove(5, 3);
        assert_eq!(remove.delta(), -3);
        assert_eq!(remove.map_forward(6), 5);
        assert_eq!(remove.map_forward(9), 6);
        assert_eq!(remove.map_back(6), 9);
    }

    #[test]
    fn test_minimal_window() {
        let mut fixture = Fixture::new("ab\ncd\nef");
        let window = fixture.insert(4, "x");

        assert_eq!(
            window,
            RelexWindow {
                start: 3,
                end: 6,
                start_row: 1,
                end_row: 1,
                tail_rebuilt: false,
            }
        );
        fixture.assert_matches_full();
    }

    #[test]
    fn test_break_at_line_start_anchors_above() {
        let mut fixture = Fixture::new("ab\ncd\nef");
        let window = fixture.insert(3, "\n");
        assert_eq!(window.start_row, 0);
        assert_eq!(window.end_row, 2);
        fixture.assert_matches_full();
    }

    #[test]
    fn test_idempotence() {
        let mut fixture = Fixture::new("a ~: one\ntwo :~ b\n`name` c!(1)");
        let rope = fixture.buffer.rope().clone();
        let edit = Edit::insert(10, 0);

        let first = fixture.highlighter.relex(&rope, edit, &mut fixture.state).unwrap();
        let rows = fixture.state.rows().clone();
        let regions = fixture.regions();
        fixture.highlighter.apply(&rope, &mut fixture.state, &mut fixture.buffer);
        let styles = fixture.buffer.styles().to_vec();

        let second = fixture.highlighter.relex(&rope, edit, &mut fixture.state).unwrap();
        assert_eq!(first, second);
        assert_eq!(fixture.state.rows(), &rows);
        assert_eq!(fixture.regions(), regions);
        fixture.highlighter.apply(&rope, &mut fixture.state, &mut fixture.buffer);
        assert_eq!(fixture.buffer.styles(), styles.as_slice());
        assert!(fixture.state.rows().is_empty());
    }

    #[test]
    fn test_round_trip_restores_region() {
        let mut fixture = Fixture::new("a\n~: one\ntwo\nthree :~\nb");
        assert_eq!(fixture.regions(), vec![(2, 21)]);

        let window = fixture.remove(10, 1);
        assert_eq!(window.start_row, 1);
        assert_eq!(window.end_row, 3);
        assert_eq!(fixture.regions(), vec![(2, 20)]);

        fixture.insert(10, "w");
        assert_eq!(fixture.regions(), vec![(2, 21)]);
        fixture.assert_matches_full();
    }

    #[test]
    fn test_tail_detection() {
        let mut fixture = Fixture::new("a b\nc\nd");
        let window = fixture.insert(2, "~: ");

        assert!(window.tail_rebuilt);
        assert_eq!(window.end, 10);
        assert_eq!(window.end_row, 2);
        assert_eq!(fixture.regions(), vec![(2, 10 + SENTINEL_PAD)]);
        fixture.assert_matches_full();
    }

    #[test]
    fn test_unclosed_opener_on_last_line() {
        let mut fixture = Fixture::new("a\nb");
        let window = fixture.insert(3, " ``");

        assert_eq!(window.end, 6);
        assert!(!window.tail_rebuilt);
        assert_eq!(fixture.regions(), vec![(4, 6 + SENTINEL_PAD)]);
        fixture.assert_matches_full();
    }

    #[test]
    fn test_sentinel_captures_tail_edits() {
        let mut fixture = Fixture::new("x\n~: note\nmore");
        let len = fixture.buffer.len_chars();
        assert_eq!(fixture.regions(), vec![(2, len + SENTINEL_PAD)]);
        assert!(fixture.state.regions().find_intersecting(10..len).is_some());

        let window = fixture.insert(len, "!");
        assert_eq!(window.start_row, 1);
        assert_eq!(fixture.regions(), vec![(2, len + 1 + SENTINEL_PAD)]);
        fixture.assert_matches_full();
    }

    #[test]
    fn test_closing_an_open_comment() {
        let mut fixture = Fixture::new("a\n~: x\nb\nc");
        let window = fixture.insert(8, " :~");
        assert_eq!(window.start_row, 1);
        assert_eq!(fixture.regions(), vec![(2, 11)]);
        fixture.assert_matches_full();
    }

    #[test]
    fn test_regions_after_window_shift() {
        let mut fixture = Fixture::new("a\nb\n~: x\ny :~");
        assert_eq!(fixture.regions(), vec![(4, 13)]);

        let window = fixture.insert(0, "zz");
        assert_eq!(window.end_row, 0);
        assert_eq!(fixture.regions(), vec![(6, 15)]);

        fixture.remove(0, 2);
        assert_eq!(fixture.regions(), vec![(4, 13)]);
        fixture.assert_matches_full();
    }

    #[test]
    fn test_painted_styles() {
        let fixture = Fixture::new("import Foo\n~: c\n:~ x!");
        let style = |offset: usize| fixture.buffer.style_at(offset).unwrap();

        assert_eq!(style(0), TokenStyle::Keyword);
        assert_eq!(style(6), TokenStyle::Default);
        assert_eq!(style(7), TokenStyle::Type);
        assert_eq!(style(11), TokenStyle::Comment);
        assert_eq!(style(16), TokenStyle::Comment);
        assert_eq!(style(19), TokenStyle::Function);
    }

    #[test]
    fn test_repaint_clears_stale_styles() {
        let mut fixture = Fixture::new("abc def");
        fixture.remove(3, 1);
        assert_eq!(fixture.buffer.to_string(), "abcdef");
        assert!(fixture
            .buffer
            .styles()
            .iter()
            .all(|&s| s == TokenStyle::Variable));

        fixture.insert(3, " ");
        assert_eq!(fixture.buffer.style_at(3), Some(TokenStyle::Default));
    }

    #[test]
    fn test_repaint_widens_to_regions() {
        let mut fixture = Fixture::new("a\n~: x\ny :~ b\nc");
        let (_, expected) = fixture.expected();
        let len = fixture.buffer.len_chars();
        fixture.buffer.set_style(0, len, TokenStyle::Keyword).unwrap();

        let rope = fixture.buffer.rope().clone();
        let window = fixture
            .highlighter
            .repaint(&rope, 5..6, &mut fixture.state, &mut fixture.buffer)
            .unwrap()
            .unwrap();
        assert_eq!((window.start, window.end), (2, 13));
        assert_eq!((window.start_row, window.end_row), (1, 2));
        assert_eq!(fixture.regions(), vec![(2, 11)]);

        let styles = fixture.buffer.styles();
        assert_eq!(&styles[2..14], &expected[2..14]);
        assert_eq!(styles[6], TokenStyle::Default);
        assert_eq!(styles[13], TokenStyle::Default);
        assert_eq!(styles[0], TokenStyle::Keyword);
        assert_eq!(styles[14], TokenStyle::Keyword);
    }

    #[test]
    fn test_stale_spans_are_skipped() {
        let mut highlighter = SyntaxHighlighter::new();
        let mut state = FileHighlightState::new();
        let mut buffer = TextBuffer::from_text("ab");
        let rope = Rope::from_str("longer text\nthan buffer");

        let window = highlighter
            .highlight_entire_file(&rope, &mut state, &mut buffer)
            .unwrap();
        assert!(window.is_some());
        assert!(buffer.styles().iter().all(|&s| s == TokenStyle::Default));
    }

    #[test]
    fn test_disabled_is_noop() {
        let mut fixture = Fixture::new("a ~: b :~");
        fixture.highlighter.set_enabled(false);
        let change = fixture.buffer.insert(0, "x").unwrap();
        let rope = fixture.buffer.rope().clone();

        let result = fixture
            .highlighter
            .highlight_region(&rope, Edit::from(&change), &mut fixture.state, &mut fixture.buffer)
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(fixture.buffer.style_at(0), Some(TokenStyle::Default));
    }

    /// Replays a fixed token stream regardless of input.
    struct ScriptedLexer(Vec<Token>);

    impl Lexer for ScriptedLexer {
        fn lex(&mut self, _text: &str, _line_offset: usize) -> LexOutput {
            LexOutput {
                statements: vec![self.0.clone()],
                invalid: Vec::new(),
            }
        }

        fn reset(&mut self) {}

        fn set_error_reporting(&mut self, _enabled: bool) {}
    }

    fn scripted(tokens: Vec<Token>) -> SyntaxHighlighter<ScriptedLexer, DefaultParser> {
        SyntaxHighlighter::with_parts(
            ScriptedLexer(tokens),
            DefaultParser::new(),
            StyleRules::standard(),
        )
    }

    fn fragment(kind: MultilineKind, fragment: Fragment, row: usize) -> Token {
        let kind = TokenKind::Multiline(MultilineToken::new(kind, fragment));
        Token::new(kind, "x", Location::new(row, 0))
    }

    #[test]
    fn test_middle_without_opening_fails() {
        let mut highlighter = scripted(vec![fragment(MultilineKind::Comment, Fragment::Middle, 0)]);
        let rope = Rope::from_str("x\ny");
        let err = highlighter
            .highlight_entire_file(&rope, &mut FileHighlightState::new(), &mut TextBuffer::new())
            .unwrap_err();
        assert!(matches!(err, HighlightError::UnexpectedFragment { .. }));
    }

    #[test]
    fn test_mismatched_kinds_fail() {
        let mut highlighter = scripted(vec![
            fragment(MultilineKind::Comment, Fragment::Opening, 0),
            fragment(MultilineKind::String, Fragment::Closing, 1),
        ]);
        let rope = Rope::from_str("x\ny");
        let err = highlighter
            .highlight_entire_file(&rope, &mut FileHighlightState::new(), &mut TextBuffer::new())
            .unwrap_err();
        assert!(matches!(
            err,
            HighlightError::MismatchedMultiline {
                expected: MultilineKind::Comment,
                found: MultilineKind::String,
                ..
            }
        ));
    }
}
