//! Row index: lexer output regrouped into one bucket per source line.

use super::token::{Location, Token};
use crate::error::HighlightError;

/// Tokens grouped by row, starting at `start_row`.
///
/// Every row in `start_row..=end_row()` has a bucket, including blank lines,
/// so `bucket(row)` is plain index arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBuckets {
    start_row: usize,
    rows: Vec<Vec<Token>>,
}

impl RowBuckets {
    /// Distributes `tokens` into buckets for `start_row..=end_row`.
    ///
    /// Lexically invalid tokens are merged back into location order so
    /// malformed input still gets painted.
    pub fn from_tokens(
        mut tokens: Vec<Token>,
        invalid: Vec<Token>,
        start_row: usize,
        end_row: usize,
    ) -> Result<Self, HighlightError> {
        // Statements already come out in order; only a merge needs a sort.
        if !invalid.is_empty() {
            tokens.extend(invalid);
            tokens.sort_by_key(|token| token.location);
        }

        if start_row >= end_row {
            return Ok(Self {
                start_row,
                rows: vec![tokens],
            });
        }

        let mut rows = vec![Vec::new(); end_row - start_row + 1];
        for token in tokens {
            let bucket = token
                .location
                .row
                .checked_sub(start_row)
                .and_then(|index| rows.get_mut(index))
                .ok_or(HighlightError::TokenOutsideWindow {
                    location: token.location,
                    start_row,
                    end_row,
                })?;
            bucket.push(token);
        }
        Ok(Self { start_row, rows })
    }

    pub fn start_row(&self) -> usize {
        self.start_row
    }

    /// Last row covered. Equal to `start_row` when empty.
    pub fn end_row(&self) -> usize {
        self.start_row + self.rows.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the bucket for an absolute row number.
    #[cfg(test)]
    fn bucket(&self, row: usize) -> Option<&[Token]> {
        row.checked_sub(self.start_row)
            .and_then(|index| self.rows.get(index))
            .map(Vec::as_slice)
    }

    /// Iterates `(absolute row, bucket)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Token])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(move |(index, row)| (self.start_row + index, row.as_slice()))
    }

    /// The last token of the last non-empty row.
    pub fn last_token(&self) -> Option<&Token> {
        self.rows.iter().rev().find_map(|row| row.last())
    }

    /// Walks back to the opening token of the construct left unclosed at
    /// the end of these rows and returns its location.
    ///
    /// An opening fragment always ends its row, so only row tails are checked.
    pub fn unclosed_opening(&self) -> Result<Location, HighlightError> {
        self.rows
            .iter()
            .rev()
            .filter_map(|row| row.last())
            .find(|token| token.multiline().is_some_and(|m| m.is_opening()))
            .map(|token| token.location)
            .ok_or_else(|| HighlightError::MissingOpeningToken {
                location: self
                    .last_token()
                    .map(|token| token.location)
                    .unwrap_or_default(),
            })
    }

    /// Adds `columns` to the column of every token in the first row.
    ///
    /// Used when the first row was lexed from the middle of a line.
    pub fn offset_first_row(&mut self, columns: usize) {
        if let Some(first) = self.rows.first_mut() {
            for token in first {
                token.location.column += columns;
            }
        }
    }

    /// Replaces everything from `from` onward with `tail`.
    ///
    /// Tokens of the row `from.row` that start before `from.column` are kept;
    /// the first row of `tail` is appended to them and every later row of
    /// `tail` replaces the cached rows after it.
    pub fn splice_tail(&mut self, from: Location, tail: RowBuckets) {
        let Some(index) = from.row.checked_sub(self.start_row) else {
            *self = tail;
            return;
        };
        self.rows.truncate(index + 1);
        self.rows.resize_with(index + 1, Vec::new);

        let mut tail_rows = tail.rows.into_iter();
        let row = &mut self.rows[index];
        row.retain(|token| token.location.column < from.column);
        if let Some(first) = tail_rows.next() {
            row.extend(first);
        }
        self.rows.extend(tail_rows);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
