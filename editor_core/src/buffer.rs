//! Text buffer implementation using ropey, with one style per character.

use crate::error::BufferError;
use crate::syntax::TokenStyle;
use ropey::Rope;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::ops::Range;
use std::path::Path;

/// The style side of a buffer, as seen by the highlight applier.
pub trait StyledBuffer {
    /// Returns the total number of characters in the buffer.
    fn len_chars(&self) -> usize;

    /// Returns `len` characters starting at `start`.
    fn text(&self, start: usize, len: usize) -> Result<String, BufferError>;

    /// Styles `len` characters starting at `offset`.
    fn set_style(
        &mut self,
        offset: usize,
        len: usize,
        style: TokenStyle,
    ) -> Result<(), BufferError>;
}

/// Whether a change added or removed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Removed,
}

/// Notification of one completed buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferChange {
    /// Character offset where the change happened.
    pub offset: usize,
    /// Number of characters inserted or removed.
    pub length: usize,
    pub kind: ChangeKind,
    /// The inserted text, or the text that was removed.
    pub text: String,
}

/// A text buffer backed by a rope data structure.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    styles: Vec<TokenStyle>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            styles: Vec::new(),
        }
    }

    /// Creates an unstyled text buffer from a string.
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let styles = vec![TokenStyle::Default; rope.len_chars()];
        Self { rope, styles }
    }

    /// Loads a text buffer from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let rope = Rope::from_reader(reader)?;
        let styles = vec![TokenStyle::Default; rope.len_chars()];
        Ok(Self { rope, styles })
    }

    /// Saves the buffer to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.rope.write_to(&mut writer)?;
        Ok(())
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The underlying rope. Cloning it is cheap, which makes it a snapshot.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Inserts `text` at `offset`. New characters get the default style.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<BufferChange, BufferError> {
        self.check(offset, offset)?;
        let length = text.chars().count();
        self.rope.insert(offset, text);
        self.styles
            .splice(offset..offset, std::iter::repeat(TokenStyle::Default).take(length));
        Ok(BufferChange {
            offset,
            length,
            kind: ChangeKind::Inserted,
            text: text.to_string(),
        })
    }

    /// Removes `length` characters starting at `offset`.
    pub fn remove(&mut self, offset: usize, length: usize) -> Result<BufferChange, BufferError> {
        let end = offset.saturating_add(length);
        self.check(offset, end)?;
        let text = self.rope.slice(offset..end).to_string();
        self.rope.remove(offset..end);
        self.styles.drain(offset..end);
        Ok(BufferChange {
            offset,
            length,
            kind: ChangeKind::Removed,
            text,
        })
    }

    /// Replaces the whole contents and clears all styles.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    pub fn style_at(&self, char_idx: usize) -> Option<TokenStyle> {
        self.styles.get(char_idx).copied()
    }

    pub fn styles(&self) -> &[TokenStyle] {
        &self.styles
    }

    /// Groups consecutive characters of the same style.
    pub fn style_runs(&self) -> Vec<(Range<usize>, TokenStyle)> {
        let mut runs: Vec<(Range<usize>, TokenStyle)> = Vec::new();
        for (index, &style) in self.styles.iter().enumerate() {
            match runs.last_mut() {
                Some((range, last)) if *last == style => range.end = index + 1,
                _ => runs.push((index..index + 1, style)),
            }
        }
        runs
    }

    /// Returns the entire buffer as a string.
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn check(&self, start: usize, end: usize) -> Result<(), BufferError> {
        let len = self.len_chars();
        if start > end || end > len {
            return Err(BufferError::OutOfRange { start, end, len });
        }
        Ok(())
    }
}

impl StyledBuffer for TextBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn text(&self, start: usize, len: usize) -> Result<String, BufferError> {
        let end = start.saturating_add(len);
        self.check(start, end)?;
        Ok(self.rope.slice(start..end).to_string())
    }

    fn set_style(
        &mut self,
        offset: usize,
        len: usize,
        style: TokenStyle,
    ) -> Result<(), BufferError> {
        let end = offset.saturating_add(len);
        self.check(offset, end)?;
        self.styles[offset..end].fill(style);
        Ok(())
    }
}
