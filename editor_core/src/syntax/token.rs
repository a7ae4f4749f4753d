//! Token model shared by the lexer, the row index and the highlighter.

use std::fmt;

/// Zero-based (row, column) location of a token. Columns count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub row: usize,
    pub column: usize,
}

impl Location {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Constructs whose text may cross line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultilineKind {
    /// `~: ... :~`
    Comment,
    /// ``` `` ... `` ```
    String,
}

/// Which part of a multi-line construct a token covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// From the opening delimiter to the end of its line.
    Opening,
    /// A whole line inside the construct.
    Middle,
    /// From the start of a line through the closing delimiter.
    Closing,
}

/// One line's worth of a multi-line construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MultilineToken {
    pub kind: MultilineKind,
    pub fragment: Fragment,
}

impl MultilineToken {
    pub fn new(kind: MultilineKind, fragment: Fragment) -> Self {
        Self { kind, fragment }
    }

    pub fn is_opening(&self) -> bool {
        self.fragment == Fragment::Opening
    }

    pub fn is_closing(&self) -> bool {
        self.fragment == Fragment::Closing
    }
}

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A lowercase identifier, or any `` `quoted identifier` ``.
    Reference { quoted: bool, called: bool },
    /// A capitalized identifier.
    TypeReference,
    /// A reserved word such as `import`.
    Keyword,
    /// `??`, `<>`, `--`, `++`
    ControlFlow,
    Operator,
    Punctuation,
    Separator,
    /// `@` and `#`
    FieldAccess,
    /// Identifiers made only of underscores.
    Sword,
    Number,
    Boolean,
    Null,
    Character,
    String,
    /// A comment that opens and closes on one line.
    Comment,
    Multiline(MultilineToken),
    /// Text the lexer could not classify.
    Invalid,
}

impl TokenKind {
    /// Returns the multi-line fragment info, if this kind has it.
    pub fn multiline(&self) -> Option<MultilineToken> {
        match self {
            TokenKind::Multiline(token) => Some(*token),
            _ => None,
        }
    }
}

/// A classified span of source text with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// Length of the token text in characters.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn multiline(&self) -> Option<MultilineToken> {
        self.kind.multiline()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) at {}", self.kind, self.text, self.location)
    }
}
