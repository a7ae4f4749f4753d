//! Lexer boundary and the bundled line-oriented lexer.
//!
//! The engine only relies on the [`Lexer`] trait: text in, statements of
//! located tokens out, plus a side list of text that could not be lexed.
//! [`DefaultLexer`] implements a small expression language whose block
//! comments (`~: ... :~`) and capture strings (``` `` ... `` ```) may span
//! several lines.

use super::token::{Fragment, Location, MultilineKind, MultilineToken, Token, TokenKind};

/// Output of one lex call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexOutput {
    /// Tokens grouped by statement, in source order.
    pub statements: Vec<Vec<Token>>,
    /// Lexically invalid tokens. These never appear in `statements`.
    pub invalid: Vec<Token>,
}

impl LexOutput {
    /// Flattens the statements back into one ordered token list.
    pub fn into_parts(self) -> (Vec<Token>, Vec<Token>) {
        let tokens = self.statements.into_iter().flatten().collect();
        (tokens, self.invalid)
    }
}

/// A lexer usable by the highlighter.
pub trait Lexer {
    /// Lexes `text`. Rows in the produced locations start at `line_offset`,
    /// columns are relative to the start of each line of `text`.
    fn lex(&mut self, text: &str, line_offset: usize) -> LexOutput;

    /// Clears any state left from a previous call.
    fn reset(&mut self);

    /// Enables or disables diagnostics for invalid input.
    ///
    /// The highlighter turns this off because it lexes partial windows.
    fn set_error_reporting(&mut self, enabled: bool);
}

const COMMENT_OPEN: &str = "~:";
const COMMENT_CLOSE: &str = ":~";
const STRING_DELIMITER: &str = "``";

const KEYWORDS: &[&str] = &["import", "package", "public", "private"];

/// Symbol table, searched longest match first.
const SYMBOLS: &[(&str, TokenKind)] = &[
    ("??", TokenKind::ControlFlow),
    ("<>", TokenKind::ControlFlow),
    ("--", TokenKind::ControlFlow),
    ("++", TokenKind::ControlFlow),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("==", TokenKind::Operator),
    ("=", TokenKind::Operator),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("*", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("%", TokenKind::Operator),
    ("<", TokenKind::Operator),
    (">", TokenKind::Operator),
    ("&", TokenKind::Operator),
    ("|", TokenKind::Operator),
    ("^", TokenKind::Operator),
    ("?", TokenKind::Operator),
    ("(", TokenKind::Punctuation),
    (")", TokenKind::Punctuation),
    ("[", TokenKind::Punctuation),
    ("]", TokenKind::Punctuation),
    ("{", TokenKind::Punctuation),
    ("}", TokenKind::Punctuation),
    (":", TokenKind::Punctuation),
    (".", TokenKind::Punctuation),
    ("!", TokenKind::Punctuation),
    (",", TokenKind::Separator),
    (";", TokenKind::Separator),
    ("@", TokenKind::FieldAccess),
    ("#", TokenKind::FieldAccess),
];

/// The bundled lexer.
#[derive(Debug, Default)]
pub struct DefaultLexer {
    report_errors: bool,
}

impl DefaultLexer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Lexer for DefaultLexer {
    fn lex(&mut self, text: &str, line_offset: usize) -> LexOutput {
        let mut scan = Scan::default();
        for (index, line) in text.split('\n').enumerate() {
            let chars: Vec<char> = line.chars().collect();
            scan.line(&chars, line_offset + index);
        }
        scan.end_statement();

        if self.report_errors {
            for token in &scan.output.invalid {
                log::warn!("unexpected character {:?} at {}", token.text, token.location);
            }
        }
        scan.output
    }

    /// Lines are scanned independently, so there is nothing to reset.
    fn reset(&mut self) {}

    fn set_error_reporting(&mut self, enabled: bool) {
        self.report_errors = enabled;
    }
}

/// State of a single lex call.
#[derive(Default)]
struct Scan {
    output: LexOutput,
    statement: Vec<Token>,
    open: Option<MultilineKind>,
}

impl Scan {
    fn line(&mut self, chars: &[char], row: usize) {
        let mut column = 0;

        if let Some(kind) = self.open {
            match find(chars, 0, closing_delimiter(kind)) {
                Some(end) => {
                    let fragment = MultilineToken::new(kind, Fragment::Closing);
                    self.push(TokenKind::Multiline(fragment), &chars[..end], row, 0);
                    self.open = None;
                    column = end;
                }
                None => {
                    if !chars.is_empty() {
                        let fragment = MultilineToken::new(kind, Fragment::Middle);
                        self.push(TokenKind::Multiline(fragment), chars, row, 0);
                    }
                    return;
                }
            }
        }

        while column < chars.len() {
            let c = chars[column];
            if c.is_whitespace() {
                column += 1;
                continue;
            }

            let start = column;
            let delimited = if starts_with(chars, column, COMMENT_OPEN) {
                Some(MultilineKind::Comment)
            } else if starts_with(chars, column, STRING_DELIMITER) {
                Some(MultilineKind::String)
            } else {
                None
            };

            if let Some(kind) = delimited {
                match find(chars, column + 2, closing_delimiter(kind)) {
                    Some(end) => {
                        let single = match kind {
                            MultilineKind::Comment => TokenKind::Comment,
                            MultilineKind::String => TokenKind::String,
                        };
                        self.push(single, &chars[start..end], row, start);
                        column = end;
                    }
                    None => {
                        let fragment = MultilineToken::new(kind, Fragment::Opening);
                        self.push(TokenKind::Multiline(fragment), &chars[start..], row, start);
                        self.open = Some(kind);
                        return;
                    }
                }
                continue;
            }

            if c == '`' {
                column = self.backtick(chars, row, start);
            } else if c.is_ascii_digit() {
                column = number_end(chars, start);
                self.push(TokenKind::Number, &chars[start..column], row, start);
            } else if c.is_alphabetic() || c == '_' {
                column = start + 1;
                while column < chars.len() && is_word_char(chars[column]) {
                    column += 1;
                }
                let word: String = chars[start..column].iter().collect();
                self.push(classify_word(&word), &chars[start..column], row, start);
            } else if let Some((symbol, kind)) = longest_symbol(chars, start) {
                column = start + symbol.chars().count();
                self.push(kind, &chars[start..column], row, start);
                if kind == TokenKind::Separator && symbol == "," {
                    self.end_statement();
                }
            } else {
                column = start + 1;
                self.invalid(&chars[start..column], row, start);
            }
        }

        if self.open.is_none() {
            self.end_statement();
        }
    }

    /// Lexes a character literal or a quoted identifier.
    fn backtick(&mut self, chars: &[char], row: usize, start: usize) -> usize {
        let Some(close) = chars[start + 1..].iter().position(|&c| c == '`') else {
            self.invalid(&chars[start..start + 1], row, start);
            return start + 1;
        };
        let end = start + 1 + close + 1;
        let kind = if close == 1 {
            TokenKind::Character
        } else {
            TokenKind::Reference {
                quoted: true,
                called: false,
            }
        };
        self.push(kind, &chars[start..end], row, start);
        end
    }

    fn push(&mut self, kind: TokenKind, chars: &[char], row: usize, column: usize) {
        let text: String = chars.iter().collect();
        self.statement
            .push(Token::new(kind, text, Location::new(row, column)));
    }

    fn invalid(&mut self, chars: &[char], row: usize, column: usize) {
        let text: String = chars.iter().collect();
        self.output
            .invalid
            .push(Token::new(TokenKind::Invalid, text, Location::new(row, column)));
    }

    fn end_statement(&mut self) {
        if !self.statement.is_empty() {
            self.output.statements.push(std::mem::take(&mut self.statement));
        }
    }
}

fn closing_delimiter(kind: MultilineKind) -> &'static str {
    match kind {
        MultilineKind::Comment => COMMENT_CLOSE,
        MultilineKind::String => STRING_DELIMITER,
    }
}

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut index = at;
    for p in pattern.chars() {
        if chars.get(index) != Some(&p) {
            return false;
        }
        index += 1;
    }
    true
}

/// Finds `pattern` at or after `from` and returns the index just past it.
fn find(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    let len = pattern.chars().count();
    (from..chars.len())
        .find(|&index| starts_with(chars, index, pattern))
        .map(|index| index + len)
}

fn longest_symbol(chars: &[char], at: usize) -> Option<(&'static str, TokenKind)> {
    SYMBOLS
        .iter()
        .filter(|(symbol, _)| starts_with(chars, at, symbol))
        .max_by_key(|(symbol, _)| symbol.len())
        .copied()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn number_end(chars: &[char], start: usize) -> usize {
    let digits = |mut index: usize| {
        while index < chars.len() && chars[index].is_ascii_digit() {
            index += 1;
        }
        index
    };

    let mut end = digits(start);
    if chars.get(end) == Some(&'.') && chars.get(end + 1).is_some_and(char::is_ascii_digit) {
        end = digits(end + 1);
    }
    if let Some(suffix) = chars.get(end) {
        let terminated = !chars.get(end + 1).copied().is_some_and(is_word_char);
        if "LFDBlfdb".contains(*suffix) && terminated {
            end += 1;
        }
    }
    end
}

fn classify_word(word: &str) -> TokenKind {
    match word {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        _ if KEYWORDS.contains(&word) => TokenKind::Keyword,
        _ if word.chars().all(|c| c == '_') => TokenKind::Sword,
        _ if word.starts_with(char::is_uppercase) => TokenKind::TypeReference,
        _ => TokenKind::Reference {
            quoted: false,
            called: false,
        },
    }
}
