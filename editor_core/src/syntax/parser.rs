//! Parser boundary and the bundled statement parser.

use super::token::{Token, TokenKind};

/// A parser that annotates lexed statements in place.
pub trait Parser {
    fn parse(&mut self, statements: &mut [Vec<Token>]);

    fn reset(&mut self);

    /// Enables or disables diagnostics, as for [`super::Lexer`].
    fn set_error_reporting(&mut self, enabled: bool);
}

/// Marks call sites and checks bracket balance per statement.
#[derive(Debug, Default)]
pub struct DefaultParser {
    report_errors: bool,
    error_count: usize,
}

impl DefaultParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unbalanced statements seen since the last reset.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    fn check_brackets(&mut self, statement: &[Token]) {
        let mut stack = Vec::new();
        let mut balanced = true;
        for token in statement.iter().filter(|t| t.kind == TokenKind::Punctuation) {
            match token.text.as_str() {
                "(" | "[" | "{" => stack.push(token),
                close @ (")" | "]" | "}") => {
                    let matches = stack.pop().is_some_and(|open| {
                        matches!((open.text.as_str(), close), ("(", ")") | ("[", "]") | ("{", "}"))
                    });
                    if !matches {
                        balanced = false;
                        if self.report_errors {
                            log::warn!("unmatched {:?} at {}", close, token.location);
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            balanced = false;
            if self.report_errors {
                log::warn!("unclosed {:?} at {}", open.text, open.location);
            }
        }
        if !balanced {
            self.error_count += 1;
        }
    }
}

impl Parser for DefaultParser {
    fn parse(&mut self, statements: &mut [Vec<Token>]) {
        for statement in statements.iter_mut() {
            for index in 1..statement.len() {
                let is_bang = statement[index].kind == TokenKind::Punctuation
                    && statement[index].text == "!";
                if !is_bang {
                    continue;
                }
                if let TokenKind::Reference { called, .. } = &mut statement[index - 1].kind {
                    *called = true;
                }
            }
            self.check_brackets(statement);
        }
    }

    fn reset(&mut self) {
        self.error_count = 0;
    }

    fn set_error_reporting(&mut self, enabled: bool) {
        self.report_errors = enabled;
    }
}
