//! Style rules: which [`TokenStyle`] a token is painted with.

use super::theme::TokenStyle;
use super::token::{MultilineKind, Token, TokenKind};
use std::collections::HashMap;

/// Type references with these names are declaration keywords.
pub const TYPE_KEYWORDS: &[&str] = &[
    "Type",
    "AbstractType",
    "Interface",
    "Enum",
    "Record",
    "Library",
    "TestSuite",
];

/// Field-less discriminant of [`TokenKind`], used as a rule key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Reference,
    TypeReference,
    Keyword,
    ControlFlow,
    Operator,
    Punctuation,
    Separator,
    FieldAccess,
    Sword,
    Number,
    Boolean,
    Null,
    Character,
    String,
    Comment,
    MultilineComment,
    MultilineString,
    Invalid,
}

impl From<TokenKind> for TokenClass {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Reference { .. } => TokenClass::Reference,
            TokenKind::TypeReference => TokenClass::TypeReference,
            TokenKind::Keyword => TokenClass::Keyword,
            TokenKind::ControlFlow => TokenClass::ControlFlow,
            TokenKind::Operator => TokenClass::Operator,
            TokenKind::Punctuation => TokenClass::Punctuation,
            TokenKind::Separator => TokenClass::Separator,
            TokenKind::FieldAccess => TokenClass::FieldAccess,
            TokenKind::Sword => TokenClass::Sword,
            TokenKind::Number => TokenClass::Number,
            TokenKind::Boolean => TokenClass::Boolean,
            TokenKind::Null => TokenClass::Null,
            TokenKind::Character => TokenClass::Character,
            TokenKind::String => TokenClass::String,
            TokenKind::Comment => TokenClass::Comment,
            TokenKind::Multiline(token) => match token.kind {
                MultilineKind::Comment => TokenClass::MultilineComment,
                MultilineKind::String => TokenClass::MultilineString,
            },
            TokenKind::Invalid => TokenClass::Invalid,
        }
    }
}

/// A named group of token classes that share one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Literal,
    Comment,
    Delimiter,
    Identifier,
}

impl Category {
    pub fn classes(self) -> &'static [TokenClass] {
        match self {
            Category::Literal => &[
                TokenClass::Number,
                TokenClass::Boolean,
                TokenClass::Null,
                TokenClass::Character,
                TokenClass::String,
                TokenClass::MultilineString,
            ],
            Category::Comment => &[TokenClass::Comment, TokenClass::MultilineComment],
            Category::Delimiter => &[
                TokenClass::Punctuation,
                TokenClass::Separator,
                TokenClass::FieldAccess,
            ],
            Category::Identifier => &[
                TokenClass::Reference,
                TokenClass::TypeReference,
                TokenClass::Sword,
            ],
        }
    }
}

/// Context-dependent rules that win over the plain class rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overload {
    /// An unquoted reference that is not called.
    Variable,
    QuotedIdentifier,
    FunctionCall,
    /// A type reference naming one of [`TYPE_KEYWORDS`].
    TypeKeyword,
}

impl Overload {
    fn of(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Reference { called: true, .. } => Some(Overload::FunctionCall),
            TokenKind::Reference { quoted: true, .. } => Some(Overload::QuotedIdentifier),
            TokenKind::Reference { .. } => Some(Overload::Variable),
            TokenKind::TypeReference if TYPE_KEYWORDS.contains(&token.text.as_str()) => {
                Some(Overload::TypeKeyword)
            }
            _ => None,
        }
    }
}

/// Maps tokens to styles.
#[derive(Debug, Clone, Default)]
pub struct StyleRules {
    classes: HashMap<TokenClass, TokenStyle>,
    overloads: HashMap<Overload, TokenStyle>,
}

impl StyleRules {
    /// Rules with nothing set: every token resolves to [`TokenStyle::Default`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_rule(&mut self, class: TokenClass, style: TokenStyle) {
        self.classes.insert(class, style);
    }

    /// Sets the rule of every class in `category`.
    pub fn set_category(&mut self, category: Category, style: TokenStyle) {
        for &class in category.classes() {
            self.classes.insert(class, style);
        }
    }

    pub fn set_overload(&mut self, overload: Overload, style: TokenStyle) {
        self.overloads.insert(overload, style);
    }

    pub fn rule(&self, class: TokenClass) -> Option<TokenStyle> {
        self.classes.get(&class).copied()
    }

    /// Resolves the style of `token`: an overload first, then its class rule,
    /// then the default style.
    pub fn resolve(&self, token: &Token) -> TokenStyle {
        Overload::of(token)
            .and_then(|overload| self.overloads.get(&overload).copied())
            .or_else(|| self.rule(token.kind.into()))
            .unwrap_or(TokenStyle::Default)
    }

    /// The stock rule set.
    pub fn standard() -> Self {
        let mut rules = Self::empty();

        rules.set_category(Category::Comment, TokenStyle::Comment);
        rules.set_category(Category::Delimiter, TokenStyle::Punctuation);
        rules.set_rule(TokenClass::String, TokenStyle::String);
        rules.set_rule(TokenClass::MultilineString, TokenStyle::String);
        rules.set_rule(TokenClass::Character, TokenStyle::Char);
        rules.set_rule(TokenClass::Number, TokenStyle::Number);
        rules.set_rule(TokenClass::Boolean, TokenStyle::Boolean);
        rules.set_rule(TokenClass::Null, TokenStyle::Constant);
        rules.set_rule(TokenClass::Sword, TokenStyle::Constant);
        rules.set_rule(TokenClass::Keyword, TokenStyle::Keyword);
        rules.set_rule(TokenClass::ControlFlow, TokenStyle::ControlFlow);
        rules.set_rule(TokenClass::Operator, TokenStyle::Operator);
        rules.set_rule(TokenClass::Separator, TokenStyle::Separator);
        rules.set_rule(TokenClass::FieldAccess, TokenStyle::FieldAccess);
        rules.set_rule(TokenClass::TypeReference, TokenStyle::Type);
        rules.set_rule(TokenClass::Invalid, TokenStyle::Error);

        rules.set_overload(Overload::Variable, TokenStyle::Variable);
        rules.set_overload(Overload::QuotedIdentifier, TokenStyle::QuotedIdentifier);
        rules.set_overload(Overload::FunctionCall, TokenStyle::Function);
        rules.set_overload(Overload::TypeKeyword, TokenStyle::Keyword);

        rules
    }
}
