//! Theme system for syntax highlighting.
//!
//! Defines the style vocabulary painted into the buffer and the color
//! schemes that render it.

use std::collections::HashMap;

/// Style categories painted per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenStyle {
    /// Reserved words, and type declaration names
    Keyword,
    /// `??`, `<>`, `--`, `++`
    ControlFlow,
    String,
    Char,
    Number,
    Boolean,
    Comment,
    /// References used as calls
    Function,
    Type,
    Variable,
    QuotedIdentifier,
    /// `null` and swords
    Constant,
    Operator,
    Punctuation,
    Separator,
    FieldAccess,
    /// Text the lexer rejected
    Error,
    /// Unstyled text
    #[default]
    Default,
}

/// RGBA color represented as [r, g, b, a] with values 0.0-1.0.
pub type Color = [f32; 4];

/// Converts a color to 8-bit RGB, dropping alpha.
pub fn to_rgb8(color: Color) -> [u8; 3] {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color[0]), channel(color[1]), channel(color[2])]
}

/// A syntax highlighting theme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    /// Default text color.
    pub foreground: Color,
    colors: HashMap<TokenStyle, Color>,
}

impl Theme {
    /// Creates a theme with no style colors set.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            background: [0.102, 0.102, 0.122, 1.0],
            foreground: [0.902, 0.902, 0.902, 1.0],
            colors: HashMap::new(),
        }
    }

    pub fn set_color(&mut self, style: TokenStyle, color: Color) {
        self.colors.insert(style, color);
    }

    /// Gets the color for a token style, falling back to foreground.
    pub fn color(&self, style: TokenStyle) -> Color {
        self.colors.get(&style).copied().unwrap_or(self.foreground)
    }

    /// Creates the default dark theme.
    pub fn dark() -> Self {
        let mut theme = Self::new("Dark");

        theme.background = [0.102, 0.102, 0.122, 1.0]; // #1A1A1F
        theme.foreground = [0.682, 0.710, 0.749, 1.0]; // #ABB2BF

        let purple = [0.769, 0.471, 0.839, 1.0]; // #C477D6
        let green = [0.596, 0.765, 0.475, 1.0]; // #98C379
        let orange = [0.824, 0.608, 0.467, 1.0]; // #D29B77
        let gold = [0.890, 0.780, 0.478, 1.0]; // #E3C77A

        theme.set_color(TokenStyle::Keyword, purple);
        theme.set_color(TokenStyle::ControlFlow, purple);
        theme.set_color(TokenStyle::String, green);
        theme.set_color(TokenStyle::Char, green);
        theme.set_color(TokenStyle::Number, orange);
        theme.set_color(TokenStyle::Boolean, orange);
        theme.set_color(TokenStyle::Constant, orange);
        theme.set_color(TokenStyle::Comment, [0.455, 0.506, 0.557, 1.0]); // #74818E
        theme.set_color(TokenStyle::Function, [0.380, 0.686, 0.937, 1.0]); // #61AFEF
        theme.set_color(TokenStyle::Type, gold);
        theme.set_color(TokenStyle::Variable, [0.878, 0.439, 0.439, 1.0]); // #E07070
        theme.set_color(TokenStyle::QuotedIdentifier, [0.337, 0.788, 0.784, 1.0]); // #56C9C8
        theme.set_color(TokenStyle::Operator, theme.foreground);
        theme.set_color(TokenStyle::Punctuation, [0.600, 0.627, 0.667, 1.0]); // #99A0AA
        theme.set_color(TokenStyle::Separator, [0.600, 0.627, 0.667, 1.0]);
        theme.set_color(TokenStyle::FieldAccess, gold);
        theme.set_color(TokenStyle::Error, [1.0, 0.333, 0.333, 1.0]); // #FF5555
        theme.set_color(TokenStyle::Default, theme.foreground);

        theme
    }

    /// Creates a light theme.
    pub fn light() -> Self {
        let mut theme = Self::new("Light");

        theme.background = [0.984, 0.984, 0.984, 1.0]; // #FBFBFB
        theme.foreground = [0.231, 0.259, 0.322, 1.0]; // #3B4252

        let purple = [0.627, 0.314, 0.706, 1.0]; // #A050B4
        let green = [0.306, 0.604, 0.024, 1.0]; // #4E9A06
        let blue = [0.114, 0.404, 0.804, 1.0]; // #1D67CD

        theme.set_color(TokenStyle::Keyword, purple);
        theme.set_color(TokenStyle::ControlFlow, purple);
        theme.set_color(TokenStyle::String, green);
        theme.set_color(TokenStyle::Char, green);
        theme.set_color(TokenStyle::Number, blue);
        theme.set_color(TokenStyle::Boolean, blue);
        theme.set_color(TokenStyle::Constant, blue);
        theme.set_color(TokenStyle::Comment, [0.502, 0.549, 0.596, 1.0]); // #808C98
        theme.set_color(TokenStyle::Function, [0.071, 0.345, 0.667, 1.0]); // #1258AA
        theme.set_color(TokenStyle::Type, [0.016, 0.490, 0.490, 1.0]); // #047D7D
        theme.set_color(TokenStyle::Variable, [0.753, 0.204, 0.204, 1.0]); // #C03434
        theme.set_color(TokenStyle::Error, [0.800, 0.0, 0.0, 1.0]); // #CC0000
        theme.set_color(TokenStyle::Default, theme.foreground);

        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
