//! Input filtering for typed text.

use std::borrow::Cow;

/// Replaces every tab in typed text before it reaches the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsToSpaces {
    replacement: String,
}

impl Default for TabsToSpaces {
    fn default() -> Self {
        Self::new("  ")
    }
}

impl TabsToSpaces {
    pub fn new(replacement: &str) -> Self {
        Self {
            replacement: replacement.to_string(),
        }
    }

    /// Returns `text` with tabs replaced, borrowing when there are none.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.contains('\t') {
            Cow::Owned(text.replace('\t', &self.replacement))
        } else {
            Cow::Borrowed(text)
        }
    }
}
