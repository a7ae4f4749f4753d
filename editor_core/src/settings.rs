//! Editor settings.

/// Tunables for an editing session. There is no settings file; hosts build
/// this in code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Text typed in place of a tab character.
    pub tab_replacement: String,
    /// Maximum number of undo entries kept.
    pub history_limit: usize,
    /// Merge adjacent single-character edits into one undo entry.
    pub coalesce_edits: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tab_replacement: "  ".to_string(),
            history_limit: 1000,
            coalesce_edits: false,
        }
    }
}
