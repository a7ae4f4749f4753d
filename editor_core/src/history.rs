//! Undo/Redo history system.
//!
//! A linear log of edits with a pointer to the most recently applied one.
//! The history never touches the buffer itself: callers fetch the operation
//! to replay, apply it, and only then commit the pointer move, so a failed
//! replay leaves buffer and history in step.

use crate::buffer::{BufferChange, ChangeKind};

/// Represents a single edit operation that can be undone/redone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Insert text at position.
    Insert { position: usize, text: String },
    /// Remove the text at position.
    Remove { position: usize, text: String },
}

impl EditOperation {
    /// Returns the inverse operation (for undo).
    pub fn inverse(&self) -> EditOperation {
        match self {
            EditOperation::Insert { position, text } => EditOperation::Remove {
                position: *position,
                text: text.clone(),
            },
            EditOperation::Remove { position, text } => EditOperation::Insert {
                position: *position,
                text: text.clone(),
            },
        }
    }

    pub fn position(&self) -> usize {
        match self {
            EditOperation::Insert { position, .. } | EditOperation::Remove { position, .. } => {
                *position
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            EditOperation::Insert { text, .. } | EditOperation::Remove { text, .. } => text,
        }
    }

    /// End offset of the affected range, exclusive.
    pub fn end(&self) -> usize {
        self.position() + self.text().chars().count()
    }

    /// Extends `self` with `next` if both are single-character steps of the
    /// same kind of typing. Returns false when they do not combine.
    fn try_merge(&mut self, next: &EditOperation) -> bool {
        if next.text().chars().count() != 1 {
            return false;
        }
        match (self, next) {
            (
                EditOperation::Insert { position: start, text },
                EditOperation::Insert { position: at, text: added },
            ) => {
                // Don't coalesce after newline
                if text.ends_with('\n') || *at != *start + text.chars().count() {
                    return false;
                }
                text.push_str(added);
                true
            }
            (
                EditOperation::Remove { position: start, text },
                EditOperation::Remove { position: at, text: removed },
            ) => {
                if removed == "\n" {
                    false
                } else if *at + 1 == *start {
                    // Backspace
                    text.insert_str(0, removed);
                    *start = *at;
                    true
                } else if *at == *start {
                    // Forward delete
                    text.push_str(removed);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

impl From<&BufferChange> for EditOperation {
    fn from(change: &BufferChange) -> Self {
        match change.kind {
            ChangeKind::Inserted => EditOperation::Insert {
                position: change.offset,
                text: change.text.clone(),
            },
            ChangeKind::Removed => EditOperation::Remove {
                position: change.offset,
                text: change.text.clone(),
            },
        }
    }
}

/// One recorded edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub operation: EditOperation,
    /// Set once the entry has been undone or redone. Finished entries never
    /// absorb further edits.
    pub finished: bool,
}

/// Manages undo/redo history.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Number of entries currently applied to the buffer.
    applied: usize,
    /// Maximum number of undo levels.
    max_size: usize,
    recording: bool,
    coalesce_enabled: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl History {
    /// Creates a new history with the given maximum size.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            applied: 0,
            max_size: max_size.max(1),
            recording: true,
            coalesce_enabled: false,
        }
    }

    /// Enables or disables coalescing of adjacent single-character edits.
    pub fn set_coalesce_enabled(&mut self, enabled: bool) {
        self.coalesce_enabled = enabled;
    }

    /// Enables or disables recording. Disabled while replaying undo/redo or
    /// loading a file, so those mutations do not record themselves.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Records an operation. Any undone entries are discarded first.
    ///
    /// Returns false if recording is disabled.
    pub fn record(&mut self, op: EditOperation) -> bool {
        if !self.recording {
            return false;
        }
        self.entries.truncate(self.applied);

        if self.coalesce_enabled {
            if let Some(last) = self.entries.last_mut() {
                if !last.finished && last.operation.try_merge(&op) {
                    return true;
                }
            }
        }

        self.entries.push(HistoryEntry {
            operation: op,
            finished: false,
        });
        self.applied += 1;
        // Enforce size limit
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
            self.applied -= 1;
        }
        true
    }

    /// Returns true if undo is available.
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Returns true if redo is available.
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Index of the most recently applied entry.
    pub fn position(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// The operation that undoes the most recently applied entry.
    pub fn undo_operation(&self) -> Option<EditOperation> {
        let index = self.position()?;
        Some(self.entries[index].operation.inverse())
    }

    /// Moves the pointer back after the undo operation was applied.
    pub fn commit_undo(&mut self) {
        if let Some(index) = self.position() {
            self.entries[index].finished = true;
            self.applied = index;
        }
    }

    /// The operation that redoes the next undone entry.
    pub fn redo_operation(&self) -> Option<EditOperation> {
        self.entries
            .get(self.applied)
            .map(|entry| entry.operation.clone())
    }

    /// Moves the pointer forward after the redo operation was applied.
    pub fn commit_redo(&mut self) {
        if let Some(entry) = self.entries.get_mut(self.applied) {
            entry.finished = true;
            self.applied += 1;
        }
    }

    #[cfg(test)]
    fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(position: usize, text: &str) -> EditOperation {
        EditOperation::Insert {
            position,
            text: text.to_string(),
        }
    }

    fn remove(position: usize, text: &str) -> EditOperation {
        EditOperation::Remove {
            position,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_undo_redo() {
        let mut history = History::new(100);
        history.record(insert(0, "hello"));

        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.position(), Some(0));

        assert_eq!(history.undo_operation(), Some(remove(0, "hello")));
        history.commit_undo();
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.position(), None);

        assert_eq!(history.redo_operation(), Some(insert(0, "hello")));
        history.commit_redo();
        assert_eq!(history.position(), Some(0));
        assert!(history.entries()[0].finished);
    }

    #[test]
    fn test_pointer_moves_only_on_commit() {
        let mut history = History::new(100);
        history.record(insert(0, "a"));

        let _ = history.undo_operation();
        assert_eq!(history.position(), Some(0));
        assert!(history.can_undo());
    }

    #[test]
    fn test_redo_cleared_on_new_edit() {
        let mut history = History::new(100);
        history.record(insert(0, "a"));
        history.record(insert(1, "b"));

        history.commit_undo();
        assert!(history.can_redo());

        history.record(insert(1, "c"));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[1].operation, insert(1, "c"));
    }

    #[test]
    fn test_recording_disabled() {
        let mut history = History::new(100);
        history.set_recording(false);
        assert!(!history.record(insert(0, "a")));
        assert!(history.is_empty());

        history.set_recording(true);
        assert!(history.record(insert(0, "a")));
    }

    #[test]
    fn test_size_limit_drops_oldest() {
        let mut history = History::new(2);
        history.record(insert(0, "a"));
        history.record(insert(5, "b"));
        history.record(insert(9, "c"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.position(), Some(1));
        assert_eq!(history.entries()[0].operation, insert(5, "b"));
    }

    #[test]
    fn test_no_coalescing_by_default() {
        let mut history = History::new(100);
        history.record(insert(0, "a"));
        history.record(insert(1, "b"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_coalescing_consecutive_inserts() {
        let mut history = History::new(100);
        history.set_coalesce_enabled(true);
        history.record(insert(0, "a"));
        history.record(insert(1, "b"));
        history.record(insert(2, "c"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.undo_operation(), Some(remove(0, "abc")));
    }

    #[test]
    fn test_coalescing_breaks_on_newline() {
        let mut history = History::new(100);
        history.set_coalesce_enabled(true);
        history.record(insert(0, "a"));
        history.record(insert(1, "\n"));
        history.record(insert(2, "b"));

        // "a\n" and "b"
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].operation, insert(0, "a\n"));
    }

    #[test]
    fn test_coalescing_removals() {
        let mut history = History::new(100);
        history.set_coalesce_enabled(true);
        // Backspace over "abc" from the end.
        history.record(remove(2, "c"));
        history.record(remove(1, "b"));
        history.record(remove(0, "a"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].operation, remove(0, "abc"));

        // Forward delete.
        history.record(remove(4, "x"));
        history.record(remove(4, "y"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[1].operation, remove(4, "xy"));
    }

    #[test]
    fn test_finished_entries_do_not_merge() {
        let mut history = History::new(100);
        history.set_coalesce_enabled(true);
        history.record(insert(0, "a"));
        history.commit_undo();
        history.commit_redo();

        history.record(insert(1, "b"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.record(insert(0, "a"));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.position(), None);
    }
}
