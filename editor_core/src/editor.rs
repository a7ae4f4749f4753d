//! Main editor logic.
//!
//! An [`Editor`] is one open file: its buffer, its undo history and the
//! queue of highlight tasks its edits produced. Highlighting itself is done
//! by the host, which owns the [`SyntaxHighlighter`] and the
//! [`HighlightStateRegistry`] and drains the queue with
//! [`Editor::run_pending`] between input events.

use crate::buffer::{BufferChange, TextBuffer};
use crate::error::EditorError;
use crate::filter::TabsToSpaces;
use crate::history::{EditOperation, History};
use crate::settings::Settings;
use crate::syntax::{Edit, HighlightStateRegistry, Lexer, Parser, SyntaxHighlighter};
use ropey::Rope;
use std::collections::VecDeque;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Name prefix of buffers that were never saved.
pub const UNTITLED: &str = "untitled";

static NEXT_UNTITLED: AtomicUsize = AtomicUsize::new(1);

/// A fresh path for an unsaved buffer, so no two sessions share highlight
/// state.
fn untitled_path() -> PathBuf {
    let id = NEXT_UNTITLED.fetch_add(1, Ordering::Relaxed);
    PathBuf::from(format!("{}-{}", UNTITLED, id))
}

/// Work queued by an edit, run after the edit has returned.
///
/// Each task carries a snapshot of the text right after its edit, so the
/// region index advances one edit at a time even when several tasks queue
/// up before the host gets to them. Only the current text is ever painted.
#[derive(Debug, Clone)]
pub enum HighlightTask {
    EntireFile { text: Rope },
    Region { text: Rope, edit: Edit },
}

/// The main editor state.
#[derive(Debug)]
pub struct Editor {
    /// The text buffer.
    buffer: TextBuffer,
    /// Undo/redo history.
    history: History,
    /// Applied to typed text only.
    filter: TabsToSpaces,
    /// File path, or `untitled-<n>` for a buffer that was never saved.
    file_path: PathBuf,
    /// Whether the buffer has unsaved changes.
    modified: bool,
    pending: VecDeque<HighlightTask>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Creates a new empty editor.
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        let mut history = History::new(settings.history_limit);
        history.set_coalesce_enabled(settings.coalesce_edits);

        let mut editor = Self {
            buffer: TextBuffer::new(),
            history,
            filter: TabsToSpaces::new(&settings.tab_replacement),
            file_path: untitled_path(),
            modified: false,
            pending: VecDeque::new(),
        };
        editor.rehighlight();
        editor
    }

    /// Opens a file in the editor.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EditorError> {
        let path = path.as_ref();
        self.buffer = TextBuffer::from_file(path)?;
        self.file_path = path.to_path_buf();
        log::info!(
            "opened {} ({} lines)",
            path.display(),
            self.buffer.len_lines()
        );
        self.reset_session();
        Ok(())
    }

    /// Replaces the buffer contents without recording history.
    pub fn load_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.reset_session();
    }

    /// Saves the buffer to the current file path.
    pub fn save(&mut self) -> Result<(), EditorError> {
        self.buffer.save_to_file(&self.file_path)?;
        self.modified = false;
        Ok(())
    }

    /// Saves the buffer to a new file path.
    ///
    /// The highlight state stays registered under the old path; hosts that
    /// rename should close and reopen.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EditorError> {
        let path = path.as_ref();
        self.buffer.save_to_file(path)?;
        self.file_path = path.to_path_buf();
        self.modified = false;
        Ok(())
    }

    /// Closes the file: drops history, text, queued work and the file's
    /// highlight state.
    pub fn close(&mut self, registry: &mut HighlightStateRegistry) {
        self.history.clear();
        self.buffer = TextBuffer::new();
        self.pending.clear();
        self.modified = false;
        if registry.close(&self.file_path) {
            log::debug!("closed {}", self.file_path.display());
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns whether the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns a reference to the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ==================== Text Editing ====================

    /// Inserts typed text at `offset`. Tabs are replaced first.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditorError> {
        let text = self.filter.apply(text);
        if text.is_empty() {
            return Ok(());
        }
        let change = self.buffer.insert(offset, &text)?;
        self.changed(&change);
        Ok(())
    }

    /// Removes `length` characters starting at `offset`.
    pub fn remove(&mut self, offset: usize, length: usize) -> Result<(), EditorError> {
        if length == 0 {
            return Ok(());
        }
        let change = self.buffer.remove(offset, length)?;
        self.changed(&change);
        Ok(())
    }

    /// Buffer change notification: records history and queues highlighting.
    fn changed(&mut self, change: &BufferChange) {
        self.history.record(EditOperation::from(change));
        self.modified = true;
        self.pending.push_back(HighlightTask::Region {
            text: self.buffer.rope().clone(),
            edit: Edit::from(change),
        });
    }

    // ==================== Undo / Redo ====================

    /// Undoes the last edit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(op) = self.history.undo_operation() else {
            return Ok(false);
        };
        self.replay(&op)?;
        self.history.commit_undo();
        Ok(true)
    }

    /// Redoes the last undone edit. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let Some(op) = self.history.redo_operation() else {
            return Ok(false);
        };
        self.replay(&op)?;
        self.history.commit_redo();
        Ok(true)
    }

    /// Returns true if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Applies an operation through the normal change path, unfiltered and
    /// with recording off.
    fn replay(&mut self, op: &EditOperation) -> Result<(), EditorError> {
        self.history.set_recording(false);
        let result = match op {
            EditOperation::Insert { position, text } => self.buffer.insert(*position, text),
            EditOperation::Remove { position, text } => {
                self.buffer.remove(*position, text.chars().count())
            }
        };
        if let Ok(change) = &result {
            self.changed(change);
        }
        self.history.set_recording(true);
        result?;
        Ok(())
    }

    // ==================== Highlighting ====================

    /// Queues a whole-file highlight of the current text.
    pub fn rehighlight(&mut self) {
        self.pending.push_back(HighlightTask::EntireFile {
            text: self.buffer.rope().clone(),
        });
    }

    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Runs every queued highlight task in order and returns how many ran.
    ///
    /// Each task brings the region index up to date with its snapshot. The
    /// lines all tasks touched are painted once, from the current text.
    /// Region tasks for a file without highlight state are skipped.
    ///
    /// An invariant violation is returned after the file's highlight state
    /// is dropped and the queue replaced by a whole-file highlight, which
    /// the next call runs from scratch.
    pub fn run_pending<L: Lexer, P: Parser>(
        &mut self,
        highlighter: &mut SyntaxHighlighter<L, P>,
        registry: &mut HighlightStateRegistry,
    ) -> Result<usize, EditorError> {
        let mut ran = 0;
        // Lines to paint, in the coordinates of the last task's snapshot.
        let mut dirty: Option<Range<usize>> = None;
        let mut last_window = None;

        while let Some(task) = self.pending.pop_front() {
            if !highlighter.is_enabled() {
                ran += 1;
                continue;
            }
            let result = match &task {
                HighlightTask::EntireFile { text } => {
                    dirty = None;
                    let state = registry.get_or_create(&self.file_path);
                    highlighter.relex_entire_file(text, state)
                }
                HighlightTask::Region { text, edit } => {
                    dirty = dirty.map(|range| edit.map_range(range));
                    last_window = None;
                    let Some(state) = registry.get_mut(&self.file_path) else {
                        log::trace!("no highlight state for {}", self.file_path.display());
                        continue;
                    };
                    highlighter.relex(text, *edit, state)
                }
            };
            let window = match result {
                Ok(window) => window,
                Err(err) => return Err(self.discard_state(registry, err.into())),
            };
            let range = window.start..window.end;
            dirty = Some(match dirty {
                Some(dirty) => dirty.start.min(range.start)..dirty.end.max(range.end),
                None => range.clone(),
            });
            last_window = Some(range);
            ran += 1;
        }

        let (Some(dirty), Some(state)) = (dirty, registry.get_mut(&self.file_path)) else {
            return Ok(ran);
        };
        let text = self.buffer.rope().clone();
        if last_window.as_ref() == Some(&dirty) {
            // Only the last task's rows are affected and they are current.
            highlighter.apply(&text, state, &mut self.buffer);
        } else if let Err(err) = highlighter.repaint(&text, dirty, state, &mut self.buffer) {
            return Err(self.discard_state(registry, err.into()));
        }
        Ok(ran)
    }

    /// Drops the file's highlight state and queued work after a failure,
    /// leaving one whole-file highlight queued.
    fn discard_state(
        &mut self,
        registry: &mut HighlightStateRegistry,
        err: EditorError,
    ) -> EditorError {
        log::error!("highlighting {} failed: {}", self.file_path.display(), err);
        registry.close(&self.file_path);
        self.pending.clear();
        self.rehighlight();
        err
    }

    fn reset_session(&mut self) {
        self.history.clear();
        self.pending.clear();
        self.modified = false;
        self.rehighlight();
    }
}
