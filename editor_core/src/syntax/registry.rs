//! Highlight state of every open file, keyed by path.

use super::highlighter::FileHighlightState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Owns one [`FileHighlightState`] per open file.
///
/// Paths are canonicalized when possible so that two spellings of the same
/// file share one state. Paths that cannot be canonicalized, such as
/// untitled buffers, are used as given.
#[derive(Debug, Default)]
pub struct HighlightStateRegistry {
    states: HashMap<PathBuf, FileHighlightState>,
}

impl HighlightStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `path`, creating an empty one on first use.
    pub fn get_or_create(&mut self, path: &Path) -> &mut FileHighlightState {
        let key = Self::key(path);
        self.states.entry(key).or_insert_with(|| {
            log::debug!("created highlight state for {}", path.display());
            FileHighlightState::new()
        })
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut FileHighlightState> {
        self.states.get_mut(&Self::key(path))
    }

    pub fn get(&self, path: &Path) -> Option<&FileHighlightState> {
        self.states.get(&Self::key(path))
    }

    /// Drops the state of a closed file. Returns false if it was not open.
    pub fn close(&mut self, path: &Path) -> bool {
        self.states.remove(&Self::key(path)).is_some()
    }

    pub fn is_open(&self, path: &Path) -> bool {
        self.states.contains_key(&Self::key(path))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut registry = HighlightStateRegistry::new();
        let path = Path::new("untitled-1");

        assert!(!registry.is_open(path));
        registry.get_or_create(path);
        registry.get_or_create(path);
        assert_eq!(registry.len(), 1);
        assert!(registry.get_mut(path).is_some());

        assert!(registry.close(path));
        assert!(!registry.close(path));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_separate_files() {
        let mut registry = HighlightStateRegistry::new();
        registry.get_or_create(Path::new("untitled-1"));
        registry.get_or_create(Path::new("untitled-2"));
        assert_eq!(registry.len(), 2);
        assert!(registry.get(Path::new("untitled-3")).is_none());
    }

    #[test]
    fn test_canonical_key() {
        let dir = std::env::temp_dir();
        let direct = dir.join("tint-registry-key.vk");
        std::fs::write(&direct, "x").unwrap();
        let dotted = dir.join(".").join("tint-registry-key.vk");

        let mut registry = HighlightStateRegistry::new();
        registry.get_or_create(&direct);
        assert!(registry.is_open(&dotted));

        std::fs::remove_file(&direct).unwrap();
    }
}
