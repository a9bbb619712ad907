//! Favorite containers
//!
//! Persisted to `<data dir>/favorites`, one container name per line in
//! insertion order. Every mutation rewrites the whole file.

use crate::store::{read_lines, write_lines};
use crate::Result;
use dockpick_config::Config;
use std::path::{Path, PathBuf};

/// Outcome of adding a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered set of favorite container names backed by a file
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    /// Store at the location named by the configuration
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::at(config.favorites_path()?))
    }

    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All favorites in file order
    pub fn list(&self) -> Result<Vec<String>> {
        read_lines(&self.path)
    }

    pub fn is_favorite(&self, name: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|f| f == name))
    }

    /// Favorite at a 1-based position
    pub fn get(&self, index: usize) -> Result<Option<String>> {
        if index == 0 {
            return Ok(None);
        }
        Ok(self.list()?.into_iter().nth(index - 1))
    }

    pub fn add(&self, name: &str) -> Result<AddOutcome> {
        let mut favorites = self.list()?;
        if favorites.iter().any(|f| f == name) {
            tracing::warn!("{} is already a favorite", name);
            return Ok(AddOutcome::AlreadyPresent);
        }
        favorites.push(name.to_string());
        write_lines(&self.path, &favorites)?;
        Ok(AddOutcome::Added)
    }

    /// Remove a favorite; removing an absent name is a no-op
    pub fn remove(&self, name: &str) -> Result<()> {
        let favorites = self.list()?;
        if !favorites.iter().any(|f| f == name) {
            return Ok(());
        }
        let kept: Vec<String> = favorites.into_iter().filter(|f| f != name).collect();
        write_lines(&self.path, &kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FavoritesStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = FavoritesStore::at(tmp.path().join("favorites"));
        (tmp, store)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_tmp, store) = store();
        assert_eq!(store.add("web").unwrap(), AddOutcome::Added);
        assert_eq!(store.add("web").unwrap(), AddOutcome::AlreadyPresent);
        assert_eq!(store.list().unwrap(), vec!["web"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (_tmp, store) = store();
        store.remove("ghost").unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());

        store.add("web").unwrap();
        store.remove("ghost").unwrap();
        assert_eq!(store.list().unwrap(), vec!["web"]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (_tmp, store) = store();
        for name in ["zeta", "alpha", "mid"] {
            store.add(name).unwrap();
        }
        store.remove("alpha").unwrap();
        store.add("alpha").unwrap();
        assert_eq!(store.list().unwrap(), vec!["zeta", "mid", "alpha"]);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "zeta\nmid\nalpha\n"
        );
    }

    #[test]
    fn test_get_is_one_based() {
        let (_tmp, store) = store();
        store.add("first").unwrap();
        store.add("second").unwrap();
        assert_eq!(store.get(0).unwrap(), None);
        assert_eq!(store.get(1).unwrap().as_deref(), Some("first"));
        assert_eq!(store.get(2).unwrap().as_deref(), Some("second"));
        assert_eq!(store.get(3).unwrap(), None);
    }

    #[test]
    fn test_is_favorite() {
        let (_tmp, store) = store();
        store.add("web").unwrap();
        assert!(store.is_favorite("web").unwrap());
        assert!(!store.is_favorite("web-server").unwrap());
    }
}
