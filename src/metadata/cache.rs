//! Session cache of opened modules.
//!
//! A module is opened at most once per session. The first outcome for a path is final: a handle
//! is shared by every later lookup and a failure is replayed without touching the file system
//! again. Paths are compared case-insensitively.

use std::{
    collections::HashMap,
    path::Path,
    sync::Arc,
};

use tracing::trace;

use crate::{metadata::view::ModuleView, Error, Result};

/// Case-insensitive identity of a module path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathKey(String);

impl PathKey {
    /// Build the key for `path`
    #[must_use]
    pub fn new(path: &Path) -> Self {
        PathKey(path.to_string_lossy().to_lowercase())
    }
}

enum CacheEntry {
    Open(Arc<ModuleView>),
    Failed { not_found: bool },
}

/// Opened modules of one resolution session, keyed by path.
///
/// # Examples
///
/// ```rust,no_run
/// use dotnav::metadata::cache::ModuleCache;
/// use std::path::Path;
///
/// let mut cache = ModuleCache::new();
/// let first = cache.get_or_open(Path::new("Tests.dll"))?;
/// let second = cache.get_or_open(Path::new("TESTS.DLL"))?;
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// cache.close_all();
/// # Ok::<(), dotnav::Error>(())
/// ```
#[derive(Default)]
pub struct ModuleCache {
    entries: HashMap<PathKey, CacheEntry>,
}

impl ModuleCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the module at `path`, opening it on first use.
    ///
    /// # Errors
    /// Returns the open error on the first failing request for `path`, and
    /// [`Error::ModuleUnavailable`] on every later one.
    pub fn get_or_open(&mut self, path: &Path) -> Result<Arc<ModuleView>> {
        let key = PathKey::new(path);

        match self.entries.get(&key) {
            Some(CacheEntry::Open(view)) => {
                trace!(module = %path.display(), "module cache hit");
                return Ok(view.clone());
            }
            Some(CacheEntry::Failed { not_found }) => {
                trace!(module = %path.display(), "replaying cached module failure");
                return Err(Error::ModuleUnavailable {
                    path: path.to_path_buf(),
                    not_found: *not_found,
                });
            }
            None => {}
        }

        trace!(module = %path.display(), "opening module");
        match ModuleView::from_file(path) {
            Ok(view) => {
                let view = Arc::new(view);
                self.entries.insert(key, CacheEntry::Open(view.clone()));
                Ok(view)
            }
            Err(error) => {
                self.entries.insert(
                    key,
                    CacheEntry::Failed {
                        not_found: error.is_not_found(),
                    },
                );
                Err(error)
            }
        }
    }

    /// Whether `path` has been requested before, successfully or not
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&PathKey::new(path))
    }

    /// Number of paths with a cached outcome
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path has been requested yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached handle and failure
    pub fn close_all(&mut self) {
        trace!(modules = self.entries.len(), "closing module cache");
        self.entries.clear();
    }
}
