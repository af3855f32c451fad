//! DataStore trait for fetching data that is not present in the tree under evaluation.
//!
//! Conditions are usually evaluated against a partial tree (the pending edit). Paths
//! outside that tree are read from the backing store through this trait.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;
use yangcond_types::{DataNode, path};

/// Error type for store write operations.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Failed to write '{path}': {message}")]
    WriteFailed { path: String, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Read access to the backing data store.
///
/// Lookups that miss return `None`; the evaluator treats a miss as "does not exist".
pub trait DataStore: Send + Sync + Debug {
    /// Fetch the subtree rooted at `path`.
    ///
    /// The returned node is named after `path` so that its own paths resolve absolutely.
    fn get_tree(&self, path: &str) -> Option<DataNode>;

    /// Fetch the value stored at exactly `path`.
    fn get_value(&self, path: &str) -> Option<String> {
        self.get_tree(path)?.value().map(str::to_string)
    }

    /// Returns a human-readable name for this store (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A store with nothing in it, for evaluating against the in-memory tree alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStore;

impl DataStore for NoStore {
    fn get_tree(&self, _path: &str) -> Option<DataNode> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// An in-memory path/value store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` for paths that are not absolute and
    /// `StoreError::WriteFailed` if the internal lock is poisoned.
    pub fn set(&self, path: impl Into<String>, value: impl Into<String>) -> Result<(), StoreError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(StoreError::InvalidPath(path));
        }
        let mut entries = self.entries.write().map_err(|_| StoreError::WriteFailed {
            path: path.clone(),
            message: "store lock poisoned".to_string(),
        })?;
        entries.insert(path, value.into());
        Ok(())
    }

    /// Remove the value at `path`.
    ///
    /// Returns `None` if the lock is poisoned or nothing was stored there.
    pub fn remove(&self, path: &str) -> Option<String> {
        self.entries.write().ok()?.remove(path)
    }

    /// Does nothing if the lock is poisoned.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl DataStore for InMemoryStore {
    fn get_tree(&self, target: &str) -> Option<DataNode> {
        let entries = self.entries.read().ok()?;
        let below = path::join(target, "");
        let mut tree = DataNode::new(target);
        let mut found = false;
        for (key, value) in entries.range(target.to_string()..) {
            if !key.starts_with(target) {
                break;
            }
            if key == target {
                tree.set_value(value.as_str());
                found = true;
            } else if key.starts_with(below.as_str()) {
                found |= tree.insert(key, value.as_str());
            }
        }
        found.then_some(tree)
    }

    fn get_value(&self, path: &str) -> Option<String> {
        self.entries.read().ok()?.get(path).cloned()
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
