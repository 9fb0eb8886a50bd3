use crate::{
    error::{DebugError, Result},
    models::*,
};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use serde::Deserialize;
use std::path::Path;

pub mod http;

pub use http::HttpExpandClient;

/// Access to the authorization service's `expand` operation
#[async_trait]
pub trait ExpandClient: Send + Sync {
    /// Expand `relation` on `object`.
    ///
    /// `Ok(None)` means the service answered without a tree.
    async fn expand(&self, object: &str, relation: &str) -> Result<Option<RewriteTree>>;
}

/// One captured expansion, as stored in a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureEntry {
    pub object: String,
    pub relation: String,
    pub tree: RewriteTree,
}

/// In-memory expansion service for tests and offline replay
pub struct StaticExpandClient {
    trees: DashMap<TupleKey, RewriteTree>,
    failures: DashSet<TupleKey>,
    calls: Mutex<Vec<TupleKey>>,
}

impl StaticExpandClient {
    pub fn new() -> Self {
        Self {
            trees: DashMap::new(),
            failures: DashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `(object, relation)` with `tree`
    pub fn with_tree(self, object: &str, relation: &str, tree: RewriteTree) -> Self {
        self.insert_tree(object, relation, tree);
        self
    }

    /// Make `(object, relation)` fail as if the transport was down
    pub fn with_failure(self, object: &str, relation: &str) -> Self {
        self.failures.insert(TupleKey::new(object, relation));
        self
    }

    pub fn insert_tree(&self, object: &str, relation: &str, tree: RewriteTree) {
        self.trees.insert(TupleKey::new(object, relation), tree);
    }

    /// Load captured trees from a JSON array of `{object, relation, tree}`
    pub fn from_fixture_str(json: &str) -> Result<Self> {
        let entries: Vec<FixtureEntry> = serde_json::from_str(json)
            .map_err(|e| DebugError::Fixture(format!("invalid fixture: {}", e)))?;

        let client = Self::new();
        for entry in entries {
            client.insert_tree(&entry.object, &entry.relation, entry.tree);
        }
        Ok(client)
    }

    pub fn from_fixture_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DebugError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_fixture_str(&json)
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<TupleKey> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for StaticExpandClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpandClient for StaticExpandClient {
    async fn expand(&self, object: &str, relation: &str) -> Result<Option<RewriteTree>> {
        let key = TupleKey::new(object, relation);
        self.calls.lock().push(key.clone());

        if self.failures.contains(&key) {
            return Err(DebugError::Injected(key.to_string()));
        }

        Ok(self.trees.get(&key).map(|entry| entry.value().clone()))
    }
}
