//! Ledger facade
//!
//! The query/update entry points of the timber-trade ledger. Queries
//! (`list_*`, `get_*`) never mutate; updates touch exactly one record in
//! exactly one collection.

use std::sync::Arc;

use crate::application::services::{TimberCollection, TreeCollection};
use crate::application::ApplicationResult;
use crate::domain::{Timber, TimberPayload, Tree, TreePayload};

/// Record counts per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSummary {
    pub trees: usize,
    pub timbers: usize,
}

/// Entry points over the tree and timber collections.
pub struct Ledger {
    trees: Arc<TreeCollection>,
    timbers: Arc<TimberCollection>,
}

impl Ledger {
    pub fn new(trees: Arc<TreeCollection>, timbers: Arc<TimberCollection>) -> Self {
        Self { trees, timbers }
    }

    // ---- trees ----

    pub fn list_trees(&self) -> ApplicationResult<Vec<Tree>> {
        self.trees.list()
    }

    pub fn get_tree(&self, id: &str) -> ApplicationResult<Tree> {
        self.trees.get(id)
    }

    pub fn add_tree(&self, payload: TreePayload) -> ApplicationResult<Tree> {
        self.trees.create(payload)
    }

    pub fn update_tree(&self, id: &str, payload: TreePayload) -> ApplicationResult<Tree> {
        self.trees.update(id, payload)
    }

    pub fn delete_tree(&self, id: &str) -> ApplicationResult<Tree> {
        self.trees.delete(id)
    }

    // ---- timbers ----

    pub fn list_timbers(&self) -> ApplicationResult<Vec<Timber>> {
        self.timbers.list()
    }

    pub fn get_timber(&self, id: &str) -> ApplicationResult<Timber> {
        self.timbers.get(id)
    }

    pub fn add_timber(&self, payload: TimberPayload) -> ApplicationResult<Timber> {
        self.timbers.create(payload)
    }

    pub fn update_timber(&self, id: &str, payload: TimberPayload) -> ApplicationResult<Timber> {
        self.timbers.update(id, payload)
    }

    pub fn delete_timber(&self, id: &str) -> ApplicationResult<Timber> {
        self.timbers.delete(id)
    }

    pub fn summary(&self) -> ApplicationResult<LedgerSummary> {
        Ok(LedgerSummary {
            trees: self.trees.len()?,
            timbers: self.timbers.len()?,
        })
    }
}
