//! Record collection service
//!
//! One generic CRUD service per entity kind. Each operation is a single
//! step against its own store; collections never call each other.

use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{DomainError, Record, Timber, Tree, Validate, ValidationRules};
use crate::infrastructure::traits::{Clock, IdGenerator, OrderedStore};

/// CRUD over records of kind `R`, keyed by generated id.
pub struct Collection<R: Record> {
    store: Arc<dyn OrderedStore<R>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    rules: ValidationRules,
}

pub type TreeCollection = Collection<Tree>;
pub type TimberCollection = Collection<Timber>;

impl<R: Record> Collection<R> {
    /// Create a new collection over `store`.
    pub fn new(
        store: Arc<dyn OrderedStore<R>>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        rules: ValidationRules,
    ) -> Self {
        Self {
            store,
            ids,
            clock,
            rules,
        }
    }

    /// All records in key order.
    pub fn list(&self) -> ApplicationResult<Vec<R>> {
        let records = self.store.values().with_store_context("list", R::ENTITY)?;
        debug!("list: entity={}, count={}", R::ENTITY, records.len());
        Ok(records)
    }

    pub fn get(&self, id: &str) -> ApplicationResult<R> {
        debug!("get: entity={}, id={}", R::ENTITY, id);
        self.store
            .get(id)
            .with_store_context("get", R::ENTITY)?
            .ok_or_else(|| DomainError::not_found(R::ENTITY, id).into())
    }

    /// Validate, assign id and `created_at`, then store.
    pub fn create(&self, payload: R::Payload) -> ApplicationResult<R> {
        payload.validate(&self.rules)?;

        let id = self.ids.generate();
        let record = R::from_payload(id, self.clock.now_nanos(), payload);
        self.store
            .insert(record.id(), record.clone())
            .with_store_context("insert", R::ENTITY)?;

        debug!(
            "create: entity={}, id={}, created_at={}",
            R::ENTITY,
            record.id(),
            record.created_at()
        );
        Ok(record)
    }

    /// Replace payload fields of an existing record.
    ///
    /// The payload is validated before the id is looked up, so a bad payload
    /// against a missing id reports `InvalidInput`.
    pub fn update(&self, id: &str, payload: R::Payload) -> ApplicationResult<R> {
        payload.validate(&self.rules)?;

        let now = self.clock.now_nanos();
        let updated = self
            .store
            .modify(id, &mut |record: &mut R| record.apply(payload.clone(), now))
            .with_store_context("update", R::ENTITY)?
            .ok_or_else(|| DomainError::not_found(R::ENTITY, id))?;

        debug!(
            "update: entity={}, id={}, updated_at={:?}",
            R::ENTITY,
            id,
            updated.updated_at()
        );
        Ok(updated)
    }

    /// Remove and return the record.
    pub fn delete(&self, id: &str) -> ApplicationResult<R> {
        let removed = self
            .store
            .remove(id)
            .with_store_context("remove", R::ENTITY)?
            .ok_or_else(|| DomainError::not_found(R::ENTITY, id))?;

        debug!("delete: entity={}, id={}", R::ENTITY, id);
        Ok(removed)
    }

    pub fn len(&self) -> ApplicationResult<usize> {
        self.store.len().with_store_context("count", R::ENTITY)
    }

    pub fn is_empty(&self) -> ApplicationResult<bool> {
        Ok(self.len()? == 0)
    }
}
