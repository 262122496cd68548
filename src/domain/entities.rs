//! Domain entities: core data structures

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{Validate, ValidationRules};

/// A stored entity with a server-assigned id and timestamps.
///
/// Implementors own the mapping between their payload and the full record;
/// the collection service only ever goes through these hooks.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Caller-supplied fields, without id or timestamps.
    type Payload: Validate + Clone + Debug;

    /// Lowercase entity name used in messages and logs.
    const ENTITY: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> u64;

    fn updated_at(&self) -> Option<u64>;

    /// Build a fresh record. `updated_at` starts absent.
    fn from_payload(id: String, created_at: u64, payload: Self::Payload) -> Self;

    /// Replace every payload field and stamp `updated_at`.
    /// `id` and `created_at` are left untouched.
    fn apply(&mut self, payload: Self::Payload, updated_at: u64);
}

/// A standing or felled tree registered in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub id: String,
    pub species: String,
    pub diameter: f64,
    pub length: f64,
    /// Nanoseconds since the Unix epoch
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

/// Input for creating or updating a [`Tree`].
///
/// Missing fields deserialize to their empty value and are then rejected
/// by validation rather than by the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreePayload {
    pub species: String,
    pub diameter: f64,
    pub length: f64,
}

impl Validate for TreePayload {
    fn fields_present(&self, rules: &ValidationRules) -> bool {
        rules.text_present(&self.species)
            && rules.number_present(self.diameter)
            && rules.number_present(self.length)
    }
}

impl Record for Tree {
    type Payload = TreePayload;
    const ENTITY: &'static str = "tree";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn updated_at(&self) -> Option<u64> {
        self.updated_at
    }

    fn from_payload(id: String, created_at: u64, payload: TreePayload) -> Self {
        Self {
            id,
            species: payload.species,
            diameter: payload.diameter,
            length: payload.length,
            created_at,
            updated_at: None,
        }
    }

    fn apply(&mut self, payload: TreePayload, updated_at: u64) {
        self.species = payload.species;
        self.diameter = payload.diameter;
        self.length = payload.length;
        self.updated_at = Some(updated_at);
    }
}

/// A timber lot offered by a merchant.
///
/// `tree_id` and `merchant_id` are plain references; nothing checks that
/// they resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timber {
    pub id: String,
    pub tree_id: String,
    pub merchant_id: String,
    pub price: f64,
    pub status: String,
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

/// Input for creating or updating a [`Timber`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimberPayload {
    pub tree_id: String,
    pub merchant_id: String,
    pub price: f64,
    pub status: String,
}

impl Validate for TimberPayload {
    fn fields_present(&self, rules: &ValidationRules) -> bool {
        rules.text_present(&self.tree_id)
            && rules.text_present(&self.merchant_id)
            && rules.number_present(self.price)
            && rules.text_present(&self.status)
    }
}

impl Record for Timber {
    type Payload = TimberPayload;
    const ENTITY: &'static str = "timber";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn updated_at(&self) -> Option<u64> {
        self.updated_at
    }

    fn from_payload(id: String, created_at: u64, payload: TimberPayload) -> Self {
        Self {
            id,
            tree_id: payload.tree_id,
            merchant_id: payload.merchant_id,
            price: payload.price,
            status: payload.status,
            created_at,
            updated_at: None,
        }
    }

    fn apply(&mut self, payload: TimberPayload, updated_at: u64) {
        self.tree_id = payload.tree_id;
        self.merchant_id = payload.merchant_id;
        self.price = payload.price;
        self.status = payload.status;
        self.updated_at = Some(updated_at);
    }
}
