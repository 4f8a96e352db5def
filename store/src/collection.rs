//! Normalized, insertion-ordered collections of records keyed by id.
//!
//! Every operation takes `&self` and returns a new collection; the receiver is
//! never modified. Unaffected entries keep their relative order.

use crate::domain::{DomainObject, EntityId};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when a record cannot be keyed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The record has not been persisted yet, so it has no key.
    #[error("Record has no id")]
    MissingId,
}

/// An insertion-ordered map from record id to record.
///
/// Equality compares the id → record mapping only; insertion order is a
/// presentation detail.
#[derive(Debug, Clone)]
pub struct IdMap<V> {
    order: Vec<EntityId>,
    entries: HashMap<EntityId, V>,
}

impl<V> IdMap<V> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&V> {
        self.entries.get(&id)
    }

    /// Whether a record is stored under `id`.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Records in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }
}

impl<V> IdMap<V>
where
    V: DomainObject + Clone,
{
    /// Build a collection from a list of persisted records.
    ///
    /// A later record with an already seen id replaces the earlier one in
    /// its original position.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingId`] if any record is transient.
    pub fn from_list<I>(records: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = V>,
    {
        let mut map = Self::new();
        for record in records {
            map.insert_in_place(record)?;
        }
        Ok(map)
    }

    /// A new collection with `record` stored under its id.
    ///
    /// A record already stored under that id is replaced in place.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingId`] if the record is transient.
    pub fn with_element(&self, record: V) -> Result<Self, CollectionError> {
        let mut next = self.clone();
        next.insert_in_place(record)?;
        Ok(next)
    }

    /// A new collection with the stored record replaced by `record`.
    ///
    /// Same as [`IdMap::with_element`]; the name documents intent at
    /// update call sites.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingId`] if the record is transient.
    pub fn with_updated_element(&self, record: V) -> Result<Self, CollectionError> {
        self.with_element(record)
    }

    /// A new collection without the record stored under `id`.
    ///
    /// Removing an absent id returns an equal collection.
    #[must_use]
    pub fn without_id(&self, id: EntityId) -> Self {
        let mut next = self.clone();
        if next.entries.remove(&id).is_some() {
            next.order.retain(|existing| *existing != id);
        }
        next
    }

    /// A new collection without `record`.
    ///
    /// A transient record cannot be stored, so removing one is a no-op.
    #[must_use]
    pub fn without_element(&self, record: &V) -> Self {
        record
            .id()
            .map_or_else(|| self.clone(), |id| self.without_id(id))
    }

    fn insert_in_place(&mut self, record: V) -> Result<(), CollectionError> {
        let id = record.id().ok_or(CollectionError::MissingId)?;
        if self.entries.insert(id, record).is_none() {
            self.order.push(id);
        }
        Ok(())
    }
}

impl<V> Default for IdMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for IdMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for IdMap<V> {}
