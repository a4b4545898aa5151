//! # Entity Collection
//!
//! A normalized store of records: an id → record map plus an explicit
//! ordering of ids.
//!
//! ## Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   order:    [ "u1", "u2", "u3" ]          entities: { u1, u2, u3 }      │
//! │                                                                         │
//! │   • one record per id                                                   │
//! │   • every id in `order` has an entry in `entities`, and vice versa      │
//! │   • order is insertion order, unless set_all() replaces everything     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::record::Record;

/// Records keyed by id, iterated in a stable order.
#[derive(Debug, Clone)]
pub struct EntityCollection<R> {
    entities: HashMap<String, R>,
    order: Vec<String>,
}

impl<R> Default for EntityCollection<R> {
    fn default() -> Self {
        EntityCollection {
            entities: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<R: Record> EntityCollection<R> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection, adopting the order of `records`.
    ///
    /// A later record with an id seen earlier in the same batch replaces
    /// the earlier one but keeps its position.
    pub fn set_all(&mut self, records: impl IntoIterator<Item = R>) {
        self.entities.clear();
        self.order.clear();
        for record in records {
            self.add(record);
        }
    }

    /// Appends a record. An existing id is replaced in place.
    pub fn add(&mut self, record: R) {
        let id = record.id().to_string();
        if self.entities.insert(id.clone(), record).is_none() {
            self.order.push(id);
        }
    }

    /// Patches one record in place.
    pub fn update<F>(&mut self, id: &str, f: F) -> CoreResult<&R>
    where
        F: FnOnce(&mut R),
    {
        let record = self
            .entities
            .get_mut(id)
            .ok_or_else(|| CoreError::not_found(R::KIND, id))?;
        f(record);
        Ok(record)
    }

    /// Removes a record, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<R> {
        let record = self.entities.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(record)
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in collection order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Records in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Clones the records out in collection order.
    pub fn to_vec(&self) -> Vec<R> {
        self.iter().cloned().collect()
    }
}
