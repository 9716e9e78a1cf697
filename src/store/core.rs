use crate::error::{Error, Result};
use crate::ids::RecordId;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use super::record::Record;

/// In-memory store for one record type.
///
/// Each type gets its own `Store`, shared by handle (typically inside the
/// application state behind an `Arc`). A single `RwLock` guards every read
/// and mutation, so concurrent dispatches never observe a torn store.
/// Records are cloned in and out; the store exclusively owns what it holds.
pub struct Store<T: Record> {
    records: RwLock<HashMap<RecordId, T>>,
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Store<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of the current members. Order is unspecified.
    #[must_use]
    pub fn all(&self) -> Vec<T> {
        self.records.read().values().cloned().collect()
    }

    /// Look up a record by identity.
    ///
    /// # Errors
    ///
    /// [`Error::RecordNotFound`] if no record with `id` is stored.
    pub fn find(&self, id: &str) -> Result<T> {
        self.safe_find(id).ok_or_else(|| Error::RecordNotFound {
            model: T::schema().model(),
            id: id.to_string(),
        })
    }

    /// Like [`Store::find`] but returns `None` instead of failing.
    #[must_use]
    pub fn safe_find(&self, id: &str) -> Option<T> {
        self.records.read().get(id).cloned()
    }

    /// Persist `record`, assigning an identity on first save.
    ///
    /// Saving a record whose identity is already stored replaces the stored
    /// copy. The hooks run outside the lock.
    pub fn save(&self, record: &mut T) -> RecordId {
        let (id, assigned) = match record.id() {
            Some(id) => (id.clone(), false),
            None => {
                let id = RecordId::generate();
                record.fields_mut().assign_id(id.clone());
                (id, true)
            }
        };
        record.before_save();

        let replaced = self
            .records
            .write()
            .insert(id.clone(), record.clone())
            .is_some();
        debug!(
            model = T::schema().model(),
            id = %id,
            assigned,
            replaced,
            "Record saved"
        );

        record.after_save();
        id
    }

    /// Remove `record` if it is stored. Unsaved or absent records are a no-op.
    /// Returns whether anything was removed.
    pub fn delete(&self, record: &T) -> bool {
        let Some(id) = record.id() else {
            return false;
        };
        let removed = self.records.write().remove(id.as_str()).is_some();
        debug!(model = T::schema().model(), id = %id, removed, "Record deleted");
        removed
    }

    pub fn delete_all(&self) {
        let mut records = self.records.write();
        let count = records.len();
        records.clear();
        debug!(model = T::schema().model(), count, "Store cleared");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
