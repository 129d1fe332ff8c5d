//! Map-backed repository — the physical-storage stand-in.

use crate::{DataError, DataResult, EntityStream, Query, Repository};
use indexmap::IndexMap;
use labkit_model::{Entity, EntityType, Value};
use std::sync::{Arc, RwLock};

/// In-memory repository keyed by the canonical rendering of the id value.
///
/// Rows keep insertion order, so batch iteration replays records in the
/// order they were written. Used as the innermost repository in tests and
/// embedded deployments; production backends implement [`Repository`]
/// against their own storage.
pub struct InMemoryRepository {
    entity_type: Arc<EntityType>,
    rows: RwLock<IndexMap<String, Entity>>,
}

impl InMemoryRepository {
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            entity_type,
            rows: RwLock::new(IndexMap::new()),
        }
    }

    /// Validates collection membership and extracts the row key.
    fn row_key(&self, entity: &Entity) -> DataResult<String> {
        if entity.entity_type().id() != self.entity_type.id() {
            return Err(DataError::WrongEntityType {
                expected: self.entity_type.id().to_string(),
                actual: entity.entity_type().id().to_string(),
            });
        }
        let id = entity.id_value().ok_or_else(|| DataError::MissingIdValue {
            entity_type: self.entity_type.id().to_string(),
        })?;
        Ok(id.to_string())
    }

    fn lock_poisoned() -> DataError {
        DataError::Storage("row lock poisoned".to_string())
    }
}

impl Repository for InMemoryRepository {
    fn entity_type(&self) -> Arc<EntityType> {
        Arc::clone(&self.entity_type)
    }

    fn count(&self) -> DataResult<u64> {
        let rows = self.rows.read().map_err(|_| Self::lock_poisoned())?;
        Ok(rows.len() as u64)
    }

    fn find_one_by_id(&self, id: &Value) -> DataResult<Option<Entity>> {
        let rows = self.rows.read().map_err(|_| Self::lock_poisoned())?;
        Ok(rows.get(&id.to_string()).cloned())
    }

    fn find_all(&self, query: &Query) -> DataResult<Vec<Entity>> {
        let rows = self.rows.read().map_err(|_| Self::lock_poisoned())?;
        Ok(rows.values().filter(|e| query.matches(e)).cloned().collect())
    }

    fn add(&self, entity: Entity) -> DataResult<()> {
        let key = self.row_key(&entity)?;
        let mut rows = self.rows.write().map_err(|_| Self::lock_poisoned())?;
        if rows.contains_key(&key) {
            return Err(DataError::DuplicateEntity {
                entity_type: self.entity_type.id().to_string(),
                id: key,
            });
        }
        rows.insert(key, entity);
        Ok(())
    }

    fn add_stream(&self, entities: EntityStream) -> DataResult<usize> {
        let mut written = 0;
        for entity in entities {
            self.add(entity)?;
            written += 1;
        }
        Ok(written)
    }

    fn update(&self, entity: Entity) -> DataResult<()> {
        let key = self.row_key(&entity)?;
        let mut rows = self.rows.write().map_err(|_| Self::lock_poisoned())?;
        if !rows.contains_key(&key) {
            return Err(DataError::UnknownEntity {
                entity_type: self.entity_type.id().to_string(),
                id: key,
            });
        }
        rows.insert(key, entity);
        Ok(())
    }

    fn update_stream(&self, entities: EntityStream) -> DataResult<()> {
        for entity in entities {
            self.update(entity)?;
        }
        Ok(())
    }

    fn delete(&self, entity: Entity) -> DataResult<()> {
        let key = self.row_key(&entity)?;
        let mut rows = self.rows.write().map_err(|_| Self::lock_poisoned())?;
        if rows.shift_remove(&key).is_none() {
            return Err(DataError::UnknownEntity {
                entity_type: self.entity_type.id().to_string(),
                id: key,
            });
        }
        Ok(())
    }

    fn delete_stream(&self, entities: EntityStream) -> DataResult<()> {
        for entity in entities {
            self.delete(entity)?;
        }
        Ok(())
    }

    fn for_each_batched(
        &self,
        batch_size: usize,
        consumer: &mut dyn FnMut(Vec<Entity>) -> DataResult<()>,
    ) -> DataResult<()> {
        // Snapshot the row order up front; the consumer may write to other
        // repositories while iterating.
        let snapshot: Vec<Entity> = {
            let rows = self.rows.read().map_err(|_| Self::lock_poisoned())?;
            rows.values().cloned().collect()
        };
        for batch in snapshot.chunks(batch_size.max(1)) {
            consumer(batch.to_vec())?;
        }
        Ok(())
    }
}
