//! Process-wide collection-name → repository registry.

use crate::{DataError, DataResult, EntityStream, Repository};
use indexmap::IndexMap;
use labkit_model::{Entity, EntityType, Value};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// The single lookup point mapping collection names to (possibly decorated)
/// repositories.
///
/// Explicitly owned and dependency-injected rather than ambient global
/// state. Lookups from concurrent requests take the read lock; registration
/// and removal are serialized behind the write lock, so a reader never
/// observes a partially-registered repository. Listing order is insertion
/// order.
pub struct DataService {
    state: RwLock<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    repositories: IndexMap<String, Arc<dyn Repository>>,
    /// Names that were registered once and later removed. Kept to
    /// distinguish "already removed" from "never existed".
    retired: HashSet<String>,
}

impl DataService {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    fn read(&self) -> DataResult<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|_| DataError::Storage("registry lock poisoned".to_string()))
    }

    fn write(&self) -> DataResult<std::sync::RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|_| DataError::Storage("registry lock poisoned".to_string()))
    }

    /// Registers a repository under its collection name.
    pub fn add_repository(&self, repository: Arc<dyn Repository>) -> DataResult<()> {
        let name = repository.entity_type().id().to_string();
        let mut state = self.write()?;
        if state.repositories.contains_key(&name) {
            return Err(DataError::DuplicateRepository { name });
        }
        debug!(collection = %name, "registering repository");
        state.retired.remove(&name);
        state.repositories.insert(name, repository);
        Ok(())
    }

    /// Removes a registered repository.
    ///
    /// Fails with [`DataError::UnknownRepository`] for a name that never
    /// existed and [`DataError::RepositoryRetired`] for one already removed.
    pub fn remove_repository(&self, name: &str) -> DataResult<()> {
        let mut state = self.write()?;
        if state.repositories.shift_remove(name).is_some() {
            debug!(collection = %name, "removing repository");
            state.retired.insert(name.to_string());
            return Ok(());
        }
        if state.retired.contains(name) {
            Err(DataError::RepositoryRetired {
                name: name.to_string(),
            })
        } else {
            Err(DataError::UnknownRepository {
                name: name.to_string(),
            })
        }
    }

    /// Replaces the repository registered under `name`, e.g. to swap in a
    /// differently-decorated chain.
    pub fn replace_repository(
        &self,
        name: &str,
        repository: Arc<dyn Repository>,
    ) -> DataResult<()> {
        let mut state = self.write()?;
        if !state.repositories.contains_key(name) {
            return Err(DataError::UnknownRepository {
                name: name.to_string(),
            });
        }
        state.repositories.insert(name.to_string(), repository);
        Ok(())
    }

    /// Resolves a repository by collection name.
    pub fn repository(&self, name: &str) -> DataResult<Arc<dyn Repository>> {
        let state = self.read()?;
        state
            .repositories
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::UnknownRepository {
                name: name.to_string(),
            })
    }

    pub fn has_repository(&self, name: &str) -> DataResult<bool> {
        Ok(self.read()?.repositories.contains_key(name))
    }

    /// Registered collection names, in registration order.
    pub fn names(&self) -> DataResult<Vec<String>> {
        Ok(self.read()?.repositories.keys().cloned().collect())
    }

    /// Schema of a registered collection.
    pub fn entity_type(&self, name: &str) -> DataResult<Arc<EntityType>> {
        Ok(self.repository(name)?.entity_type())
    }

    // ── Convenience passthroughs ─────────────────────────────────

    pub fn add_entity(&self, name: &str, entity: Entity) -> DataResult<()> {
        self.repository(name)?.add(entity)
    }

    pub fn add_entities(&self, name: &str, entities: EntityStream) -> DataResult<usize> {
        self.repository(name)?.add_stream(entities)
    }

    pub fn update_entity(&self, name: &str, entity: Entity) -> DataResult<()> {
        self.repository(name)?.update(entity)
    }

    pub fn delete_entity(&self, name: &str, entity: Entity) -> DataResult<()> {
        self.repository(name)?.delete(entity)
    }

    pub fn find_one_by_id(&self, name: &str, id: &Value) -> DataResult<Option<Entity>> {
        self.repository(name)?.find_one_by_id(id)
    }

    pub fn count(&self, name: &str) -> DataResult<u64> {
        self.repository(name)?.count()
    }
}

impl Default for DataService {
    fn default() -> Self {
        Self::new()
    }
}
