//! Metadata service collaborator — schema directory and repository creation.

use crate::MapperResult;
use labkit_data::{DataService, InMemoryRepository, Repository};
use labkit_model::EntityType;
use std::sync::{Arc, RwLock};

/// Directory of known schemas plus the ability to create (and register) a
/// repository for a new one.
///
/// Backed by the platform's metadata store in production; the engine only
/// needs these two capabilities.
pub trait MetaDataService: Send + Sync {
    /// Creates the physical repository for a new entity type and registers
    /// it with the data service.
    fn create_repository(&self, entity_type: EntityType) -> MapperResult<Arc<dyn Repository>>;

    /// All known schemas, in registration order.
    fn entity_types(&self) -> MapperResult<Vec<Arc<EntityType>>>;
}

/// Metadata service over [`InMemoryRepository`] backends.
pub struct InMemoryMetaDataService {
    data_service: Arc<DataService>,
    entity_types: RwLock<Vec<Arc<EntityType>>>,
}

impl InMemoryMetaDataService {
    pub fn new(data_service: Arc<DataService>) -> Self {
        Self {
            data_service,
            entity_types: RwLock::new(Vec::new()),
        }
    }

    /// Records a schema without creating a repository, e.g. for abstract
    /// types that only exist to be extended.
    pub fn register_entity_type(&self, entity_type: Arc<EntityType>) {
        self.entity_types
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(entity_type);
    }
}

impl MetaDataService for InMemoryMetaDataService {
    fn create_repository(&self, entity_type: EntityType) -> MapperResult<Arc<dyn Repository>> {
        let entity_type = Arc::new(entity_type);
        let repository: Arc<dyn Repository> =
            Arc::new(InMemoryRepository::new(Arc::clone(&entity_type)));
        self.data_service.add_repository(Arc::clone(&repository))?;
        self.register_entity_type(entity_type);
        Ok(repository)
    }

    fn entity_types(&self) -> MapperResult<Vec<Arc<EntityType>>> {
        Ok(self
            .entity_types
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
