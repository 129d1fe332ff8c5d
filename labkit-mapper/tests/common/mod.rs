//! Shared test doubles and fixtures for the mapping engine tests.

#![allow(dead_code)]

use labkit_data::{
    DataResult, DataService, EntityStream, InMemoryRepository, Query, Repository,
};
use labkit_mapper::{
    AlgorithmEvaluator, AttributeMapping, EntityMapping, InMemoryMappingProjectRepository,
    InMemoryMetaDataService, MapperError, MapperResult, MappingConfig, MappingService,
    PermissionService, Progress,
};
use labkit_model::{Attribute, Entity, EntityType, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Source collection schema used across the engine tests.
pub fn patient_type() -> Arc<EntityType> {
    Arc::new(
        EntityType::new(
            "patients_raw",
            "id",
            vec![
                Attribute::string("id"),
                Attribute::string("full_name"),
                Attribute::int("age"),
            ],
        )
        .unwrap(),
    )
}

pub fn patient(entity_type: &Arc<EntityType>, id: &str, name: &str, age: i32) -> Entity {
    let mut entity = Entity::new(Arc::clone(entity_type));
    entity.set("id", Some(Value::String(id.into()))).unwrap();
    entity
        .set("full_name", Some(Value::String(name.into())))
        .unwrap();
    entity.set("age", Some(Value::Int(age))).unwrap();
    entity
}

/// Target schema the patients map into.
pub fn subject_type() -> EntityType {
    EntityType::new(
        "subject_template",
        "id",
        vec![
            Attribute::string("id"),
            Attribute::string("name"),
            Attribute::int("age"),
        ],
    )
    .unwrap()
}

/// The entity mapping from `patients_raw` into [`subject_type`], copying each
/// attribute by name.
pub fn patient_to_subject_mapping() -> EntityMapping {
    EntityMapping::new("patients_raw")
        .with_attribute_mapping(AttributeMapping::new("id", "id"))
        .with_attribute_mapping(AttributeMapping::new("name", "full_name"))
        .with_attribute_mapping(AttributeMapping::new("age", "age"))
}

/// Evaluator that treats the algorithm string as the name of the source
/// attribute to copy verbatim.
pub struct CopyEvaluator;

impl AlgorithmEvaluator for CopyEvaluator {
    fn apply(
        &self,
        mapping: &AttributeMapping,
        source_entity: &Entity,
        _source_type: &EntityType,
    ) -> MapperResult<Option<Value>> {
        Ok(source_entity.get(&mapping.algorithm).cloned())
    }
}

/// Evaluator that fails on every invocation.
pub struct FailingEvaluator;

impl AlgorithmEvaluator for FailingEvaluator {
    fn apply(
        &self,
        mapping: &AttributeMapping,
        _source_entity: &Entity,
        _source_type: &EntityType,
    ) -> MapperResult<Option<Value>> {
        Err(MapperError::Evaluation {
            attribute: mapping.target_attribute.clone(),
            message: "synthetic failure".to_string(),
        })
    }
}

/// Progress double recording status messages and batch increments.
#[derive(Default)]
pub struct RecordingProgress {
    pub statuses: Mutex<Vec<String>>,
    pub increments: AtomicU64,
}

impl RecordingProgress {
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn batches(&self) -> u64 {
        self.increments.load(Ordering::SeqCst)
    }
}

impl Progress for RecordingProgress {
    fn status(&self, message: &str) {
        self.statuses.lock().unwrap().push(message.to_string());
    }

    fn increment(&self, batches: u64) {
        self.increments.fetch_add(batches, Ordering::SeqCst);
    }
}

/// Permission double recording which collections received a write grant.
#[derive(Default)]
pub struct RecordingPermissions {
    pub grants: Mutex<Vec<String>>,
}

impl RecordingPermissions {
    pub fn granted(&self) -> Vec<String> {
        self.grants.lock().unwrap().clone()
    }
}

impl PermissionService for RecordingPermissions {
    fn grant_write_permission(&self, entity_type: &EntityType) -> MapperResult<()> {
        self.grants
            .lock()
            .unwrap()
            .push(entity_type.id().to_string());
        Ok(())
    }
}

/// Repository double counting lookups and writes around an in-memory backend.
pub struct CountingRepository {
    inner: InMemoryRepository,
    pub find_one_by_id: Mutex<usize>,
    pub adds: Mutex<usize>,
    pub add_streams: Mutex<usize>,
    pub updates: Mutex<usize>,
}

impl CountingRepository {
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            inner: InMemoryRepository::new(entity_type),
            find_one_by_id: Mutex::new(0),
            adds: Mutex::new(0),
            add_streams: Mutex::new(0),
            updates: Mutex::new(0),
        }
    }
}

impl Repository for CountingRepository {
    fn entity_type(&self) -> Arc<EntityType> {
        self.inner.entity_type()
    }

    fn count(&self) -> DataResult<u64> {
        self.inner.count()
    }

    fn find_one_by_id(&self, id: &Value) -> DataResult<Option<Entity>> {
        *self.find_one_by_id.lock().unwrap() += 1;
        self.inner.find_one_by_id(id)
    }

    fn find_all(&self, query: &Query) -> DataResult<Vec<Entity>> {
        self.inner.find_all(query)
    }

    fn add(&self, entity: Entity) -> DataResult<()> {
        *self.adds.lock().unwrap() += 1;
        self.inner.add(entity)
    }

    fn add_stream(&self, entities: EntityStream) -> DataResult<usize> {
        *self.add_streams.lock().unwrap() += 1;
        self.inner.add_stream(entities)
    }

    fn update(&self, entity: Entity) -> DataResult<()> {
        *self.updates.lock().unwrap() += 1;
        self.inner.update(entity)
    }

    fn update_stream(&self, entities: EntityStream) -> DataResult<()> {
        self.inner.update_stream(entities)
    }

    fn delete(&self, entity: Entity) -> DataResult<()> {
        self.inner.delete(entity)
    }

    fn delete_stream(&self, entities: EntityStream) -> DataResult<()> {
        self.inner.delete_stream(entities)
    }

    fn for_each_batched(
        &self,
        batch_size: usize,
        consumer: &mut dyn FnMut(Vec<Entity>) -> DataResult<()>,
    ) -> DataResult<()> {
        self.inner.for_each_batched(batch_size, consumer)
    }
}

/// Fully wired mapping service with recording collaborators.
pub struct Harness {
    pub data_service: Arc<DataService>,
    pub meta: Arc<InMemoryMetaDataService>,
    pub projects: Arc<InMemoryMappingProjectRepository>,
    pub permissions: Arc<RecordingPermissions>,
    pub service: MappingService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(MappingConfig::default())
    }

    pub fn with_config(config: MappingConfig) -> Self {
        let data_service = Arc::new(DataService::new());
        let meta = Arc::new(InMemoryMetaDataService::new(Arc::clone(&data_service)));
        let projects = Arc::new(InMemoryMappingProjectRepository::new());
        let permissions = Arc::new(RecordingPermissions::default());
        let service = MappingService::new(
            Arc::clone(&data_service),
            Arc::new(CopyEvaluator),
            Arc::clone(&projects) as _,
            Arc::clone(&permissions) as _,
            Arc::clone(&meta) as _,
            config,
        );
        Self {
            data_service,
            meta,
            projects,
            permissions,
            service,
        }
    }

    /// Builds a second engine over the same registry and collaborators but
    /// with a different algorithm evaluator.
    pub fn service_with(&self, algorithms: Arc<dyn AlgorithmEvaluator>) -> MappingService {
        MappingService::new(
            Arc::clone(&self.data_service),
            algorithms,
            Arc::clone(&self.projects) as _,
            Arc::clone(&self.permissions) as _,
            Arc::clone(&self.meta) as _,
            MappingConfig::default(),
        )
    }

    /// Registers a populated `patients_raw` source collection.
    pub fn seed_patients(&self, n: usize) {
        let entity_type = patient_type();
        let repo = Arc::new(InMemoryRepository::new(entity_type.clone()));
        for i in 0..n {
            repo.add(patient(&entity_type, &format!("pt{i}"), &format!("name{i}"), 20 + i as i32))
                .unwrap();
        }
        self.data_service.add_repository(repo).unwrap();
    }
}
