//! Shared test helpers for the repository layer tests.

#![allow(dead_code)]

use labkit_data::{
    DataResult, EntityListener, EntityStream, InMemoryRepository, Query, Repository,
};
use labkit_model::{Attribute, Entity, EntityType, Value};
use std::sync::{Arc, Mutex};

/// Builds the schema used across these tests: a person collection keyed by a
/// string id with a couple of scalar attributes.
pub fn person_type() -> Arc<EntityType> {
    Arc::new(
        EntityType::new(
            "person",
            "id",
            vec![
                Attribute::string("id"),
                Attribute::string("name"),
                Attribute::int("age"),
            ],
        )
        .unwrap(),
    )
}

/// Creates a person entity with the given id and name.
pub fn person(entity_type: &Arc<EntityType>, id: &str, name: &str) -> Entity {
    let mut entity = Entity::new(Arc::clone(entity_type));
    entity.set("id", Some(Value::String(id.to_string()))).unwrap();
    entity
        .set("name", Some(Value::String(name.to_string())))
        .unwrap();
    entity
}

/// Per-operation call counters for [`RecordingRepository`].
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub count: usize,
    pub find_one_by_id: usize,
    pub find_all: usize,
    pub add: usize,
    pub add_stream: usize,
    pub update: usize,
    pub update_stream: usize,
    pub delete: usize,
    pub delete_stream: usize,
    pub for_each_batched: usize,
}

/// Repository double that records every call before delegating to an
/// in-memory backend. Streamed arguments are drained into `seen_updates` /
/// `seen_adds` in consumption order, so tests can assert both delegation
/// counts and unmodified, in-order argument replay.
pub struct RecordingRepository {
    inner: InMemoryRepository,
    pub calls: Mutex<Calls>,
    pub seen_adds: Mutex<Vec<Entity>>,
    pub seen_updates: Mutex<Vec<Entity>>,
}

impl RecordingRepository {
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            inner: InMemoryRepository::new(entity_type),
            calls: Mutex::new(Calls::default()),
            seen_adds: Mutex::new(Vec::new()),
            seen_updates: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    pub fn updated_ids(&self) -> Vec<String> {
        self.seen_updates
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.id_value().map(ToString::to_string))
            .collect()
    }
}

impl Repository for RecordingRepository {
    fn entity_type(&self) -> Arc<EntityType> {
        self.inner.entity_type()
    }

    fn count(&self) -> DataResult<u64> {
        self.calls.lock().unwrap().count += 1;
        self.inner.count()
    }

    fn find_one_by_id(&self, id: &Value) -> DataResult<Option<Entity>> {
        self.calls.lock().unwrap().find_one_by_id += 1;
        self.inner.find_one_by_id(id)
    }

    fn find_all(&self, query: &Query) -> DataResult<Vec<Entity>> {
        self.calls.lock().unwrap().find_all += 1;
        self.inner.find_all(query)
    }

    fn add(&self, entity: Entity) -> DataResult<()> {
        self.calls.lock().unwrap().add += 1;
        self.seen_adds.lock().unwrap().push(entity.clone());
        self.inner.add(entity)
    }

    fn add_stream(&self, entities: EntityStream) -> DataResult<usize> {
        self.calls.lock().unwrap().add_stream += 1;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let written = self
            .inner
            .add_stream(entities.inspect(move |e| sink.lock().unwrap().push(e.clone())))?;
        self.seen_adds.lock().unwrap().extend(seen.lock().unwrap().drain(..));
        Ok(written)
    }

    fn update(&self, entity: Entity) -> DataResult<()> {
        self.calls.lock().unwrap().update += 1;
        self.seen_updates.lock().unwrap().push(entity.clone());
        self.inner.update(entity)
    }

    fn update_stream(&self, entities: EntityStream) -> DataResult<()> {
        self.calls.lock().unwrap().update_stream += 1;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        self.inner
            .update_stream(entities.inspect(move |e| sink.lock().unwrap().push(e.clone())))?;
        self.seen_updates
            .lock()
            .unwrap()
            .extend(seen.lock().unwrap().drain(..));
        Ok(())
    }

    fn delete(&self, entity: Entity) -> DataResult<()> {
        self.calls.lock().unwrap().delete += 1;
        self.inner.delete(entity)
    }

    fn delete_stream(&self, entities: EntityStream) -> DataResult<()> {
        self.calls.lock().unwrap().delete_stream += 1;
        self.inner.delete_stream(entities)
    }

    fn for_each_batched(
        &self,
        batch_size: usize,
        consumer: &mut dyn FnMut(Vec<Entity>) -> DataResult<()>,
    ) -> DataResult<()> {
        self.calls.lock().unwrap().for_each_batched += 1;
        self.inner.for_each_batched(batch_size, consumer)
    }
}

/// Listener double that records every notification it receives.
pub struct RecordingListener {
    watched: Value,
    pub notified: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn watching(id: &str) -> Arc<Self> {
        Arc::new(Self {
            watched: Value::String(id.to_string()),
            notified: Mutex::new(Vec::new()),
        })
    }

    pub fn notification_count(&self) -> usize {
        self.notified.lock().unwrap().len()
    }
}

impl EntityListener for RecordingListener {
    fn entity_id(&self) -> Value {
        self.watched.clone()
    }

    fn post_update(&self, entity: &Entity) {
        let id = entity.id_value().map(ToString::to_string).unwrap_or_default();
        self.notified.lock().unwrap().push(id);
    }
}
