//! Post-update listener notification decorator.

use crate::{DataResult, EntityStream, Query, Repository};
use labkit_model::{Entity, EntityType, Value};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Observer for updates to one specific entity.
///
/// A listener watches a single record by id and receives a notification
/// after every update that touches it. Listeners are registered against a
/// specific decorator instance and live for its lifetime, typically one
/// request scope.
pub trait EntityListener: Send + Sync {
    /// Identifier value of the watched entity.
    fn entity_id(&self) -> Value;

    /// Invoked after the watched entity has been updated.
    fn post_update(&self, entity: &Entity);
}

/// Repository decorator that notifies registered listeners after updates.
///
/// Update operations delegate to the inner repository first; every updated
/// entity whose id matches a registered listener's watched id triggers that
/// listener's [`EntityListener::post_update`]. Streamed updates notify per
/// element as the inner repository consumes the stream, preserving order and
/// single consumption. All other operations delegate unchanged.
pub struct ListenerRepositoryDecorator {
    inner: Arc<dyn Repository>,
    listeners: Mutex<Vec<Arc<dyn EntityListener>>>,
}

impl ListenerRepositoryDecorator {
    pub fn new(inner: Arc<dyn Repository>) -> Self {
        Self {
            inner,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Registers a listener. Registering the same listener twice is
    /// idempotent for delivery; it is notified once per update.
    pub fn add_listener(&self, listener: Arc<dyn EntityListener>) {
        self.lock().push(listener);
    }

    /// Unregisters a listener by identity.
    pub fn remove_listener(&self, listener: &Arc<dyn EntityListener>) {
        self.lock().retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Registered listeners, deduplicated by identity so a listener
    /// registered more than once is still delivered to once per update.
    fn snapshot(&self) -> Vec<Arc<dyn EntityListener>> {
        let mut listeners: Vec<Arc<dyn EntityListener>> = Vec::new();
        for listener in self.lock().iter() {
            if !listeners.iter().any(|l| Arc::ptr_eq(l, listener)) {
                listeners.push(Arc::clone(listener));
            }
        }
        listeners
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn EntityListener>>> {
        // Listener notification is side-effect only; a poisoned lock still
        // holds a usable listener list.
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(listeners: &[Arc<dyn EntityListener>], entity: &Entity) {
        let Some(id) = entity.id_value() else {
            return;
        };
        for listener in listeners {
            if listener.entity_id() == *id {
                debug!(
                    entity_type = entity.entity_type().id(),
                    id = %id,
                    "notifying entity listener"
                );
                listener.post_update(entity);
            }
        }
    }
}

impl Repository for ListenerRepositoryDecorator {
    fn entity_type(&self) -> Arc<EntityType> {
        self.inner.entity_type()
    }

    fn count(&self) -> DataResult<u64> {
        self.inner.count()
    }

    fn find_one_by_id(&self, id: &Value) -> DataResult<Option<Entity>> {
        self.inner.find_one_by_id(id)
    }

    fn find_all(&self, query: &Query) -> DataResult<Vec<Entity>> {
        self.inner.find_all(query)
    }

    fn add(&self, entity: Entity) -> DataResult<()> {
        self.inner.add(entity)
    }

    fn add_stream(&self, entities: EntityStream) -> DataResult<usize> {
        self.inner.add_stream(entities)
    }

    fn update(&self, entity: Entity) -> DataResult<()> {
        let updated = entity.clone();
        self.inner.update(entity)?;
        Self::notify(&self.snapshot(), &updated);
        Ok(())
    }

    fn update_stream(&self, entities: EntityStream) -> DataResult<()> {
        let listeners = self.snapshot();
        if listeners.is_empty() {
            return self.inner.update_stream(entities);
        }
        self.inner
            .update_stream(entities.inspect(move |entity| Self::notify(&listeners, entity)))
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
