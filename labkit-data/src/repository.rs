//! The storage-facing repository contract.

use crate::{DataResult, EntityStream, Query};
use labkit_model::{Entity, EntityType, Value};
use std::sync::Arc;

/// Streaming CRUD contract for one entity collection.
///
/// Implemented by physical storage backends and, transparently, by every
/// repository decorator. Stream-accepting operations consume the stream
/// exactly once, in order; batch iteration pulls one batch at a time, so
/// memory stays bounded to a single batch regardless of collection size.
/// Batch N is fully applied before batch N+1 is requested.
pub trait Repository: Send + Sync {
    /// Schema of the collection this repository stores.
    fn entity_type(&self) -> Arc<EntityType>;

    /// Number of records in the collection.
    fn count(&self) -> DataResult<u64>;

    /// Looks up one record by its identifier value.
    fn find_one_by_id(&self, id: &Value) -> DataResult<Option<Entity>>;

    /// All records matching the query, in storage order.
    fn find_all(&self, query: &Query) -> DataResult<Vec<Entity>>;

    /// Inserts one record.
    fn add(&self, entity: Entity) -> DataResult<()>;

    /// Inserts a stream of records, returning the number written.
    ///
    /// Decorators that fan writes out return the expanded unit count, not
    /// the original stream length.
    fn add_stream(&self, entities: EntityStream) -> DataResult<usize>;

    /// Updates one existing record.
    fn update(&self, entity: Entity) -> DataResult<()>;

    /// Updates a stream of existing records.
    fn update_stream(&self, entities: EntityStream) -> DataResult<()>;

    /// Deletes one record.
    fn delete(&self, entity: Entity) -> DataResult<()>;

    /// Deletes a stream of records.
    fn delete_stream(&self, entities: EntityStream) -> DataResult<()>;

    /// Iterates the collection in fixed-size batches.
    ///
    /// The consumer is invoked once per batch, in storage order; a consumer
    /// error aborts iteration and propagates. A started batch always runs to
    /// completion — there is no mid-batch cancellation.
    fn for_each_batched(
        &self,
        batch_size: usize,
        consumer: &mut dyn FnMut(Vec<Entity>) -> DataResult<()>,
    ) -> DataResult<()>;
}

impl std::fmt::Debug for dyn Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("entity_type", &self.entity_type().id())
            .finish()
    }
}
