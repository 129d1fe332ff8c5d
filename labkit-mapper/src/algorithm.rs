//! Algorithm evaluator collaborator contract.

use crate::{AttributeMapping, MapperResult};
use labkit_model::{Entity, EntityType, Value};

/// Evaluates one attribute mapping's expression against a source record.
///
/// The expression engine is external; the core treats it as a pure function
/// of the mapping, the source entity and its schema. A `None` result writes
/// null into the target attribute. Evaluation errors abort the current
/// apply — there is no partial-row retry.
pub trait AlgorithmEvaluator: Send + Sync {
    fn apply(
        &self,
        mapping: &AttributeMapping,
        source_entity: &Entity,
        source_type: &EntityType,
    ) -> MapperResult<Option<Value>>;
}
