//! Computed-attribute entity decorator.

use crate::{DataError, DataResult};
use labkit_model::{Attribute, Entity, EntityType, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Evaluates one computed attribute's expression against a record.
///
/// The evaluation engine itself is an external collaborator; the core treats
/// an evaluator as a pure function of the record.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, entity: &Entity) -> DataResult<Option<Value>>;
}

/// Builds evaluators for expression-carrying attributes.
pub trait ExpressionEvaluatorFactory: Send + Sync {
    fn create(
        &self,
        attribute: &Attribute,
        entity_type: &EntityType,
    ) -> DataResult<Arc<dyn ExpressionEvaluator>>;
}

/// Entity decorator that serves computed attributes from their evaluators.
///
/// The per-record analogue of the repository decorators: reads of a computed
/// attribute return the evaluator's result without consulting the stored
/// value, reads of any other attribute delegate to the wrapped entity, and
/// writes to a computed attribute fail — derived attributes are not
/// assignable.
pub struct EntityWithComputedAttributes {
    entity: Entity,
    evaluators: HashMap<String, Arc<dyn ExpressionEvaluator>>,
}

impl EntityWithComputedAttributes {
    /// Wraps an entity, building one evaluator per expression-carrying
    /// attribute of its schema. Fails fast if the factory rejects an
    /// expression; a malformed schema never produces a half-working record.
    pub fn new(entity: Entity, factory: &dyn ExpressionEvaluatorFactory) -> DataResult<Self> {
        let entity_type = Arc::clone(entity.entity_type());
        let mut evaluators = HashMap::new();
        for attribute in entity_type.attributes() {
            if attribute.is_computed() {
                let evaluator = factory.create(attribute, &entity_type)?;
                evaluators.insert(attribute.name.clone(), evaluator);
            }
        }
        Ok(Self { entity, evaluators })
    }

    /// Reads one attribute, computed or stored.
    pub fn get(&self, name: &str) -> DataResult<Option<Value>> {
        match self.evaluators.get(name) {
            Some(evaluator) => evaluator.evaluate(&self.entity),
            None => Ok(self.entity.get(name).cloned()),
        }
    }

    /// Writes one attribute; computed attributes are rejected.
    pub fn set(&mut self, name: &str, value: Option<Value>) -> DataResult<()> {
        if self.evaluators.contains_key(name) {
            return Err(DataError::ComputedAttributeWrite {
                attribute: name.to_string(),
            });
        }
        self.entity.set(name, value)?;
        Ok(())
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        self.entity.entity_type()
    }

    pub fn id_value(&self) -> Option<&Value> {
        self.entity.id_value()
    }

    /// Unwraps the decorated entity.
    pub fn into_inner(self) -> Entity {
        self.entity
    }
}
