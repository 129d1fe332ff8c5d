//! Per-locale write fan-out decorator.

use crate::{DataResult, EntityStream, Query, Repository};
use labkit_model::{Entity, EntityType, Value};
use std::sync::Arc;
use tracing::debug;

/// Repository decorator that fans each write out to every active locale.
///
/// Each written entity is expanded into one copy per configured locale code:
/// the copy carries the locale in the locale attribute and is re-keyed as
/// `{id}-{locale}` so the per-locale rows coexist. Every copy is delegated
/// individually to the inner repository; stream writes report the expanded
/// unit count, not the original stream length. Reads, deletes and batch
/// iteration delegate unchanged.
#[derive(Debug)]
pub struct LocaleRepositoryDecorator {
    inner: Arc<dyn Repository>,
    locale_attribute: String,
    locales: Vec<String>,
}

impl LocaleRepositoryDecorator {
    /// Fails fast if the wrapped schema does not declare the locale
    /// attribute — a misconfigured chain should never accept writes.
    pub fn new(
        inner: Arc<dyn Repository>,
        locale_attribute: &str,
        locales: Vec<String>,
    ) -> DataResult<Self> {
        let entity_type = inner.entity_type();
        if entity_type.attribute(locale_attribute).is_none() {
            return Err(labkit_model::ModelError::UnknownAttribute {
                entity_type: entity_type.id().to_string(),
                attribute: locale_attribute.to_string(),
            }
            .into());
        }
        // Re-keying appends the locale code, which only works for string ids.
        if let Some(id_attr) = entity_type.attribute(entity_type.id_attribute()) {
            if id_attr.data_type != labkit_model::AttributeType::String {
                return Err(labkit_model::ModelError::TypeMismatch {
                    attribute: id_attr.name.clone(),
                    expected: labkit_model::AttributeType::String,
                    actual: id_attr.data_type,
                }
                .into());
            }
        }
        Ok(Self {
            inner,
            locale_attribute: locale_attribute.to_string(),
            locales,
        })
    }

    /// One localized copy of the entity per configured locale, re-keyed
    /// with the locale code.
    fn fan_out(&self, entity: &Entity) -> DataResult<Vec<Entity>> {
        let entity_type = entity.entity_type();
        let id_attribute = entity_type.id_attribute().to_string();
        let base_id = entity.get_string(&id_attribute).map(str::to_string);
        let mut copies = Vec::with_capacity(self.locales.len());
        for locale in &self.locales {
            let mut copy = entity.clone();
            copy.set(&self.locale_attribute, Some(Value::String(locale.clone())))?;
            if let Some(base_id) = &base_id {
                copy.set(
                    &id_attribute,
                    Some(Value::String(format!("{base_id}-{locale}"))),
                )?;
            }
            copies.push(copy);
        }
        Ok(copies)
    }
}

impl Repository for LocaleRepositoryDecorator {
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
        for copy in self.fan_out(&entity)? {
            self.inner.add(copy)?;
        }
        Ok(())
    }

    fn add_stream(&self, entities: EntityStream) -> DataResult<usize> {
        let mut written = 0;
        for entity in entities {
            for copy in self.fan_out(&entity)? {
                self.inner.add(copy)?;
                written += 1;
            }
        }
        debug!(
            entity_type = self.inner.entity_type().id(),
            written, "locale fan-out wrote expanded units"
        );
        Ok(written)
    }

    fn update(&self, entity: Entity) -> DataResult<()> {
        for copy in self.fan_out(&entity)? {
            self.inner.update(copy)?;
        }
        Ok(())
    }

    fn update_stream(&self, entities: EntityStream) -> DataResult<()> {
        for entity in entities {
            for copy in self.fan_out(&entity)? {
                self.inner.update(copy)?;
            }
        }
        Ok(())
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
