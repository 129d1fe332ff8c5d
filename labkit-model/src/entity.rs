//! Schema-bound, mutable key/value records.

use crate::{Attribute, EntityType, ModelError, ModelResult, Value};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// A record instance bound to an [`EntityType`].
///
/// Every key present must be a declared attribute of the owning type, and a
/// stored value's runtime type must match the attribute's declared type.
/// Both invariants are enforced by [`Entity::set`]; readers may therefore
/// trust the map without re-checking.
#[derive(Debug, Clone)]
pub struct Entity {
    entity_type: Arc<EntityType>,
    values: HashMap<String, Value>,
}

impl Entity {
    /// Creates an empty entity of the given type.
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            entity_type,
            values: HashMap::new(),
        }
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    /// The value of the identifier attribute, if set.
    pub fn id_value(&self) -> Option<&Value> {
        self.values.get(self.entity_type.id_attribute())
    }

    /// Raw read of one attribute value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Sets one attribute value, enforcing the schema invariants.
    ///
    /// `None` clears the attribute and is only allowed when it is nullable.
    pub fn set(&mut self, name: &str, value: Option<Value>) -> ModelResult<()> {
        let attribute = self.entity_type.attribute(name).ok_or_else(|| {
            ModelError::UnknownAttribute {
                entity_type: self.entity_type.id().to_string(),
                attribute: name.to_string(),
            }
        })?;
        match value {
            Some(value) => {
                if !value.matches(attribute.data_type) {
                    return Err(ModelError::TypeMismatch {
                        attribute: name.to_string(),
                        expected: attribute.data_type,
                        actual: value.kind(),
                    });
                }
                self.values.insert(name.to_string(), value);
            }
            None => {
                if !attribute.nullable {
                    return Err(ModelError::NotNullable {
                        attribute: name.to_string(),
                    });
                }
                self.values.remove(name);
            }
        }
        Ok(())
    }

    // ── Typed getters ────────────────────────────────────────────

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_long)
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_double)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(Value::as_date)
    }

    pub fn get_datetime(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(Value::as_datetime)
    }

    pub fn get_ref(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_ref_id)
    }

    pub fn get_multi_ref(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_multi_ref)
    }

    /// Names of the attributes that currently hold a value, in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.entity_type
            .attributes()
            .iter()
            .map(|a| a.name.as_str())
            .filter(|name| self.values.contains_key(*name))
    }

    /// Returns true if the attribute is declared and computed.
    pub fn is_computed(&self, name: &str) -> bool {
        self.entity_type
            .attribute(name)
            .is_some_and(Attribute::is_computed)
    }
}
