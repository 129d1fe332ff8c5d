//! Core entity model for LabKit.
//!
//! Defines the universal types that all LabKit subsystems depend on:
//! - [`Value`] — a runtime-typed attribute value (string, numbers, dates, refs)
//! - [`Attribute`] / [`AttributeType`] — one column of a collection's schema
//! - [`EntityType`] — the named, ordered attribute set describing a collection
//! - [`Entity`] — a schema-bound key/value record
//!
//! Schemas are data, not compiled types: the mapping engine and the
//! compatibility checker introspect [`EntityType`] at runtime to operate
//! generically over arbitrary collections. These types are consumed by the
//! repository layer, the decorators, and the mapping engine.

mod attribute;
mod entity;
mod entity_type;
mod error;
mod value;

pub use attribute::{Attribute, AttributeType};
pub use entity::Entity;
pub use entity_type::EntityType;
pub use error::{ModelError, ModelResult};
pub use value::Value;
