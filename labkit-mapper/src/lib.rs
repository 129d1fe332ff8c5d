//! Mapping/ETL engine for LabKit.
//!
//! Applies user-defined attribute-level mappings to transform entities from
//! one or more source collections into a target collection:
//!
//! - [`MappingProject`] / [`MappingTarget`] / [`EntityMapping`] /
//!   [`AttributeMapping`] — the four-level mapping specification
//! - [`MappingService`] — schema-compatibility checking, batched streaming
//!   upsert, self-reference second pass, project CRUD and cloning
//! - collaborator traits for the pieces the engine consumes but does not
//!   implement: [`AlgorithmEvaluator`], [`PermissionService`], [`Progress`],
//!   [`MetaDataService`], [`MappingProjectRepository`]
//!
//! The engine resolves repositories through the
//! [`DataService`](labkit_data::DataService) registry, so whatever decorator
//! chain a collection carries applies uniformly to mapping writes.

mod algorithm;
mod config;
mod error;
mod meta;
mod model;
mod permission;
mod progress;
mod project;
mod service;

pub use algorithm::AlgorithmEvaluator;
pub use config::MappingConfig;
pub use error::{Incompatibility, MapperError, MapperResult};
pub use meta::{InMemoryMetaDataService, MetaDataService};
pub use model::{AttributeMapping, EntityMapping, MappingProject, MappingTarget};
pub use permission::PermissionService;
pub use progress::Progress;
pub use project::{InMemoryMappingProjectRepository, MappingProjectRepository};
pub use service::MappingService;
