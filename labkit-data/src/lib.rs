//! Repository layer for LabKit.
//!
//! Provides the storage-facing contract for entity collections and the
//! cross-cutting behaviors layered over it:
//!
//! - [`Repository`] — streaming CRUD contract for one collection
//! - [`EntityStream`] — lazy, single-pass sequence of entities
//! - [`ListenerRepositoryDecorator`] — post-update listener notification
//! - [`EntityWithComputedAttributes`] — per-record computed-attribute reads
//! - [`LocaleRepositoryDecorator`] — per-locale write fan-out
//! - [`DataService`] — process-wide collection-name → repository registry
//! - [`InMemoryRepository`] — map-backed physical storage stand-in
//!
//! Decorators implement the identical [`Repository`] contract and compose at
//! registry-construction time (innermost = physical storage, outermost =
//! request-facing); callers never know which decorators are present.

mod decorator;
mod error;
mod mem;
mod query;
mod registry;
mod repository;
mod stream;

pub use decorator::computed::{
    EntityWithComputedAttributes, ExpressionEvaluator, ExpressionEvaluatorFactory,
};
pub use decorator::listener::{EntityListener, ListenerRepositoryDecorator};
pub use decorator::locale::LocaleRepositoryDecorator;
pub use error::{DataError, DataResult};
pub use mem::InMemoryRepository;
pub use query::Query;
pub use registry::DataService;
pub use repository::Repository;
pub use stream::EntityStream;
