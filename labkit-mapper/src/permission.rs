//! Permission grantor collaborator contract.

use crate::MapperResult;
use labkit_model::EntityType;

/// Grants baseline write permission on a newly created target collection.
///
/// Enforcement itself lives outside the core; the engine only invokes the
/// grant after creating a target repository.
pub trait PermissionService: Send + Sync {
    fn grant_write_permission(&self, entity_type: &EntityType) -> MapperResult<()>;
}
