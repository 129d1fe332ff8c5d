//! The mapping engine — applies mapping targets to repositories.

use crate::{
    AlgorithmEvaluator, EntityMapping, Incompatibility, MapperError, MapperResult, MappingConfig,
    MappingProject, MappingProjectRepository, MappingTarget, MetaDataService, PermissionService,
    Progress,
};
use labkit_data::{DataError, DataService, EntityStream, Repository};
use labkit_model::{Attribute, Entity, EntityType};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Name of the synthetic provenance attribute. When injected, every mapped
/// entity records which source collection it came from.
const SOURCE: &str = "source";

/// Applies user-defined mappings to transform source collections into a
/// target collection, batched and idempotent.
///
/// Execution is request-scoped and synchronous; the engine pulls one batch
/// at a time and fully applies it before requesting the next. Repositories
/// are resolved through the [`DataService`], so decorator chains apply
/// uniformly. The engine assumes a single writer per target collection
/// during an apply; concurrent applies to one target are out of contract.
pub struct MappingService {
    data_service: Arc<DataService>,
    algorithms: Arc<dyn AlgorithmEvaluator>,
    projects: Arc<dyn MappingProjectRepository>,
    permissions: Arc<dyn PermissionService>,
    meta: Arc<dyn MetaDataService>,
    config: MappingConfig,
}

impl MappingService {
    pub fn new(
        data_service: Arc<DataService>,
        algorithms: Arc<dyn AlgorithmEvaluator>,
        projects: Arc<dyn MappingProjectRepository>,
        permissions: Arc<dyn PermissionService>,
        meta: Arc<dyn MetaDataService>,
        config: MappingConfig,
    ) -> Self {
        Self {
            data_service,
            algorithms,
            projects,
            permissions,
            meta,
            config,
        }
    }

    // ── Project CRUD ─────────────────────────────────────────────

    /// Creates a project with one target derived from a registered schema.
    pub fn add_mapping_project(
        &self,
        name: &str,
        target_collection: &str,
    ) -> MapperResult<MappingProject> {
        let target_type = self.data_service.entity_type(target_collection)?;
        let mut project = MappingProject::new(name);
        project.add_target(MappingTarget::new((*target_type).clone()));
        self.projects.add(project.clone())?;
        Ok(project)
    }

    pub fn delete_mapping_project(&self, identifier: &str) -> MapperResult<()> {
        self.projects.delete(identifier)
    }

    pub fn update_mapping_project(&self, project: MappingProject) -> MapperResult<()> {
        self.projects.update(project)
    }

    pub fn mapping_project(&self, identifier: &str) -> MapperResult<MappingProject> {
        self.projects
            .get(identifier)?
            .ok_or_else(|| MapperError::UnknownProject {
                id: identifier.to_string(),
            })
    }

    pub fn all_mapping_projects(&self) -> MapperResult<Vec<MappingProject>> {
        self.projects.list()
    }

    /// Clones a project under an automatically chosen name: `Name - Copy`,
    /// then `Name - Copy (2)`, `(3)`, … until an unused name is found.
    pub fn clone_mapping_project(&self, identifier: &str) -> MapperResult<MappingProject> {
        let project = self.mapping_project(identifier)?;
        let mut clone_name = format!("{} - Copy", project.name);
        let mut attempt = 2;
        while self.projects.exists_by_name(&clone_name)? {
            clone_name = format!("{} - Copy ({attempt})", project.name);
            attempt += 1;
        }
        self.clone_project(project, &clone_name)
    }

    /// Clones a project under an explicit name.
    pub fn clone_mapping_project_as(
        &self,
        identifier: &str,
        clone_name: &str,
    ) -> MapperResult<MappingProject> {
        let project = self.mapping_project(identifier)?;
        self.clone_project(project, clone_name)
    }

    fn clone_project(
        &self,
        mut project: MappingProject,
        clone_name: &str,
    ) -> MapperResult<MappingProject> {
        project.regenerate_identifier();
        project.name = clone_name.to_string();
        self.projects.add(project.clone())?;
        Ok(project)
    }

    // ── Apply ────────────────────────────────────────────────────

    /// Applies a mapping target, writing transformed entities into the
    /// collection `target_collection`.
    ///
    /// Derives the target schema from the mapping target (optionally with an
    /// injected provenance attribute), creates or compatibility-checks the
    /// target repository, then streams every source mapping through the
    /// algorithm evaluator in batches. Self-referencing targets get a full
    /// second pass so within-collection references resolve. Partial writes
    /// are left in place on failure.
    pub fn apply_mappings(
        &self,
        mapping_target: &MappingTarget,
        target_collection: &str,
        add_source_attribute: bool,
        package_id: Option<&str>,
        label: Option<&str>,
        progress: &dyn Progress,
    ) -> MapperResult<()> {
        let target_metadata = Self::create_target_metadata(
            mapping_target,
            target_collection,
            add_source_attribute,
            package_id,
            label,
        )?;
        let target_repo = self.resolve_target_repository(target_collection, target_metadata)?;
        self.apply_mappings_internal(mapping_target, target_repo.as_ref(), progress)
    }

    fn create_target_metadata(
        mapping_target: &MappingTarget,
        target_collection: &str,
        add_source_attribute: bool,
        package_id: Option<&str>,
        label: Option<&str>,
    ) -> MapperResult<EntityType> {
        let mut metadata = mapping_target
            .target
            .with_id(target_collection)
            .with_label(label.unwrap_or(target_collection));
        if let Some(package_id) = package_id {
            metadata = metadata.with_package(package_id);
        }
        if add_source_attribute {
            metadata.add_attribute(Attribute::string(SOURCE))?;
        }
        Ok(metadata)
    }

    /// Resolves the live target repository, creating it (plus the baseline
    /// write grant) when absent and compatibility-checking it when present.
    fn resolve_target_repository(
        &self,
        target_collection: &str,
        target_metadata: EntityType,
    ) -> MapperResult<Arc<dyn Repository>> {
        if !self.data_service.has_repository(target_collection)? {
            let repo = self.meta.create_repository(target_metadata.clone())?;
            self.permissions.grant_write_permission(&target_metadata)?;
            Ok(repo)
        } else {
            let repo = self.data_service.repository(target_collection)?;
            Self::compare_target_metadatas(&repo.entity_type(), &target_metadata)?;
            Ok(repo)
        }
    }

    fn apply_mappings_internal(
        &self,
        mapping_target: &MappingTarget,
        target_repo: &dyn Repository,
        progress: &dyn Progress,
    ) -> MapperResult<()> {
        let target_id = target_repo.entity_type().id().to_string();
        info!(target = %target_id, "applying mappings to repository");
        let result = (|| {
            self.apply_mappings_to_repositories(mapping_target, target_repo, progress)?;
            if target_repo.entity_type().has_self_references() {
                info!(
                    target = %target_id,
                    "self reference found, applying the mapping a second time to set references"
                );
                self.apply_mappings_to_repositories(mapping_target, target_repo, progress)?;
            }
            Ok(())
        })();
        match result {
            Ok(()) => {
                info!(target = %target_id, "done applying mappings to repository");
                Ok(())
            }
            Err(err) => {
                // Partial writes stay in place: a diagnosable state beats a
                // silently emptied target.
                error!(target = %target_id, error = %err, "error applying mappings to the target");
                Err(err)
            }
        }
    }

    fn apply_mappings_to_repositories(
        &self,
        mapping_target: &MappingTarget,
        target_repo: &dyn Repository,
        progress: &dyn Progress,
    ) -> MapperResult<()> {
        for source_mapping in &mapping_target.entity_mappings {
            self.apply_mapping_to_repo(source_mapping, target_repo, progress)?;
        }
        Ok(())
    }

    fn apply_mapping_to_repo(
        &self,
        source_mapping: &EntityMapping,
        target_repo: &dyn Repository,
        progress: &dyn Progress,
    ) -> MapperResult<()> {
        let source_repo = self.data_service.repository(&source_mapping.source)?;
        let source_type = source_repo.entity_type();
        let target_type = target_repo.entity_type();

        progress.status(&format!("Mapping source [{}]...", source_type.label()));
        let mut counter: u64 = 0;

        // Write mode is chosen once from target emptiness at mapping start:
        // insert-only fast path when safe, row-by-row upsert otherwise.
        let insert_only = target_repo.count()? == 0;
        let mut failure: Option<MapperError> = None;
        let walk = source_repo.for_each_batched(self.config.batch_size, &mut |batch| {
            let processed = batch.len() as u64;
            let outcome = if insert_only {
                self.map_and_add_batch(
                    source_mapping,
                    target_repo,
                    &target_type,
                    &source_type,
                    batch,
                )
            } else {
                self.map_and_upsert_batch(
                    source_mapping,
                    target_repo,
                    &target_type,
                    &source_type,
                    batch,
                )
            };
            match outcome {
                Ok(()) => {
                    progress.increment(1);
                    counter += processed;
                    Ok(())
                }
                Err(err) => {
                    failure = Some(err);
                    Err(DataError::Storage("mapping batch aborted".to_string()))
                }
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        walk?;

        progress.status(&format!(
            "Mapped {counter} [{}] entities.",
            source_type.label()
        ));
        Ok(())
    }

    fn map_and_add_batch(
        &self,
        source_mapping: &EntityMapping,
        target_repo: &dyn Repository,
        target_type: &Arc<EntityType>,
        source_type: &Arc<EntityType>,
        batch: Vec<Entity>,
    ) -> MapperResult<()> {
        let mut mapped = Vec::with_capacity(batch.len());
        for source_entity in batch {
            mapped.push(self.apply_mapping_to_entity(
                source_mapping,
                &source_entity,
                target_type,
                source_type,
            )?);
        }
        target_repo.add_stream(EntityStream::from(mapped))?;
        Ok(())
    }

    fn map_and_upsert_batch(
        &self,
        source_mapping: &EntityMapping,
        target_repo: &dyn Repository,
        target_type: &Arc<EntityType>,
        source_type: &Arc<EntityType>,
        batch: Vec<Entity>,
    ) -> MapperResult<()> {
        for source_entity in batch {
            let mapped = self.apply_mapping_to_entity(
                source_mapping,
                &source_entity,
                target_type,
                source_type,
            )?;
            let id = mapped
                .id_value()
                .cloned()
                .ok_or_else(|| DataError::MissingIdValue {
                    entity_type: target_type.id().to_string(),
                })?;
            if target_repo.find_one_by_id(&id)?.is_none() {
                target_repo.add(mapped)?;
            } else {
                target_repo.update(mapped)?;
            }
        }
        Ok(())
    }

    fn apply_mapping_to_entity(
        &self,
        source_mapping: &EntityMapping,
        source_entity: &Entity,
        target_type: &Arc<EntityType>,
        source_type: &Arc<EntityType>,
    ) -> MapperResult<Entity> {
        let mut target = Entity::new(Arc::clone(target_type));
        if target_type.attribute(SOURCE).is_some() {
            target.set(SOURCE, Some(source_mapping.source.as_str().into()))?;
        }
        for attribute_mapping in &source_mapping.attribute_mappings {
            let value = self
                .algorithms
                .apply(attribute_mapping, source_entity, source_type)?;
            target.set(&attribute_mapping.target_attribute, value)?;
        }
        Ok(target)
    }

    // ── Compatibility ────────────────────────────────────────────

    /// All known non-abstract schemas the mapping target could be applied
    /// into without error.
    pub fn compatible_entity_types(
        &self,
        target: &EntityType,
    ) -> MapperResult<Vec<Arc<EntityType>>> {
        Ok(self
            .meta
            .entity_types()?
            .into_iter()
            .filter(|candidate| !candidate.is_abstract())
            .filter(|candidate| Self::compare_target_metadatas(candidate, target).is_ok())
            .collect())
    }

    /// Checks that the mapping target's schema fits the live target schema.
    ///
    /// Rules: the mapping target cannot contain attributes absent from the
    /// target repository; same-named attributes must have the same declared
    /// type; reference attributes must reference the same collection on both
    /// sides.
    pub fn compare_target_metadatas(
        target_repo_type: &EntityType,
        mapping_target_type: &EntityType,
    ) -> Result<(), Incompatibility> {
        let repo_attributes: HashMap<&str, &Attribute> = target_repo_type
            .attributes()
            .iter()
            .map(|a| (a.name.as_str(), a))
            .collect();

        for mapping_attr in mapping_target_type.attributes() {
            let Some(repo_attr) = repo_attributes.get(mapping_attr.name.as_str()) else {
                return Err(Incompatibility::MissingAttribute {
                    attribute: mapping_attr.name.clone(),
                });
            };
            if mapping_attr.data_type != repo_attr.data_type {
                return Err(Incompatibility::TypeMismatch {
                    attribute: mapping_attr.name.clone(),
                    mapping_type: mapping_attr.data_type,
                    target_attribute: repo_attr.name.clone(),
                    target_type: repo_attr.data_type,
                });
            }
            if mapping_attr.data_type.is_reference() {
                let mapping_ref = mapping_attr.ref_entity.as_deref().unwrap_or_default();
                let target_ref = repo_attr.ref_entity.as_deref().unwrap_or_default();
                if mapping_ref != target_ref {
                    return Err(Incompatibility::RefEntityMismatch {
                        attribute: mapping_attr.name.clone(),
                        mapping_ref: mapping_ref.to_string(),
                        target_attribute: repo_attr.name.clone(),
                        target_ref: target_ref.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
