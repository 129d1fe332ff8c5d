//! Mapping project persistence contract.

use crate::{MapperError, MapperResult, MappingProject};
use std::sync::RwLock;

/// CRUD for mapping projects, keyed by project identifier.
///
/// The name-based existence query supports clone-name collision avoidance.
pub trait MappingProjectRepository: Send + Sync {
    fn add(&self, project: MappingProject) -> MapperResult<()>;
    fn update(&self, project: MappingProject) -> MapperResult<()>;
    fn delete(&self, identifier: &str) -> MapperResult<()>;
    fn get(&self, identifier: &str) -> MapperResult<Option<MappingProject>>;
    fn list(&self) -> MapperResult<Vec<MappingProject>>;
    fn exists_by_name(&self, name: &str) -> MapperResult<bool>;
}

/// Map-backed project repository for tests and embedded use.
pub struct InMemoryMappingProjectRepository {
    projects: RwLock<Vec<MappingProject>>,
}

impl InMemoryMappingProjectRepository {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
        }
    }

    fn lock_read(&self) -> std::sync::RwLockReadGuard<'_, Vec<MappingProject>> {
        self.projects.read().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<MappingProject>> {
        self.projects.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryMappingProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingProjectRepository for InMemoryMappingProjectRepository {
    fn add(&self, project: MappingProject) -> MapperResult<()> {
        self.lock_write().push(project);
        Ok(())
    }

    fn update(&self, project: MappingProject) -> MapperResult<()> {
        let mut projects = self.lock_write();
        match projects.iter_mut().find(|p| p.identifier == project.identifier) {
            Some(existing) => {
                *existing = project;
                Ok(())
            }
            None => Err(MapperError::UnknownProject {
                id: project.identifier,
            }),
        }
    }

    fn delete(&self, identifier: &str) -> MapperResult<()> {
        let mut projects = self.lock_write();
        let before = projects.len();
        projects.retain(|p| p.identifier != identifier);
        if projects.len() == before {
            return Err(MapperError::UnknownProject {
                id: identifier.to_string(),
            });
        }
        Ok(())
    }

    fn get(&self, identifier: &str) -> MapperResult<Option<MappingProject>> {
        Ok(self
            .lock_read()
            .iter()
            .find(|p| p.identifier == identifier)
            .cloned())
    }

    fn list(&self) -> MapperResult<Vec<MappingProject>> {
        Ok(self.lock_read().clone())
    }

    fn exists_by_name(&self, name: &str) -> MapperResult<bool> {
        Ok(self.lock_read().iter().any(|p| p.name == name))
    }
}
