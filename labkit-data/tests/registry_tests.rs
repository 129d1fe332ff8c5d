mod common;

use common::{person, person_type};
use labkit_data::{DataError, DataService, InMemoryRepository, Repository};
use labkit_model::{Attribute, EntityType, Value};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn repo(name: &str) -> Arc<dyn Repository> {
    let entity_type = Arc::new(
        EntityType::new(name, "id", vec![Attribute::string("id")]).unwrap(),
    );
    Arc::new(InMemoryRepository::new(entity_type))
}

#[test]
fn get_unknown_name_fails() {
    let registry = DataService::new();
    let err = registry.repository("nope").unwrap_err();
    assert!(matches!(err, DataError::UnknownRepository { name } if name == "nope"));
}

#[test]
fn get_returns_registered_instance() {
    let registry = DataService::new();
    let repository = repo("study");
    registry.add_repository(repository.clone()).unwrap();

    let resolved = registry.repository("study").unwrap();
    assert!(Arc::ptr_eq(&resolved, &repository));
}

#[test]
fn duplicate_registration_fails() {
    let registry = DataService::new();
    registry.add_repository(repo("study")).unwrap();
    let err = registry.add_repository(repo("study")).unwrap_err();
    assert!(matches!(err, DataError::DuplicateRepository { name } if name == "study"));
}

#[test]
fn names_keep_registration_order() {
    let registry = DataService::new();
    registry.add_repository(repo("study")).unwrap();
    registry.add_repository(repo("sample")).unwrap();
    registry.add_repository(repo("assay")).unwrap();

    assert_eq!(
        registry.names().unwrap(),
        vec!["study".to_string(), "sample".to_string(), "assay".to_string()]
    );
}

#[test]
fn removed_name_is_distinct_from_never_registered() {
    let registry = DataService::new();
    registry.add_repository(repo("study")).unwrap();
    registry.remove_repository("study").unwrap();

    // get after removal fails as unknown
    assert!(matches!(
        registry.repository("study"),
        Err(DataError::UnknownRepository { .. })
    ));

    // second removal fails differently from a name that never existed
    assert!(matches!(
        registry.remove_repository("study"),
        Err(DataError::RepositoryRetired { name }) if name == "study"
    ));
    assert!(matches!(
        registry.remove_repository("never-there"),
        Err(DataError::UnknownRepository { name }) if name == "never-there"
    ));
}

#[test]
fn re_registration_clears_retirement() {
    let registry = DataService::new();
    registry.add_repository(repo("study")).unwrap();
    registry.remove_repository("study").unwrap();
    registry.add_repository(repo("study")).unwrap();

    assert!(registry.has_repository("study").unwrap());
    registry.remove_repository("study").unwrap();
}

#[test]
fn replace_swaps_the_instance() {
    let registry = DataService::new();
    let first = repo("study");
    let second = repo("study");
    registry.add_repository(first.clone()).unwrap();
    registry.replace_repository("study", second.clone()).unwrap();

    let resolved = registry.repository("study").unwrap();
    assert!(Arc::ptr_eq(&resolved, &second));
    assert!(!Arc::ptr_eq(&resolved, &first));
}

#[test]
fn replace_unknown_name_fails() {
    let registry = DataService::new();
    let err = registry.replace_repository("study", repo("study")).unwrap_err();
    assert!(matches!(err, DataError::UnknownRepository { .. }));
}

#[test]
fn passthroughs_resolve_by_name() {
    let registry = DataService::new();
    let entity_type = person_type();
    registry
        .add_repository(Arc::new(InMemoryRepository::new(entity_type.clone())))
        .unwrap();

    registry
        .add_entity("person", person(&entity_type, "p1", "Ada"))
        .unwrap();
    assert_eq!(registry.count("person").unwrap(), 1);

    let found = registry
        .find_one_by_id("person", &Value::String("p1".into()))
        .unwrap();
    assert_eq!(found.unwrap().get_string("name"), Some("Ada"));
}
