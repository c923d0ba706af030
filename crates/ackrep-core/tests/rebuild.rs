//! End-to-end catalog rebuilds over repository fixtures.

use std::collections::BTreeSet;

use ackrep_common_config::CatalogSchema;
use ackrep_core::{dump, Catalog, CatalogError, EntityKind, MetadataLoader, RepoLoader};
use ackrep_test_utils::{assert_err, assert_ok, descriptor, RepoFixture};

fn loader() -> RepoLoader {
    assert_ok!(RepoLoader::new(&CatalogSchema::default()))
}

#[test]
fn rebuild_indexes_every_descriptor_with_its_directory() {
    let repo = RepoFixture::new();
    repo.entity("problem_specifications/double_pendulum", "PSPEC", "problem_specification");
    repo.entity("problem_solutions/pendulum_lqr", "SOLVE", "problem_solution");
    repo.entity("method_packages/lqr", "METHD", "method");

    let (catalog, report) = assert_ok!(loader().load_catalog(repo.root()));
    assert!(report.is_clean());

    let grouped = catalog.all_grouped_by_variant();
    let total: usize = grouped.values().map(Vec::len).sum();
    assert_eq!(total, 3);

    let base_paths: BTreeSet<_> = catalog.iter().map(|e| e.base_path().to_path_buf()).collect();
    let expected: BTreeSet<_> = [
        "problem_specifications/double_pendulum",
        "problem_solutions/pendulum_lqr",
        "method_packages/lqr",
    ]
    .into_iter()
    .map(|rel| repo.path(rel))
    .collect();
    assert_eq!(base_paths, expected);
    assert!(catalog.iter().all(|e| e.base_path().is_absolute()));
}

#[test]
fn duplicate_keys_abort_and_leave_catalog_empty() {
    let repo = RepoFixture::new();
    repo.entity("docs/a", "DOC01", "doc");
    repo.entity("datasets/b", "DUPED", "dataset");

    let loader = loader();
    let mut catalog = Catalog::new();
    assert_ok!(loader.rebuild(&mut catalog, repo.root()));
    assert_eq!(catalog.len(), 2);

    repo.entity("docs/c", "DUPED", "doc");
    let err = assert_err!(loader.rebuild(&mut catalog, repo.root()));
    match err {
        CatalogError::DuplicateKey { key, first, second } => {
            assert_eq!(key.as_str(), "DUPED");
            let paths = BTreeSet::from([first, second]);
            assert_eq!(paths, BTreeSet::from([repo.path("datasets/b"), repo.path("docs/c")]));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(catalog.is_empty());
}

#[test]
fn template_directories_are_not_cataloged() {
    let repo = RepoFixture::new();
    repo.entity("docs/real", "REAL1", "doc");
    repo.entity("docs/_template", "TMPL1", "doc");
    repo.entity("docs/nested_template_dir/inner", "TMPL2", "doc");

    let (catalog, _) = assert_ok!(loader().load_catalog(repo.root()));
    assert_eq!(catalog.len(), 1);
    assert!(catalog.find_by_key("REAL1").is_ok());
    assert!(matches!(
        catalog.find_by_key("TMPL1"),
        Err(CatalogError::NotFound { .. })
    ));
}

#[test]
fn rebuild_replaces_previous_contents() {
    let repo = RepoFixture::new();
    repo.entity("docs/a", "DOC01", "doc");

    let loader = loader();
    let mut catalog = Catalog::new();
    assert_ok!(loader.rebuild(&mut catalog, repo.root()));

    std::fs::remove_dir_all(repo.path("docs/a")).unwrap();
    repo.entity("docs/b", "DOC02", "doc");
    assert_ok!(loader.rebuild(&mut catalog, repo.root()));

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.all_by_variant(EntityKind::Doc)[0].key().as_str(), "DOC02");
}

#[test]
fn descriptor_roundtrips_through_dump() {
    let repo = RepoFixture::new();
    let path = repo.write_descriptor("docs/a", &descriptor("DOC01", "doc", "Primer"));
    let loader = MetadataLoader::new(&CatalogSchema::default());

    let loaded = assert_ok!(loader.load(&path, true));
    let text = assert_ok!(dump(&loaded, Some(path.as_path())));
    let reloaded = assert_ok!(loader.load(&path, true));

    assert_eq!(reloaded, loaded);
    assert!(text.starts_with("pk: DOC01\ntype: doc\n"));
}

#[test]
fn entity_mapping_feeds_back_into_the_factory() {
    let repo = RepoFixture::new();
    let mut mapping = descriptor("SOLVE", "problem_solution", "Pendulum LQR");
    mapping.insert("solution_file".into(), "solution.py".into());
    repo.write_descriptor("problem_solutions/lqr", &mapping);

    let (catalog, _) = assert_ok!(loader().load_catalog(repo.root()));
    let entity = assert_ok!(catalog.find_by_key("SOLVE"));

    let regenerated = repo.write_descriptor("copy/lqr", &entity.to_mapping());
    let copy = assert_ok!(loader().load_entity(&regenerated));
    assert_eq!(copy.common, entity.common);
    assert_eq!(copy.variant, entity.variant);
}

#[cfg(unix)]
#[test]
fn linked_descriptors_are_cataloged() {
    let repo = RepoFixture::new();
    let text = assert_ok!(dump(&descriptor("LINKD", "doc", "Shared"), None));
    let source = repo.write_file("shared/source.yml", &text);
    std::fs::create_dir_all(repo.path("docs/d")).unwrap();
    std::os::unix::fs::symlink(&source, repo.path("docs/d/metadata.yml")).unwrap();

    let (catalog, report) = assert_ok!(loader().load_catalog(repo.root()));
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(catalog.len(), 1);
    let entity = assert_ok!(catalog.find_by_key("LINKD"));
    assert_eq!(entity.base_path(), repo.path("docs/d"));
}

#[test]
fn non_utf8_descriptor_is_reported_as_malformed() {
    let repo = RepoFixture::new();
    repo.entity("docs/good", "DOC01", "doc");
    std::fs::create_dir_all(repo.path("docs/bad")).unwrap();
    std::fs::write(repo.path("docs/bad/metadata.yml"), b"pk: AB\xffCD\ntype: doc\n").unwrap();

    let (catalog, report) = assert_ok!(loader().load_catalog(repo.root()));
    assert_eq!(catalog.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, repo.path("docs/bad/metadata.yml"));
    assert!(matches!(
        report.failures[0].error,
        CatalogError::MalformedDescriptor { .. }
    ));
}
