//! The in-memory entity catalog.

use std::collections::{BTreeMap, HashMap};

use ackrep_common_core::EntityKey;
use tracing::warn;

use crate::entity::{Entity, EntityKind};
use crate::error::{CatalogError, Result};

/// Queryable collection of loaded entities.
///
/// Keys are unique across all entity kinds. The catalog is a derived index of
/// the repository on disk and is rebuilt rather than edited.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
    index: HashMap<EntityKey, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }

    /// Add an entity. Fails if another entity of any kind has the same key.
    pub fn insert(&mut self, entity: Entity) -> Result<()> {
        if let Some(&existing) = self.index.get(entity.key()) {
            return Err(CatalogError::DuplicateKey {
                key: entity.key().clone(),
                first: self.entities[existing].base_path.clone(),
                second: entity.base_path,
            });
        }
        self.index.insert(entity.key().clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    /// Replace the contents without uniqueness checks.
    ///
    /// Used to load a catalog from an external snapshot. Duplicate keys are
    /// kept and surface as [`CatalogError::AmbiguousKey`] on lookup.
    pub fn restore(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.clear();
        for entity in entities {
            self.index
                .entry(entity.key().clone())
                .or_insert(self.entities.len());
            self.entities.push(entity);
        }
        if self.index.len() != self.entities.len() {
            warn!(
                entities = self.entities.len(),
                distinct_keys = self.index.len(),
                "restored catalog contains duplicate keys"
            );
        }
    }

    /// The single entity with `key`.
    pub fn find_by_key(&self, key: &str) -> Result<&Entity> {
        let mut matches = self.entities.iter().filter(|e| e.key().as_str() == key);
        match (matches.next(), matches.count()) {
            (None, _) => Err(CatalogError::NotFound {
                key: key.to_string(),
            }),
            (Some(entity), 0) => Ok(entity),
            (Some(_), rest) => Err(CatalogError::AmbiguousKey {
                key: key.to_string(),
                count: rest + 1,
            }),
        }
    }

    /// Entities of one kind, in insertion order.
    pub fn all_by_variant(&self, kind: EntityKind) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.kind() == kind).collect()
    }

    /// Every kind mapped to its entities; kinds without entities map to an
    /// empty list.
    pub fn all_grouped_by_variant(&self) -> BTreeMap<EntityKind, Vec<&Entity>> {
        let mut groups: BTreeMap<EntityKind, Vec<&Entity>> =
            EntityKind::ALL.into_iter().map(|k| (k, Vec::new())).collect();
        for entity in &self.entities {
            groups.entry(entity.kind()).or_default().push(entity);
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(key: &str, kind: EntityKind, dir: &str) -> Entity {
        Entity::new(EntityKey::parse(key).unwrap(), kind).with_base_path(dir)
    }

    #[test]
    fn test_insert_and_find() {
        let mut catalog = Catalog::new();
        catalog.insert(entity("AAAAA", EntityKind::Doc, "/r/a")).unwrap();
        catalog.insert(entity("BBBBB", EntityKind::Method, "/r/b")).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find_by_key("BBBBB").unwrap().kind(), EntityKind::Method);
        assert!(matches!(
            catalog.find_by_key("CCCCC"),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_key_across_kinds() {
        let mut catalog = Catalog::new();
        catalog.insert(entity("AAAAA", EntityKind::Doc, "/r/a")).unwrap();
        let err = catalog
            .insert(entity("AAAAA", EntityKind::Dataset, "/r/b"))
            .unwrap_err();

        match err {
            CatalogError::DuplicateKey { key, first, second } => {
                assert_eq!(key.as_str(), "AAAAA");
                assert_eq!(first, std::path::PathBuf::from("/r/a"));
                assert_eq!(second, std::path::PathBuf::from("/r/b"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut catalog = Catalog::new();
        catalog.insert(entity("AAAAA", EntityKind::Doc, "/r/a")).unwrap();
        catalog.clear();
        catalog.clear();
        assert!(catalog.is_empty());
        // the key is free again
        catalog.insert(entity("AAAAA", EntityKind::Doc, "/r/a")).unwrap();
    }

    #[test]
    fn test_variant_queries_keep_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.insert(entity("DOC02", EntityKind::Doc, "/r/2")).unwrap();
        catalog.insert(entity("MTH01", EntityKind::Method, "/r/m")).unwrap();
        catalog.insert(entity("DOC01", EntityKind::Doc, "/r/1")).unwrap();

        let docs = catalog.all_by_variant(EntityKind::Doc);
        let docs: Vec<&str> = docs.iter().map(|e| e.key().as_str()).collect();
        assert_eq!(docs, vec!["DOC02", "DOC01"]);

        let groups = catalog.all_grouped_by_variant();
        assert_eq!(groups.len(), EntityKind::ALL.len());
        assert_eq!(groups[&EntityKind::Doc].len(), 2);
        assert_eq!(groups[&EntityKind::Method].len(), 1);
        assert!(groups[&EntityKind::Comment].is_empty());
    }

    #[test]
    fn test_restore_makes_duplicates_ambiguous() {
        let mut catalog = Catalog::new();
        catalog.restore([
            entity("AAAAA", EntityKind::Doc, "/r/a"),
            entity("AAAAA", EntityKind::Dataset, "/r/b"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert!(matches!(
            catalog.find_by_key("AAAAA"),
            Err(CatalogError::AmbiguousKey { count: 2, .. })
        ));
    }
}
