//! Immutable dataset snapshot.

use std::collections::HashMap;

use serde::Deserialize;

use super::entity::Entity;
use crate::error::{DatasetErrorKind, Result, ScoreError};

/// Read-only snapshot of all entities for one scoring run.
///
/// Entity positions (indices) are stable for the lifetime of the snapshot
/// and are what peer sets refer to.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entities: Vec<Entity>,
    index: HashMap<u64, usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Wrapped { entities: Vec<Entity> },
    Bare(Vec<Entity>),
}

impl Dataset {
    /// Build a snapshot, rejecting duplicate entity ids.
    pub fn new(entities: Vec<Entity>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            if index.insert(entity.id, i).is_some() {
                return Err(ScoreError::dataset(
                    "building dataset snapshot",
                    DatasetErrorKind::DuplicateEntity(entity.id),
                ));
            }
        }
        Ok(Self { entities, index })
    }

    /// Parse a dataset from JSON: either a bare array of entities or an
    /// object with an `entities` array.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: DatasetFile = serde_json::from_str(content)?;
        let entities = match file {
            DatasetFile::Wrapped { entities } | DatasetFile::Bare(entities) => entities,
        };
        Self::new(entities)
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Position of an entity id in the snapshot
    #[must_use]
    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    #[must_use]
    pub fn by_id(&self, id: u64) -> Option<&Entity> {
        self.index_of(id).and_then(|i| self.entities.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Dataset::new(vec![Entity::new(1, "A"), Entity::new(1, "B")]);
        assert!(matches!(
            result,
            Err(ScoreError::Dataset {
                source: DatasetErrorKind::DuplicateEntity(1),
                ..
            })
        ));
    }

    #[test]
    fn test_lookup_by_id() {
        let ds = Dataset::new(vec![Entity::new(10, "A"), Entity::new(4, "B")]).unwrap();
        assert_eq!(ds.index_of(4), Some(1));
        assert_eq!(ds.by_id(10).map(|e| e.name.as_str()), Some("A"));
        assert!(ds.by_id(99).is_none());
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_from_json_both_shapes() {
        let bare = r#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]"#;
        let wrapped = r#"{"entities": [{"id": 1, "name": "A"}]}"#;
        assert_eq!(Dataset::from_json_str(bare).unwrap().len(), 2);
        assert_eq!(Dataset::from_json_str(wrapped).unwrap().len(), 1);
        assert!(Dataset::from_json_str("{").is_err());
    }
}
