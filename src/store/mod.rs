pub mod keys;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

/// sled-backed adapter implementing every collaborator contract in
/// [`crate::contracts`]. One tree per entity plus two secondary indexes.
#[derive(Debug)]
pub struct Store {
    db: Db,
    pub units: sled::Tree,
    pub translations: sled::Tree,
    pub progress: sled::Tree,
    pub tasks: sled::Tree,
    pub resources: sled::Tree,
    pub examples: sled::Tree,
    // Secondary index trees
    pub unit_key_index: sled::Tree,
    pub tasks_by_unit: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let units = db.open_tree(trees::UNITS)?;
        let translations = db.open_tree(trees::TRANSLATIONS)?;
        let progress = db.open_tree(trees::PROGRESS)?;
        let tasks = db.open_tree(trees::TASKS)?;
        let resources = db.open_tree(trees::RESOURCES)?;
        let examples = db.open_tree(trees::EXAMPLES)?;
        // Secondary index trees
        let unit_key_index = db.open_tree(trees::UNIT_KEY_INDEX)?;
        let tasks_by_unit = db.open_tree(trees::TASKS_BY_UNIT)?;

        Ok(Self {
            db,
            units,
            translations,
            progress,
            tasks,
            resources,
            examples,
            unit_key_index,
            tasks_by_unit,
        })
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
