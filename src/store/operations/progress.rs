use async_trait::async_trait;

use crate::contracts::ProgressRepo;
use crate::error::CoreError;
use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::types::ProgressRecord;

impl Store {
    pub fn get_progress(
        &self,
        unit_uid: &str,
        level: i32,
    ) -> Result<Option<ProgressRecord>, StoreError> {
        let key = keys::progress_key(unit_uid, level)?;
        match self.progress.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        let key = keys::progress_key(&record.unit_uid, record.level)?;
        let value = Self::serialize(record)?;
        self.progress.insert(key.as_bytes(), value)?;
        Ok(())
    }

    pub fn get_all_progress(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        let mut records = Vec::new();
        for item in self.progress.iter() {
            let (_, raw) = item?;
            records.push(Self::deserialize::<ProgressRecord>(&raw)?);
        }
        Ok(records)
    }

    /// Ascending by level; the key encoding shifts levels by one so the
    /// unseen record (-1) sorts first.
    pub fn get_progress_for_unit(
        &self,
        unit_uid: &str,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let prefix = keys::progress_prefix(unit_uid)?;
        let mut records = Vec::new();
        for item in self.progress.scan_prefix(prefix.as_bytes()) {
            let (_, raw) = item?;
            records.push(Self::deserialize::<ProgressRecord>(&raw)?);
        }
        Ok(records)
    }

    pub fn clear_progress(&self) -> Result<(), StoreError> {
        self.progress.clear()?;
        Ok(())
    }
}

#[async_trait]
impl ProgressRepo for Store {
    async fn get(&self, unit_uid: &str, level: i32) -> Result<Option<ProgressRecord>, CoreError> {
        Ok(self.get_progress(unit_uid, level)?)
    }

    async fn upsert(&self, record: &ProgressRecord) -> Result<(), CoreError> {
        Ok(self.upsert_progress(record)?)
    }

    async fn get_all(&self) -> Result<Vec<ProgressRecord>, CoreError> {
        Ok(self.get_all_progress()?)
    }

    async fn get_all_for_unit(&self, unit_uid: &str) -> Result<Vec<ProgressRecord>, CoreError> {
        Ok(self.get_progress_for_unit(unit_uid)?)
    }

    async fn clear(&self) -> Result<(), CoreError> {
        Ok(self.clear_progress()?)
    }
}
