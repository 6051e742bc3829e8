use async_trait::async_trait;
use sled::Transactional;

use crate::contracts::TaskRepo;
use crate::error::CoreError;
use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::types::{Task, TaskType};

impl Store {
    pub fn get_task(&self, uid: &str) -> Result<Option<Task>, StoreError> {
        match self.tasks.get(keys::task_key(uid).as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Upsert by uid, keeping the per-unit index in step: stale pairs from a
    /// previous association list are removed in the same transaction.
    pub fn save_task(&self, task: &Task) -> Result<(), StoreError> {
        let key = keys::task_key(&task.uid);
        let value = Self::serialize(task)?;
        let mut index_keys = Vec::with_capacity(task.associated_units.len());
        for unit_uid in &task.associated_units {
            index_keys.push(keys::task_unit_index_key(unit_uid, &task.uid)?);
        }

        (&self.tasks, &self.tasks_by_unit)
            .transaction(|(tx_tasks, tx_index)| {
                if let Some(old_raw) = tx_tasks.get(key.as_bytes())? {
                    let old_task: Task = serde_json::from_slice(&old_raw).map_err(|error| {
                        sled::transaction::ConflictableTransactionError::Abort(
                            StoreError::Serialization(error),
                        )
                    })?;
                    for unit_uid in &old_task.associated_units {
                        let old_index_key = keys::task_unit_index_key(unit_uid, &old_task.uid)
                            .map_err(sled::transaction::ConflictableTransactionError::Abort)?;
                        tx_index.remove(old_index_key.as_bytes())?;
                    }
                }

                tx_tasks.insert(key.as_bytes(), value.as_slice())?;
                for index_key in &index_keys {
                    tx_index.insert(index_key.as_bytes(), &[])?;
                }

                Ok(())
            })
            .map_err(
                |error: sled::transaction::TransactionError<StoreError>| match error {
                    sled::transaction::TransactionError::Abort(store_error) => store_error,
                    sled::transaction::TransactionError::Storage(storage_error) => {
                        StoreError::Sled(storage_error)
                    }
                },
            )?;

        Ok(())
    }

    pub fn get_tasks_by_unit(&self, unit_uid: &str) -> Result<Vec<Task>, StoreError> {
        let prefix = keys::task_unit_index_prefix(unit_uid)?;
        let mut tasks = Vec::new();
        for item in self.tasks_by_unit.scan_prefix(prefix.as_bytes()) {
            let (raw_key, _) = item?;
            let Some((_, task_uid)) = keys::parse_task_unit_index_key(&raw_key) else {
                continue;
            };
            if let Some(task) = self.get_task(&task_uid)? {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    pub fn get_tasks_by_type(&self, task_type: TaskType) -> Result<Vec<Task>, StoreError> {
        let mut tasks = Vec::new();
        for item in self.tasks.iter() {
            let (_, raw) = item?;
            let task: Task = Self::deserialize(&raw)?;
            if task.task_type == task_type {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }
}

#[async_trait]
impl TaskRepo for Store {
    async fn get_by_id(&self, uid: &str) -> Result<Option<Task>, CoreError> {
        Ok(self.get_task(uid)?)
    }

    async fn save(&self, task: &Task) -> Result<(), CoreError> {
        Ok(self.save_task(task)?)
    }

    async fn get_by_associated_unit(&self, unit_uid: &str) -> Result<Vec<Task>, CoreError> {
        Ok(self.get_tasks_by_unit(unit_uid)?)
    }

    async fn get_by_type(&self, task_type: TaskType) -> Result<Vec<Task>, CoreError> {
        Ok(self.get_tasks_by_type(task_type)?)
    }
}
