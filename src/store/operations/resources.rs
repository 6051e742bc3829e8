use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::constants::RESOURCE_RESHOW_COOLDOWN_MINUTES;
use crate::contracts::ResourceRepo;
use crate::error::CoreError;
use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::types::Resource;

impl Store {
    pub fn get_resource(&self, uid: &str) -> Result<Option<Resource>, StoreError> {
        match self.resources.get(keys::resource_key(uid).as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_resource(&self, resource: &Resource) -> Result<(), StoreError> {
        let key = keys::resource_key(&resource.uid);
        let value = Self::serialize(resource)?;
        self.resources.insert(key.as_bytes(), value)?;
        Ok(())
    }

    pub fn get_all_resources(&self) -> Result<Vec<Resource>, StoreError> {
        let mut resources = Vec::new();
        for item in self.resources.iter() {
            let (_, raw) = item?;
            resources.push(Self::deserialize::<Resource>(&raw)?);
        }
        Ok(resources)
    }

    /// A resource is due when it has never been shown, or its last showing
    /// lies outside the reshow cooldown.
    pub fn get_random_due_resource(
        &self,
        languages: &[String],
    ) -> Result<Option<Resource>, StoreError> {
        let cutoff = Utc::now() - Duration::minutes(RESOURCE_RESHOW_COOLDOWN_MINUTES);
        let mut due = Vec::new();
        for item in self.resources.iter() {
            let (_, raw) = item?;
            let resource: Resource = Self::deserialize(&raw)?;
            if !languages.contains(&resource.language) {
                continue;
            }
            match resource.last_shown_at {
                Some(shown_at) if shown_at >= cutoff => continue,
                _ => due.push(resource),
            }
        }
        Ok(due.choose(&mut thread_rng()).cloned())
    }
}

#[async_trait]
impl ResourceRepo for Store {
    async fn get_all(&self) -> Result<Vec<Resource>, CoreError> {
        Ok(self.get_all_resources()?)
    }

    async fn get_random_due(&self, languages: &[String]) -> Result<Option<Resource>, CoreError> {
        Ok(self.get_random_due_resource(languages)?)
    }

    async fn save(&self, resource: &Resource) -> Result<(), CoreError> {
        Ok(self.save_resource(resource)?)
    }
}
