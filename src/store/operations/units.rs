use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::thread_rng;
use sled::Transactional;
use std::collections::HashMap;

use crate::contracts::UnitRepo;
use crate::error::CoreError;
use crate::scheduler::level_model;
use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::types::{PracticeUnit, UnitKey};

impl Store {
    pub fn get_unit(&self, uid: &str) -> Result<Option<PracticeUnit>, StoreError> {
        match self.units.get(keys::unit_key(uid).as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_unit_by_key(&self, unit_key: &UnitKey) -> Result<Option<PracticeUnit>, StoreError> {
        let index_key = keys::unit_key_index_key(&unit_key.language, &unit_key.content)?;
        match self.unit_key_index.get(index_key.as_bytes())? {
            Some(raw_uid) => {
                let uid = String::from_utf8_lossy(&raw_uid).to_string();
                self.get_unit(&uid)
            }
            None => Ok(None),
        }
    }

    pub fn get_units_batch(&self, uids: &[String]) -> Result<Vec<PracticeUnit>, StoreError> {
        let mut unit_by_uid: HashMap<&str, Option<PracticeUnit>> =
            HashMap::with_capacity(uids.len());

        for uid in uids {
            if unit_by_uid.contains_key(uid.as_str()) {
                continue;
            }
            unit_by_uid.insert(uid.as_str(), self.get_unit(uid)?);
        }

        let mut units = Vec::with_capacity(uids.len());
        for uid in uids {
            if let Some(Some(unit)) = unit_by_uid.get(uid.as_str()) {
                units.push(unit.clone());
            }
        }

        Ok(units)
    }

    pub fn get_all_units(&self) -> Result<Vec<PracticeUnit>, StoreError> {
        let mut units = Vec::new();
        for item in self.units.iter() {
            let (_, raw) = item?;
            units.push(Self::deserialize::<PracticeUnit>(&raw)?);
        }
        Ok(units)
    }

    pub fn get_units_in_language(&self, language: &str) -> Result<Vec<PracticeUnit>, StoreError> {
        let mut units = Vec::new();
        for item in self.units.iter() {
            let (_, raw) = item?;
            let unit: PracticeUnit = Self::deserialize(&raw)?;
            if unit.language == language {
                units.push(unit);
            }
        }
        Ok(units)
    }

    pub fn save_unit(&self, unit: &PracticeUnit) -> Result<(), StoreError> {
        let key = keys::unit_key(&unit.uid);
        let value = Self::serialize(unit)?;
        let index_key = keys::unit_key_index_key(&unit.language, &unit.content)?;

        (&self.units, &self.unit_key_index)
            .transaction(|(tx_units, tx_index)| {
                if let Some(old_raw) = tx_units.get(key.as_bytes())? {
                    let old_unit: PracticeUnit =
                        serde_json::from_slice(&old_raw).map_err(|error| {
                            sled::transaction::ConflictableTransactionError::Abort(
                                StoreError::Serialization(error),
                            )
                        })?;
                    let old_index_key =
                        keys::unit_key_index_key(&old_unit.language, &old_unit.content)
                            .map_err(sled::transaction::ConflictableTransactionError::Abort)?;
                    if old_index_key != index_key {
                        tx_index.remove(old_index_key.as_bytes())?;
                    }
                }

                tx_units.insert(key.as_bytes(), value.as_slice())?;
                tx_index.insert(index_key.as_bytes(), unit.uid.as_bytes())?;

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

    /// Seen-and-due units only; brand-new units are served by
    /// [`Store::get_random_unseen_units`] so the two proposal paths never
    /// overlap.
    pub fn get_due_units(
        &self,
        languages: &[String],
        max_level: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PracticeUnit>, StoreError> {
        let mut due = Vec::new();
        for item in self.units.iter() {
            let (_, raw) = item?;
            let unit: PracticeUnit = Self::deserialize(&raw)?;
            if unit.do_not_practice || !languages.contains(&unit.language) {
                continue;
            }

            let records = self.get_progress_for_unit(&unit.uid)?;
            if !level_model::is_seen_and_due(&records, now) {
                continue;
            }
            if let Some(max_level) = max_level {
                if level_model::resolve_level(&records) > max_level {
                    continue;
                }
            }
            due.push(unit);
        }
        Ok(due)
    }

    pub fn get_random_unseen_units(
        &self,
        count: usize,
        languages: &[String],
        block_list: &[String],
    ) -> Result<Vec<PracticeUnit>, StoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut unseen = Vec::new();
        for item in self.units.iter() {
            let (_, raw) = item?;
            let unit: PracticeUnit = Self::deserialize(&raw)?;
            if unit.do_not_practice
                || !languages.contains(&unit.language)
                || block_list.contains(&unit.uid)
            {
                continue;
            }

            let records = self.get_progress_for_unit(&unit.uid)?;
            if level_model::is_seen(&records) {
                continue;
            }
            unseen.push(unit);
        }

        unseen.shuffle(&mut thread_rng());
        unseen.truncate(count);
        Ok(unseen)
    }

    pub fn get_random_due_unit_in_language(
        &self,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PracticeUnit>, StoreError> {
        let languages = [language.to_string()];
        let due = self.get_due_units(&languages, None, now)?;
        Ok(due.choose(&mut thread_rng()).cloned())
    }
}

#[async_trait]
impl UnitRepo for Store {
    async fn get_by_uid(&self, uid: &str) -> Result<Option<PracticeUnit>, CoreError> {
        Ok(self.get_unit(uid)?)
    }

    async fn get_by_uids(&self, uids: &[String]) -> Result<Vec<PracticeUnit>, CoreError> {
        Ok(self.get_units_batch(uids)?)
    }

    async fn get_by_key(&self, key: &UnitKey) -> Result<Option<PracticeUnit>, CoreError> {
        Ok(self.get_unit_by_key(key)?)
    }

    async fn get_all(&self) -> Result<Vec<PracticeUnit>, CoreError> {
        Ok(self.get_all_units()?)
    }

    async fn get_all_in_language(&self, language: &str) -> Result<Vec<PracticeUnit>, CoreError> {
        Ok(self.get_units_in_language(language)?)
    }

    async fn get_due(
        &self,
        languages: &[String],
        max_level: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PracticeUnit>, CoreError> {
        Ok(self.get_due_units(languages, max_level, now)?)
    }

    async fn get_random_unseen(
        &self,
        count: usize,
        languages: &[String],
        block_list: &[String],
    ) -> Result<Vec<PracticeUnit>, CoreError> {
        Ok(self.get_random_unseen_units(count, languages, block_list)?)
    }

    async fn get_random_due_in_language(
        &self,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PracticeUnit>, CoreError> {
        Ok(self.get_random_due_unit_in_language(language, now)?)
    }

    async fn save(&self, unit: &PracticeUnit) -> Result<(), CoreError> {
        Ok(self.save_unit(unit)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::Store;
    use crate::types::{PracticeUnit, ProgressRecord, UnitKey, UnitKind};
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn mock_unit(language: &str, content: &str) -> PracticeUnit {
        PracticeUnit::new(language, content, UnitKind::Word)
    }

    fn reviewed_record(unit_uid: &str, level: i32, due_minutes_from_now: i64) -> ProgressRecord {
        let now = Utc::now();
        let mut record = ProgressRecord::fresh(unit_uid, level, now);
        record.reps = 1;
        record.due = now + Duration::minutes(due_minutes_from_now);
        record
    }

    #[test]
    fn save_unit_reindexes_on_content_change() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let mut unit = mock_unit("es", "pero");
        store.save_unit(&unit).unwrap();
        assert!(store
            .get_unit_by_key(&UnitKey::new("es", "pero"))
            .unwrap()
            .is_some());

        unit.content = "perro".to_string();
        store.save_unit(&unit).unwrap();

        assert!(store
            .get_unit_by_key(&UnitKey::new("es", "pero"))
            .unwrap()
            .is_none());
        let found = store
            .get_unit_by_key(&UnitKey::new("es", "perro"))
            .unwrap()
            .unwrap();
        assert_eq!(found.uid, unit.uid);
    }

    #[test]
    fn get_units_batch_preserves_order_duplicates_and_skips_missing() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-batch").to_str().unwrap()).unwrap();

        let u1 = mock_unit("es", "perro");
        let u2 = mock_unit("es", "gato");
        store.save_unit(&u1).unwrap();
        store.save_unit(&u2).unwrap();

        let results = store
            .get_units_batch(&[
                u2.uid.clone(),
                "missing".to_string(),
                u1.uid.clone(),
                u2.uid.clone(),
            ])
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].content, "gato");
        assert_eq!(results[1].content, "perro");
        assert_eq!(results[2].content, "gato");
    }

    #[test]
    fn due_units_require_seen_and_due() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-due").to_str().unwrap()).unwrap();
        let now = Utc::now();
        let languages = vec!["es".to_string()];

        let due_unit = mock_unit("es", "perro");
        let future_unit = mock_unit("es", "gato");
        let unseen_unit = mock_unit("es", "agua");
        store.save_unit(&due_unit).unwrap();
        store.save_unit(&future_unit).unwrap();
        store.save_unit(&unseen_unit).unwrap();
        store
            .upsert_progress(&reviewed_record(&due_unit.uid, 1, -5))
            .unwrap();
        store
            .upsert_progress(&reviewed_record(&future_unit.uid, 1, 60))
            .unwrap();

        let due = store.get_due_units(&languages, None, now).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].uid, due_unit.uid);

        let unseen = store.get_random_unseen_units(10, &languages, &[]).unwrap();
        assert_eq!(unseen.len(), 1);
        assert_eq!(unseen[0].uid, unseen_unit.uid);
    }

    #[test]
    fn due_units_honor_max_level() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-max-level").to_str().unwrap()).unwrap();
        let now = Utc::now();
        let languages = vec!["es".to_string()];

        let low = mock_unit("es", "perro");
        let high = mock_unit("es", "biblioteca");
        store.save_unit(&low).unwrap();
        store.save_unit(&high).unwrap();
        store
            .upsert_progress(&reviewed_record(&low.uid, 1, -5))
            .unwrap();
        store
            .upsert_progress(&reviewed_record(&high.uid, 4, -5))
            .unwrap();

        let due = store.get_due_units(&languages, Some(2), now).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].uid, low.uid);
    }

    #[test]
    fn unseen_excludes_blocked_and_do_not_practice() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-blocked").to_str().unwrap()).unwrap();
        let languages = vec!["es".to_string()];

        let wanted = mock_unit("es", "perro");
        let blocked = mock_unit("es", "gato");
        let mut skipped = mock_unit("es", "agua");
        skipped.do_not_practice = true;
        let wrong_language = mock_unit("fr", "chien");
        store.save_unit(&wanted).unwrap();
        store.save_unit(&blocked).unwrap();
        store.save_unit(&skipped).unwrap();
        store.save_unit(&wrong_language).unwrap();

        let unseen = store
            .get_random_unseen_units(10, &languages, &[blocked.uid.clone()])
            .unwrap();
        assert_eq!(unseen.len(), 1);
        assert_eq!(unseen[0].uid, wanted.uid);
    }

    #[test]
    fn random_due_unit_scopes_to_language() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-random-due").to_str().unwrap()).unwrap();
        let now = Utc::now();

        let es = mock_unit("es", "perro");
        let fr = mock_unit("fr", "chien");
        store.save_unit(&es).unwrap();
        store.save_unit(&fr).unwrap();
        store
            .upsert_progress(&reviewed_record(&es.uid, 0, -5))
            .unwrap();
        store
            .upsert_progress(&reviewed_record(&fr.uid, 0, -5))
            .unwrap();

        let picked = store
            .get_random_due_unit_in_language("es", now)
            .unwrap()
            .unwrap();
        assert_eq!(picked.uid, es.uid);
        assert!(store
            .get_random_due_unit_in_language("de", now)
            .unwrap()
            .is_none());
    }
}
