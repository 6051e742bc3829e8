use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::contracts::TranslationRepo;
use crate::error::CoreError;
use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::types::{Translation, UnitKey};

impl Store {
    pub fn get_translation(&self, uid: &str) -> Result<Option<Translation>, StoreError> {
        match self.translations.get(keys::translation_key(uid).as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_translation(&self, translation: &Translation) -> Result<(), StoreError> {
        let key = keys::translation_key(&translation.uid);
        let value = Self::serialize(translation)?;
        self.translations.insert(key.as_bytes(), value)?;
        Ok(())
    }

    pub fn get_translations_batch(&self, ids: &[String]) -> Result<Vec<Translation>, StoreError> {
        let mut translation_by_id: HashMap<&str, Option<Translation>> =
            HashMap::with_capacity(ids.len());

        for id in ids {
            if translation_by_id.contains_key(id.as_str()) {
                continue;
            }
            translation_by_id.insert(id.as_str(), self.get_translation(id)?);
        }

        let mut translations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(Some(translation)) = translation_by_id.get(id.as_str()) {
                translations.push(translation.clone());
            }
        }

        Ok(translations)
    }

    pub fn find_translation_by_content(
        &self,
        language: &str,
        content: &str,
    ) -> Result<Option<Translation>, StoreError> {
        for item in self.translations.iter() {
            let (_, raw) = item?;
            let translation: Translation = Self::deserialize(&raw)?;
            if translation.language == language && translation.content == content {
                return Ok(Some(translation));
            }
        }
        Ok(None)
    }

    pub fn get_translations_in_language(
        &self,
        language: &str,
    ) -> Result<Vec<Translation>, StoreError> {
        let mut translations = Vec::new();
        for item in self.translations.iter() {
            let (_, raw) = item?;
            let translation: Translation = Self::deserialize(&raw)?;
            if translation.language == language {
                translations.push(translation);
            }
        }
        Ok(translations)
    }

    /// Every unit key whose translation list carries this exact content,
    /// regardless of which translation row supplies it. Units in different
    /// languages can legitimately share one native-language content string.
    pub fn find_unit_keys_by_translation_content(
        &self,
        content: &str,
    ) -> Result<Vec<UnitKey>, StoreError> {
        let mut matching_uids: HashSet<String> = HashSet::new();
        for item in self.translations.iter() {
            let (_, raw) = item?;
            let translation: Translation = Self::deserialize(&raw)?;
            if translation.content == content {
                matching_uids.insert(translation.uid);
            }
        }
        if matching_uids.is_empty() {
            return Ok(Vec::new());
        }

        let mut unit_keys = Vec::new();
        for unit in self.get_all_units()? {
            if unit
                .translations
                .iter()
                .any(|uid| matching_uids.contains(uid))
            {
                unit_keys.push(unit.key());
            }
        }
        Ok(unit_keys)
    }
}

#[async_trait]
impl TranslationRepo for Store {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Translation>, CoreError> {
        Ok(self.get_translations_batch(ids)?)
    }

    async fn find_by_content(
        &self,
        language: &str,
        content: &str,
    ) -> Result<Option<Translation>, CoreError> {
        Ok(self.find_translation_by_content(language, content)?)
    }

    async fn get_all_in_language(&self, language: &str) -> Result<Vec<Translation>, CoreError> {
        Ok(self.get_translations_in_language(language)?)
    }

    async fn find_unit_keys_by_translation(
        &self,
        content: &str,
    ) -> Result<Vec<UnitKey>, CoreError> {
        Ok(self.find_unit_keys_by_translation_content(content)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::Store;
    use crate::types::{PracticeUnit, Translation, UnitKind};
    use tempfile::tempdir;

    #[test]
    fn batch_preserves_order_and_skips_missing() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let dog = Translation::new("en", "dog");
        let cat = Translation::new("en", "cat");
        store.save_translation(&dog).unwrap();
        store.save_translation(&cat).unwrap();

        let results = store
            .get_translations_batch(&[cat.uid.clone(), "missing".to_string(), dog.uid.clone()])
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "cat");
        assert_eq!(results[1].content, "dog");
    }

    #[test]
    fn find_by_content_matches_language_too() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-find").to_str().unwrap()).unwrap();

        store.save_translation(&Translation::new("en", "dog")).unwrap();
        store.save_translation(&Translation::new("de", "dog")).unwrap();

        let found = store.find_translation_by_content("en", "dog").unwrap();
        assert_eq!(found.unwrap().language, "en");
        assert!(store
            .find_translation_by_content("fr", "dog")
            .unwrap()
            .is_none());
    }

    #[test]
    fn unit_keys_by_translation_span_every_carrier() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-keys").to_str().unwrap()).unwrap();

        let dog_for_perro = Translation::new("en", "dog");
        let dog_for_chien = Translation::new("en", "dog");
        let cat = Translation::new("en", "cat");
        store.save_translation(&dog_for_perro).unwrap();
        store.save_translation(&dog_for_chien).unwrap();
        store.save_translation(&cat).unwrap();

        let mut perro = PracticeUnit::new("es", "perro", UnitKind::Word);
        perro.translations.push(dog_for_perro.uid.clone());
        let mut chien = PracticeUnit::new("fr", "chien", UnitKind::Word);
        chien.translations.push(dog_for_chien.uid.clone());
        let mut gato = PracticeUnit::new("es", "gato", UnitKind::Word);
        gato.translations.push(cat.uid.clone());
        store.save_unit(&perro).unwrap();
        store.save_unit(&chien).unwrap();
        store.save_unit(&gato).unwrap();

        let mut keys = store.find_unit_keys_by_translation_content("dog").unwrap();
        keys.sort_by(|a, b| a.content.cmp(&b.content));

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].content, "chien");
        assert_eq!(keys[1].content, "perro");
        assert!(store
            .find_unit_keys_by_translation_content("horse")
            .unwrap()
            .is_empty());
    }
}
