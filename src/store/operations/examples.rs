use async_trait::async_trait;

use crate::contracts::ExampleRepo;
use crate::error::CoreError;
use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::types::ExampleSentence;

impl Store {
    pub fn get_example(&self, uid: &str) -> Result<Option<ExampleSentence>, StoreError> {
        match self.examples.get(keys::example_key(uid).as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_example(&self, example: &ExampleSentence) -> Result<(), StoreError> {
        let key = keys::example_key(&example.uid);
        let value = Self::serialize(example)?;
        self.examples.insert(key.as_bytes(), value)?;
        Ok(())
    }

    pub fn get_examples_in_languages(
        &self,
        languages: &[String],
    ) -> Result<Vec<ExampleSentence>, StoreError> {
        let mut examples = Vec::new();
        for item in self.examples.iter() {
            let (_, raw) = item?;
            let example: ExampleSentence = Self::deserialize(&raw)?;
            if languages.contains(&example.language) {
                examples.push(example);
            }
        }
        Ok(examples)
    }
}

#[async_trait]
impl ExampleRepo for Store {
    async fn get_examples_for_practice(
        &self,
        languages: &[String],
    ) -> Result<Vec<ExampleSentence>, CoreError> {
        Ok(self.get_examples_in_languages(languages)?)
    }
}
