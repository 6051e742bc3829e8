//! Collaborator contracts the practice core depends on.
//!
//! Storage adapters implement these; the core only ever talks to the traits.
//! Missing data is modelled as `None` / empty vectors, never as an error —
//! errors mean the collaborator itself failed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::types::{
    ExampleSentence, PracticeUnit, ProgressRecord, Resource, Task, TaskType, Translation, UnitKey,
};

#[async_trait]
pub trait UnitRepo: Send + Sync {
    async fn get_by_uid(&self, uid: &str) -> Result<Option<PracticeUnit>, CoreError>;

    async fn get_by_uids(&self, uids: &[String]) -> Result<Vec<PracticeUnit>, CoreError>;

    async fn get_by_key(&self, key: &UnitKey) -> Result<Option<PracticeUnit>, CoreError>;

    async fn get_all(&self) -> Result<Vec<PracticeUnit>, CoreError>;

    async fn get_all_in_language(&self, language: &str) -> Result<Vec<PracticeUnit>, CoreError>;

    /// Units in the given languages whose resolved level is due at `now`.
    /// `max_level` restricts the result to units resolved at or below that
    /// level.
    async fn get_due(
        &self,
        languages: &[String],
        max_level: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PracticeUnit>, CoreError>;

    /// Up to `count` units that have never been reviewed, excluding uids on
    /// the block list. Selection order is up to the adapter.
    async fn get_random_unseen(
        &self,
        count: usize,
        languages: &[String],
        block_list: &[String],
    ) -> Result<Vec<PracticeUnit>, CoreError>;

    async fn get_random_due_in_language(
        &self,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PracticeUnit>, CoreError>;

    async fn save(&self, unit: &PracticeUnit) -> Result<(), CoreError>;
}

#[async_trait]
pub trait ProgressRepo: Send + Sync {
    async fn get(&self, unit_uid: &str, level: i32) -> Result<Option<ProgressRecord>, CoreError>;

    async fn upsert(&self, record: &ProgressRecord) -> Result<(), CoreError>;

    async fn get_all(&self) -> Result<Vec<ProgressRecord>, CoreError>;

    /// Every per-level record for one unit, ascending by level.
    async fn get_all_for_unit(&self, unit_uid: &str) -> Result<Vec<ProgressRecord>, CoreError>;

    async fn clear(&self) -> Result<(), CoreError>;
}

#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn get_by_id(&self, uid: &str) -> Result<Option<Task>, CoreError>;

    /// Upsert by uid.
    async fn save(&self, task: &Task) -> Result<(), CoreError>;

    async fn get_by_associated_unit(&self, unit_uid: &str) -> Result<Vec<Task>, CoreError>;

    async fn get_by_type(&self, task_type: TaskType) -> Result<Vec<Task>, CoreError>;
}

#[async_trait]
pub trait TranslationRepo: Send + Sync {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Translation>, CoreError>;

    async fn find_by_content(
        &self,
        language: &str,
        content: &str,
    ) -> Result<Option<Translation>, CoreError>;

    /// Distractor pool: every translation whose language matches.
    async fn get_all_in_language(&self, language: &str) -> Result<Vec<Translation>, CoreError>;

    /// Keys of every unit carrying a translation with exactly this content.
    /// Feeds the native→target exercises, which must list all units sharing
    /// the chosen translation.
    async fn find_unit_keys_by_translation(&self, content: &str)
        -> Result<Vec<UnitKey>, CoreError>;
}

#[async_trait]
pub trait ResourceRepo: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Resource>, CoreError>;

    async fn get_random_due(&self, languages: &[String]) -> Result<Option<Resource>, CoreError>;

    async fn save(&self, resource: &Resource) -> Result<(), CoreError>;
}

#[async_trait]
pub trait ExampleRepo: Send + Sync {
    /// Examples eligible for practice in the given languages.
    async fn get_examples_for_practice(
        &self,
        languages: &[String],
    ) -> Result<Vec<ExampleSentence>, CoreError>;
}
