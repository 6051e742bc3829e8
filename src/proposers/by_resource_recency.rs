use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::contracts::{ProgressRepo, ResourceRepo, TaskRepo, UnitRepo};
use crate::error::CoreError;
use crate::proposers::Proposer;
use crate::rng::PracticeRng;
use crate::types::{PracticeUnit, Resource, TaskType};

/// Surfaces vocabulary from resources by recency: stalest shown-before
/// resources first, then never-shown ones in random order. Resources whose
/// extraction work is exhausted are dropped entirely.
pub struct ProposerByResourceRecency {
    resources: Arc<dyn ResourceRepo>,
    tasks: Arc<dyn TaskRepo>,
    units: Arc<dyn UnitRepo>,
    progress: Arc<dyn ProgressRepo>,
    languages: Vec<String>,
}

impl ProposerByResourceRecency {
    pub fn new(
        resources: Arc<dyn ResourceRepo>,
        tasks: Arc<dyn TaskRepo>,
        units: Arc<dyn UnitRepo>,
        progress: Arc<dyn ProgressRepo>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            resources,
            tasks,
            units,
            progress,
            languages,
        }
    }

    /// An extraction kind counts as open while it has no task record yet or
    /// still has an active one.
    async fn has_open_extraction(&self, resource: &Resource) -> Result<bool, CoreError> {
        let tasks = self.tasks.get_by_associated_unit(&resource.uid).await?;
        Ok(TaskType::RESOURCE_EXTRACTION.into_iter().any(|kind| {
            let of_kind: Vec<_> = tasks.iter().filter(|task| task.task_type == kind).collect();
            of_kind.is_empty() || of_kind.iter().any(|task| task.is_active)
        }))
    }

    async fn practiceable_units(
        &self,
        resource: &Resource,
    ) -> Result<Vec<PracticeUnit>, CoreError> {
        let now = Utc::now();
        let mut practiceable = Vec::new();
        for unit in self.units.get_by_uids(&resource.associated_units).await? {
            if unit.do_not_practice {
                continue;
            }
            let records = self.progress.get_all_for_unit(&unit.uid).await?;
            if crate::scheduler::level_model::is_due_now(&records, now) {
                practiceable.push(unit);
            }
        }
        Ok(practiceable)
    }
}

#[async_trait]
impl Proposer for ProposerByResourceRecency {
    fn name(&self) -> &'static str {
        "by-resource-recency"
    }

    async fn propose(
        &self,
        target: usize,
        rng: &mut PracticeRng,
    ) -> Result<Vec<PracticeUnit>, CoreError> {
        let mut shown = Vec::new();
        let mut never_shown = Vec::new();
        for resource in self.resources.get_all().await? {
            if !self.languages.contains(&resource.language) {
                continue;
            }
            if !self.has_open_extraction(&resource).await? {
                continue;
            }
            if resource.last_shown_at.is_some() {
                shown.push(resource);
            } else {
                never_shown.push(resource);
            }
        }

        shown.sort_by_key(|resource| resource.last_shown_at);
        rng.shuffle(&mut never_shown);

        let mut proposals = Vec::new();
        for resource in shown.into_iter().chain(never_shown) {
            proposals.extend(self.practiceable_units(&resource).await?);
            if proposals.len() >= target {
                break;
            }
        }
        proposals.truncate(target);
        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::types::{Task, TaskSize, UnitKind};
    use chrono::Duration;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn proposer(store: &Arc<Store>) -> ProposerByResourceRecency {
        ProposerByResourceRecency::new(
            Arc::clone(store) as Arc<dyn ResourceRepo>,
            Arc::clone(store) as Arc<dyn TaskRepo>,
            Arc::clone(store) as Arc<dyn UnitRepo>,
            Arc::clone(store) as Arc<dyn ProgressRepo>,
            vec!["es".to_string()],
        )
    }

    fn resource_with_words(
        store: &Store,
        title: &str,
        words: &[&str],
        shown_minutes_ago: Option<i64>,
    ) -> Resource {
        let mut resource = Resource::new("es", title);
        for word in words {
            let unit = PracticeUnit::new("es", *word, UnitKind::Word);
            store.save_unit(&unit).unwrap();
            resource.associated_units.push(unit.uid);
        }
        resource.last_shown_at = shown_minutes_ago.map(|m| Utc::now() - Duration::minutes(m));
        store.save_resource(&resource).unwrap();
        resource
    }

    fn extraction_task(store: &Store, resource: &Resource, kind: TaskType, is_active: bool) {
        let task = Task {
            uid: Uuid::new_v4().to_string(),
            language: "es".to_string(),
            task_type: kind,
            title: format!("Extract from {}", resource.title),
            prompt: String::new(),
            is_active,
            is_one_time: false,
            task_size: TaskSize::Big,
            evaluate_difficulty_after_doing: false,
            decide_whether_to_do_again_after_doing: true,
            associated_units: vec![resource.uid.clone()],
            last_shown_at: None,
            last_difficulty_rating: None,
        };
        store.save_task(&task).unwrap();
    }

    #[tokio::test]
    async fn stalest_resource_contributes_first() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db").to_str().unwrap()).unwrap());
        resource_with_words(&store, "fresh article", &["uno"], Some(10));
        resource_with_words(&store, "stale article", &["dos"], Some(10_000));

        let mut rng = PracticeRng::seeded(1);
        let proposals = proposer(&store).propose(1, &mut rng).await.unwrap();

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].content, "dos");
    }

    #[tokio::test]
    async fn fully_extracted_resources_are_dropped() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-done").to_str().unwrap()).unwrap());
        let exhausted = resource_with_words(&store, "done", &["uno"], Some(100));
        for kind in TaskType::RESOURCE_EXTRACTION {
            extraction_task(&store, &exhausted, kind, false);
        }

        let mut rng = PracticeRng::seeded(2);
        let proposals = proposer(&store).propose(10, &mut rng).await.unwrap();

        assert!(proposals.is_empty());
    }

    #[tokio::test]
    async fn one_active_extraction_kind_keeps_the_resource() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-open").to_str().unwrap()).unwrap());
        let resource = resource_with_words(&store, "half done", &["uno"], Some(100));
        extraction_task(&store, &resource, TaskType::AddVocabToResource, false);
        extraction_task(&store, &resource, TaskType::AddExamplesToResource, true);
        extraction_task(&store, &resource, TaskType::AddFactCardsToResource, false);

        let mut rng = PracticeRng::seeded(3);
        let proposals = proposer(&store).propose(10, &mut rng).await.unwrap();

        assert_eq!(proposals.len(), 1);
    }

    #[tokio::test]
    async fn never_shown_resources_still_contribute() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-never").to_str().unwrap()).unwrap());
        resource_with_words(&store, "brand new", &["uno", "dos"], None);

        let mut rng = PracticeRng::seeded(4);
        let proposals = proposer(&store).propose(10, &mut rng).await.unwrap();

        assert_eq!(proposals.len(), 2);
    }

    #[tokio::test]
    async fn other_language_resources_are_ignored() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-lang").to_str().unwrap()).unwrap());
        let mut resource = Resource::new("fr", "article français");
        let unit = PracticeUnit::new("fr", "chien", UnitKind::Word);
        store.save_unit(&unit).unwrap();
        resource.associated_units.push(unit.uid);
        store.save_resource(&resource).unwrap();

        let mut rng = PracticeRng::seeded(5);
        let proposals = proposer(&store).propose(10, &mut rng).await.unwrap();

        assert!(proposals.is_empty());
    }
}
