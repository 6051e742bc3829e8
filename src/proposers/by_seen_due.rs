use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::contracts::UnitRepo;
use crate::error::CoreError;
use crate::proposers::Proposer;
use crate::rng::PracticeRng;
use crate::types::PracticeUnit;

/// The workhorse: a random sample of units the learner has seen before that
/// are due again now.
pub struct ProposerBySeenDue {
    units: Arc<dyn UnitRepo>,
    languages: Vec<String>,
}

impl ProposerBySeenDue {
    pub fn new(units: Arc<dyn UnitRepo>, languages: Vec<String>) -> Self {
        Self { units, languages }
    }
}

#[async_trait]
impl Proposer for ProposerBySeenDue {
    fn name(&self) -> &'static str {
        "by-seen-due"
    }

    async fn propose(
        &self,
        target: usize,
        rng: &mut PracticeRng,
    ) -> Result<Vec<PracticeUnit>, CoreError> {
        let due = self.units.get_due(&self.languages, None, Utc::now()).await?;
        Ok(rng.sample(&due, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::types::{ProgressRecord, UnitKind};
    use chrono::Duration;
    use tempfile::tempdir;

    fn due_word(store: &Store, language: &str, content: &str) {
        let unit = PracticeUnit::new(language, content, UnitKind::Word);
        store.save_unit(&unit).unwrap();
        let mut record = ProgressRecord::fresh(&unit.uid, 0, Utc::now());
        record.reps = 1;
        record.due = Utc::now() - Duration::minutes(1);
        store.upsert_progress(&record).unwrap();
    }

    #[tokio::test]
    async fn samples_only_from_the_requested_languages() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db").to_str().unwrap()).unwrap());
        due_word(&store, "es", "perro");
        due_word(&store, "es", "gato");
        due_word(&store, "fr", "chien");

        let proposer = ProposerBySeenDue::new(store, vec!["es".to_string()]);
        let mut rng = PracticeRng::seeded(1);
        let proposals = proposer.propose(10, &mut rng).await.unwrap();

        assert_eq!(proposals.len(), 2);
        assert!(proposals.iter().all(|unit| unit.language == "es"));
    }

    #[tokio::test]
    async fn never_seen_units_are_not_proposed() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-new").to_str().unwrap()).unwrap());
        let unseen = PracticeUnit::new("es", "agua", UnitKind::Word);
        store.save_unit(&unseen).unwrap();

        let proposer = ProposerBySeenDue::new(store, vec!["es".to_string()]);
        let mut rng = PracticeRng::seeded(2);
        let proposals = proposer.propose(10, &mut rng).await.unwrap();

        assert!(proposals.is_empty());
    }
}
