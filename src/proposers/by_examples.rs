use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::config::ProposerConfig;
use crate::contracts::{ExampleRepo, ProgressRepo, UnitRepo};
use crate::error::CoreError;
use crate::proposers::Proposer;
use crate::rng::PracticeRng;
use crate::scheduler::level_model;
use crate::types::{ExampleSentence, PracticeUnit};

/// Surfaces the vocabulary of one example sentence the learner is close to
/// forgetting: an example qualifies when fewer than the configured share of
/// its associated units are still top-of-mind.
pub struct ProposerByExamples {
    examples: Arc<dyn ExampleRepo>,
    units: Arc<dyn UnitRepo>,
    progress: Arc<dyn ProgressRepo>,
    config: ProposerConfig,
    languages: Vec<String>,
}

impl ProposerByExamples {
    pub fn new(
        examples: Arc<dyn ExampleRepo>,
        units: Arc<dyn UnitRepo>,
        progress: Arc<dyn ProgressRepo>,
        config: ProposerConfig,
        languages: Vec<String>,
    ) -> Self {
        Self {
            examples,
            units,
            progress,
            config,
            languages,
        }
    }

    /// Share of the example's units that are currently top-of-mind. Units
    /// that fail to resolve count against the example, not for it.
    async fn top_of_mind_ratio(&self, example: &ExampleSentence) -> Result<f64, CoreError> {
        let units = self.units.get_by_uids(&example.associated_units).await?;
        let now = Utc::now();
        let mut fresh = 0usize;
        for unit in &units {
            let records = self.progress.get_all_for_unit(&unit.uid).await?;
            if level_model::is_top_of_mind(&records, now) {
                fresh += 1;
            }
        }
        Ok(fresh as f64 / example.associated_units.len() as f64)
    }
}

#[async_trait]
impl Proposer for ProposerByExamples {
    fn name(&self) -> &'static str {
        "by-examples"
    }

    async fn propose(
        &self,
        target: usize,
        rng: &mut PracticeRng,
    ) -> Result<Vec<PracticeUnit>, CoreError> {
        let examples = self
            .examples
            .get_examples_for_practice(&self.languages)
            .await?;

        let mut needy = Vec::new();
        for example in examples {
            if example.associated_units.is_empty() {
                continue;
            }
            if self.top_of_mind_ratio(&example).await? < self.config.top_of_mind_threshold {
                needy.push(example);
            }
        }

        let Some(chosen) = rng.pick(&needy).cloned() else {
            return Ok(Vec::new());
        };
        tracing::debug!(example = %chosen.content, "Chose needy example");

        let now = Utc::now();
        let mut proposals = Vec::new();
        for unit in self.units.get_by_uids(&chosen.associated_units).await? {
            if unit.do_not_practice {
                continue;
            }
            let records = self.progress.get_all_for_unit(&unit.uid).await?;
            if level_model::is_due_now(&records, now) {
                proposals.push(unit);
            }
            if proposals.len() == target {
                break;
            }
        }
        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::types::{ProgressRecord, Translation, UnitKind};
    use chrono::Duration;
    use tempfile::tempdir;

    fn proposer(store: &Arc<Store>) -> ProposerByExamples {
        ProposerByExamples::new(
            Arc::clone(store) as Arc<dyn ExampleRepo>,
            Arc::clone(store) as Arc<dyn UnitRepo>,
            Arc::clone(store) as Arc<dyn ProgressRepo>,
            ProposerConfig::default(),
            vec!["es".to_string()],
        )
    }

    fn word(store: &Store, content: &str) -> PracticeUnit {
        let mut unit = PracticeUnit::new("es", content, UnitKind::Word);
        let translation = Translation::new("en", format!("{content}-en"));
        store.save_translation(&translation).unwrap();
        unit.translations.push(translation.uid);
        store.save_unit(&unit).unwrap();
        unit
    }

    // Reviewed and not due again yet: fresh in memory.
    fn make_top_of_mind(store: &Store, unit: &PracticeUnit) {
        let mut record = ProgressRecord::fresh(&unit.uid, 0, Utc::now());
        record.reps = 1;
        record.due = Utc::now() + Duration::days(1);
        store.upsert_progress(&record).unwrap();
    }

    fn make_seen_due(store: &Store, unit: &PracticeUnit) {
        let mut record = ProgressRecord::fresh(&unit.uid, 0, Utc::now());
        record.reps = 1;
        record.due = Utc::now() - Duration::minutes(1);
        store.upsert_progress(&record).unwrap();
    }

    fn example_with(store: &Store, content: &str, units: &[&PracticeUnit]) -> ExampleSentence {
        let mut example = ExampleSentence::new("es", content);
        example.associated_units = units.iter().map(|u| u.uid.clone()).collect();
        store.save_example(&example).unwrap();
        example
    }

    #[tokio::test]
    async fn mostly_fresh_examples_are_skipped() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db").to_str().unwrap()).unwrap());
        let a = word(&store, "el");
        let b = word(&store, "perro");
        let c = word(&store, "bebe");
        make_top_of_mind(&store, &a);
        make_top_of_mind(&store, &b);
        make_top_of_mind(&store, &c);
        example_with(&store, "el perro bebe", &[&a, &b, &c]);

        let mut rng = PracticeRng::seeded(1);
        let proposals = proposer(&store).propose(10, &mut rng).await.unwrap();

        assert!(proposals.is_empty());
    }

    #[tokio::test]
    async fn needy_example_contributes_its_due_and_new_units() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-needy").to_str().unwrap()).unwrap());
        let article = word(&store, "el");
        let subject = word(&store, "perro");
        let verb = word(&store, "bebe");
        let due = word(&store, "agua");
        let unseen = word(&store, "fría");
        make_top_of_mind(&store, &article);
        make_top_of_mind(&store, &subject);
        make_top_of_mind(&store, &verb);
        make_seen_due(&store, &due);
        // 3 of 5 top-of-mind = 60% < 80%.
        example_with(
            &store,
            "el perro bebe agua fría",
            &[&article, &subject, &verb, &due, &unseen],
        );

        let mut rng = PracticeRng::seeded(2);
        let proposals = proposer(&store).propose(10, &mut rng).await.unwrap();

        let mut contents: Vec<&str> = proposals.iter().map(|u| u.content.as_str()).collect();
        contents.sort_unstable();
        // The three fresh units are neither due nor new, so they stay out.
        assert_eq!(contents, vec!["agua", "fría"]);
    }

    #[tokio::test]
    async fn do_not_practice_units_never_surface() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-dnp").to_str().unwrap()).unwrap());
        let mut blocked = PracticeUnit::new("es", "tabú", UnitKind::Word);
        blocked.do_not_practice = true;
        store.save_unit(&blocked).unwrap();
        let due = word(&store, "perro");
        make_seen_due(&store, &due);
        example_with(&store, "perro tabú", &[&blocked, &due]);

        let mut rng = PracticeRng::seeded(3);
        let proposals = proposer(&store).propose(10, &mut rng).await.unwrap();

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].content, "perro");
    }

    #[tokio::test]
    async fn contribution_is_capped_at_target() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db-cap").to_str().unwrap()).unwrap());
        let words: Vec<PracticeUnit> = (0..6).map(|i| word(&store, &format!("w{i}"))).collect();
        let refs: Vec<&PracticeUnit> = words.iter().collect();
        example_with(&store, "seis palabras nuevas aquí para ti", &refs);

        let mut rng = PracticeRng::seeded(4);
        let proposals = proposer(&store).propose(4, &mut rng).await.unwrap();

        assert_eq!(proposals.len(), 4);
    }
}
