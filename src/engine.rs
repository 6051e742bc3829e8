use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::contracts::{
    ExampleRepo, ProgressRepo, ResourceRepo, TaskRepo, TranslationRepo, UnitRepo,
};
use crate::error::CoreError;
use crate::exercises::ExerciseFactory;
use crate::lesson::{LessonAssembler, SessionContext};
use crate::proposers::{
    Proposer, ProposerByExamples, ProposerByImmersion, ProposerByResourceRecency, ProposerBySeenDue,
    ProposerChain,
};
use crate::scheduler::{LevelModel, ReviewOptions};
use crate::store::Store;
use crate::tasks::TaskCoordinator;
use crate::types::{Exercise, Lesson, PracticeUnit, ProgressRecord, Rating};

/// Composition root: wires one storage adapter into every collaborator
/// contract and exposes the practice operations the presentation layer calls.
pub struct PracticeEngine {
    units: Arc<dyn UnitRepo>,
    progress: Arc<dyn ProgressRepo>,
    tasks: Arc<dyn TaskRepo>,
    resources: Arc<dyn ResourceRepo>,
    examples: Arc<dyn ExampleRepo>,
    level_model: LevelModel,
    factory: Arc<ExerciseFactory>,
    assembler: LessonAssembler,
    coordinator: TaskCoordinator,
    config: Config,
}

impl PracticeEngine {
    pub fn with_store(store: Arc<Store>, config: Config) -> Result<Self, CoreError> {
        config.engine.validate().map_err(CoreError::Config)?;

        let units: Arc<dyn UnitRepo> = Arc::clone(&store) as _;
        let translations: Arc<dyn TranslationRepo> = Arc::clone(&store) as _;
        let progress: Arc<dyn ProgressRepo> = Arc::clone(&store) as _;
        let tasks: Arc<dyn TaskRepo> = Arc::clone(&store) as _;
        let resources: Arc<dyn ResourceRepo> = Arc::clone(&store) as _;
        let examples: Arc<dyn ExampleRepo> = Arc::clone(&store) as _;

        let level_model = LevelModel::new(&config.engine.scheduler, Arc::clone(&progress));
        let factory = Arc::new(ExerciseFactory::new(
            Arc::clone(&units),
            Arc::clone(&translations),
            config.engine.exercise.clone(),
        ));
        let assembler = LessonAssembler::new(
            Arc::clone(&units),
            Arc::clone(&progress),
            Arc::clone(&factory),
            config.engine.lesson.clone(),
        );
        let coordinator = TaskCoordinator::new(
            Arc::clone(&units),
            Arc::clone(&translations),
            Arc::clone(&progress),
            Arc::clone(&tasks),
        );

        Ok(Self {
            units,
            progress,
            tasks,
            resources,
            examples,
            level_model,
            factory,
            assembler,
            coordinator,
            config,
        })
    }

    /// Records a review outcome, then brings the unit's persisted tasks in
    /// line with its new level.
    pub async fn record_review(
        &self,
        unit_uid: &str,
        level: i32,
        rating: Rating,
        options: ReviewOptions,
    ) -> Result<ProgressRecord, CoreError> {
        let record = self
            .level_model
            .record_review(unit_uid, level, rating, options)
            .await?;
        self.coordinator.reconcile(unit_uid).await?;
        Ok(record)
    }

    pub async fn resolve_level(&self, unit_uid: &str) -> Result<i32, CoreError> {
        self.level_model.resolved_level(unit_uid).await
    }

    pub async fn reconcile_tasks(&self, unit_uid: &str) -> Result<(), CoreError> {
        self.coordinator.reconcile(unit_uid).await
    }

    /// Runs the default proposer chain for the given languages.
    pub async fn propose_candidates(
        &self,
        languages: &[String],
        target: usize,
        session: &mut SessionContext,
    ) -> Vec<PracticeUnit> {
        let languages = languages.to_vec();
        let chain = ProposerChain::new(vec![
            Box::new(ProposerBySeenDue::new(
                Arc::clone(&self.units),
                languages.clone(),
            )) as Box<dyn Proposer>,
            Box::new(ProposerByImmersion::new(
                Arc::clone(&self.resources),
                Arc::clone(&self.units),
                Arc::clone(&self.progress),
                self.config.engine.proposer.clone(),
                languages.clone(),
            )),
            Box::new(ProposerByExamples::new(
                Arc::clone(&self.examples),
                Arc::clone(&self.units),
                Arc::clone(&self.progress),
                self.config.engine.proposer.clone(),
                languages.clone(),
            )),
            Box::new(ProposerByResourceRecency::new(
                Arc::clone(&self.resources),
                Arc::clone(&self.tasks),
                Arc::clone(&self.units),
                Arc::clone(&self.progress),
                languages,
            )),
        ]);
        chain.propose(target, &mut session.rng).await
    }

    /// Generates one exercise for the unit at its resolved level.
    pub async fn generate_exercise(
        &self,
        unit: &PracticeUnit,
        session: &mut SessionContext,
    ) -> Result<Option<Exercise>, CoreError> {
        let level = self.level_model.resolved_level(&unit.uid).await?;
        self.factory.generate(unit, level, &mut session.rng).await
    }

    pub async fn build_lesson(
        &self,
        languages: &[String],
        session: &mut SessionContext,
    ) -> Result<Lesson, CoreError> {
        self.assembler.assemble(languages, session).await
    }

    /// Stamps a resource as shown now. An unknown uid is logged and ignored.
    pub async fn mark_resource_shown(&self, resource_uid: &str) -> Result<(), CoreError> {
        let all = self.resources.get_all().await?;
        let Some(mut resource) = all.into_iter().find(|r| r.uid == resource_uid) else {
            tracing::warn!(resource_uid, "Resource to mark as shown not found");
            return Ok(());
        };
        resource.last_shown_at = Some(Utc::now());
        self.resources.save(&resource).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Translation, UnitKind};
    use tempfile::tempdir;

    fn engine_over(dir: &std::path::Path) -> (PracticeEngine, Arc<Store>) {
        let store = Arc::new(Store::open(dir.join("db").to_str().unwrap()).unwrap());
        let config = Config {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
            sled_path: String::new(),
            engine: Default::default(),
        };
        let engine = PracticeEngine::with_store(Arc::clone(&store), config).unwrap();
        (engine, store)
    }

    fn translated_word(store: &Store, content: &str, meaning: &str) -> PracticeUnit {
        let mut unit = PracticeUnit::new("es", content, UnitKind::Word);
        let translation = Translation::new("en", meaning);
        store.save_translation(&translation).unwrap();
        unit.translations.push(translation.uid);
        store.save_unit(&unit).unwrap();
        unit
    }

    #[tokio::test]
    async fn review_also_reconciles_the_units_tasks() {
        let dir = tempdir().unwrap();
        let (engine, store) = engine_over(dir.path());
        let unit = translated_word(&store, "perro", "dog");

        let record = engine
            .record_review(&unit.uid, -1, Rating::Good, ReviewOptions::default())
            .await
            .unwrap();

        assert_eq!(record.level, 0);
        // Level 0 makes the two-button choice task applicable.
        let tasks = store.get_tasks_by_unit(&unit.uid).unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].is_active);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_at_construction() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db").to_str().unwrap()).unwrap());
        let mut config = Config {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
            sled_path: String::new(),
            engine: Default::default(),
        };
        config.engine.lesson.min_size = 30;

        let result = PracticeEngine::with_store(store, config);

        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[tokio::test]
    async fn marking_an_unknown_resource_is_a_quiet_no_op() {
        let dir = tempdir().unwrap();
        let (engine, _store) = engine_over(dir.path());

        engine.mark_resource_shown("missing").await.unwrap();
    }

    #[tokio::test]
    async fn exercise_generation_follows_the_resolved_level() {
        let dir = tempdir().unwrap();
        let (engine, store) = engine_over(dir.path());
        let unit = translated_word(&store, "perro", "dog");

        let mut session = SessionContext::seeded(1);
        let before = engine
            .generate_exercise(&unit, &mut session)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before.level, -1);

        engine
            .record_review(&unit.uid, -1, Rating::Good, ReviewOptions::default())
            .await
            .unwrap();
        let after = engine
            .generate_exercise(&unit, &mut session)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.level, 0);
    }
}
