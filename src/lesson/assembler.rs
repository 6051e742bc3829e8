use std::sync::Arc;

use crate::config::LessonConfig;
use crate::contracts::{ProgressRepo, UnitRepo};
use crate::error::CoreError;
use crate::exercises::text;
use crate::exercises::ExerciseFactory;
use crate::lesson::session::{AssemblyPhase, SessionContext};
use crate::scheduler::level_model;
use crate::types::{Exercise, Lesson, PracticeUnit};

/// Builds one lesson: word exercises shuffled up front, the anchor sentence
/// appended last as the climax.
pub struct LessonAssembler {
    units: Arc<dyn UnitRepo>,
    progress: Arc<dyn ProgressRepo>,
    factory: Arc<ExerciseFactory>,
    config: LessonConfig,
}

impl LessonAssembler {
    pub fn new(
        units: Arc<dyn UnitRepo>,
        progress: Arc<dyn ProgressRepo>,
        factory: Arc<ExerciseFactory>,
        config: LessonConfig,
    ) -> Self {
        Self {
            units,
            progress,
            factory,
            config,
        }
    }

    pub async fn assemble(
        &self,
        languages: &[String],
        session: &mut SessionContext,
    ) -> Result<Lesson, CoreError> {
        let target = session
            .rng
            .range_inclusive(self.config.min_size, self.config.max_size);

        let mut pool: Vec<PracticeUnit> = Vec::new();
        for language in languages {
            pool.extend(self.units.get_all_in_language(language).await?);
        }
        pool.retain(|unit| !unit.do_not_practice);
        let (sentences, words): (Vec<PracticeUnit>, Vec<PracticeUnit>) =
            pool.into_iter().partition(|unit| unit.kind.is_sentence());

        session.phase = AssemblyPhase::PickingAnchor;
        let anchor = self.pick_anchor(&sentences, session).await?;
        let anchor_exercise = match &anchor {
            Some(sentence) => self.generate_at_resolved_level(sentence, session).await?,
            None => None,
        };

        session.phase = AssemblyPhase::FillingWords;
        let mut exercises: Vec<Exercise> = Vec::new();
        let mut used: Vec<String> = Vec::new();
        if let Some(sentence) = &anchor {
            for word in &words {
                if !text::contains_word_ci(&sentence.content, &word.content) {
                    continue;
                }
                if let Some(exercise) = self.generate_with_fallback(word, session).await? {
                    exercises.push(exercise);
                    used.push(word.uid.clone());
                }
            }
        }

        let reserved = usize::from(anchor_exercise.is_some());
        let mut remaining = target.saturating_sub(reserved + exercises.len());
        let mut fillers: Vec<&PracticeUnit> = words
            .iter()
            .filter(|word| !used.contains(&word.uid))
            .collect();
        session.rng.shuffle(&mut fillers);
        for word in fillers {
            if remaining == 0 {
                break;
            }
            if let Some(exercise) = self.generate_with_fallback(word, session).await? {
                exercises.push(exercise);
                remaining -= 1;
            }
        }

        session.rng.shuffle(&mut exercises);
        if let Some(exercise) = anchor_exercise {
            exercises.push(exercise);
        }

        session.phase = AssemblyPhase::Assembled;
        let lesson = Lesson::new(exercises);
        tracing::debug!(
            lesson_id = %lesson.id,
            size = lesson.exercises.len(),
            "Assembled lesson"
        );
        Ok(lesson)
    }

    /// A never-seen sentence beats any seen one; within a group the pick is
    /// random.
    async fn pick_anchor(
        &self,
        sentences: &[PracticeUnit],
        session: &mut SessionContext,
    ) -> Result<Option<PracticeUnit>, CoreError> {
        let mut unseen = Vec::new();
        for sentence in sentences {
            let records = self.progress.get_all_for_unit(&sentence.uid).await?;
            if !level_model::is_seen(&records) {
                unseen.push(sentence.clone());
            }
        }
        if !unseen.is_empty() {
            return Ok(session.rng.pick(&unseen).cloned());
        }
        Ok(session.rng.pick(sentences).cloned())
    }

    async fn generate_at_resolved_level(
        &self,
        unit: &PracticeUnit,
        session: &mut SessionContext,
    ) -> Result<Option<Exercise>, CoreError> {
        let records = self.progress.get_all_for_unit(&unit.uid).await?;
        let level = level_model::resolve_level(&records);
        self.factory.generate(unit, level, &mut session.rng).await
    }

    /// Resolved level first, then the level-0 rendition before giving up.
    async fn generate_with_fallback(
        &self,
        unit: &PracticeUnit,
        session: &mut SessionContext,
    ) -> Result<Option<Exercise>, CoreError> {
        let records = self.progress.get_all_for_unit(&unit.uid).await?;
        let level = level_model::resolve_level(&records);
        if let Some(exercise) = self.factory.generate(unit, level, &mut session.rng).await? {
            return Ok(Some(exercise));
        }
        if level != 0 {
            return self.factory.generate(unit, 0, &mut session.rng).await;
        }
        Ok(None)
    }
}
