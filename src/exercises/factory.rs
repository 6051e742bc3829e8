use std::sync::Arc;

use uuid::Uuid;

use crate::config::ExerciseConfig;
use crate::contracts::{TranslationRepo, UnitRepo};
use crate::error::CoreError;
use crate::exercises::choice;
use crate::exercises::cloze;
use crate::exercises::distractors::DistractorBuilder;
use crate::rng::PracticeRng;
use crate::types::{
    Direction, Exercise, ExerciseKind, PracticeUnit, Translation, UnitSnapshot,
};

/// Builds ephemeral exercises from a unit and its resolved level.
///
/// Dispatch for words (and unspecified units):
///
/// | level | exercise |
/// |---|---|
/// | -1 | try-to-remember |
/// | 0 | choose-from-two target→native |
/// | 1 | 50/50 choose-from-four target→native / choose-from-two native→target |
/// | 2 | 50/50 choose-from-four, either direction |
/// | 3 | reveal target→native |
/// | 4 | 50/50 reveal, either direction |
/// | above | level-3 behavior |
///
/// Sentences: -1 guess-the-meaning, 0–5 a uniformly random cloze flavor,
/// 6 nothing, above 6 reveal.
pub struct ExerciseFactory {
    translations: Arc<dyn TranslationRepo>,
    distractors: DistractorBuilder,
    config: ExerciseConfig,
}

impl ExerciseFactory {
    pub fn new(
        units: Arc<dyn UnitRepo>,
        translations: Arc<dyn TranslationRepo>,
        config: ExerciseConfig,
    ) -> Self {
        Self {
            distractors: DistractorBuilder::new(units, Arc::clone(&translations), config.clone()),
            translations,
            config,
        }
    }

    /// `Ok(None)` means this unit/level combination has nothing to generate;
    /// callers treat that as "skip", never as a failure.
    pub async fn generate(
        &self,
        unit: &PracticeUnit,
        level: i32,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        if unit.content.is_empty() {
            return Ok(None);
        }
        if unit.kind.is_sentence() {
            self.generate_for_sentence(unit, level, rng).await
        } else {
            self.generate_for_word(unit, level, rng).await
        }
    }

    async fn generate_for_word(
        &self,
        unit: &PracticeUnit,
        level: i32,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        match level {
            -1 => self.try_to_remember(unit, level).await,
            0 => self.choice_target_to_native(unit, level, 2, rng).await,
            1 => {
                if rng.chance(0.5) {
                    self.choice_target_to_native(unit, level, 4, rng).await
                } else {
                    self.choice_native_to_target(unit, level, 2, rng).await
                }
            }
            2 => {
                if rng.chance(0.5) {
                    self.choice_target_to_native(unit, level, 4, rng).await
                } else {
                    self.choice_native_to_target(unit, level, 4, rng).await
                }
            }
            3 => self.reveal_target_to_native(unit, level).await,
            4 => {
                if rng.chance(0.5) {
                    self.reveal_target_to_native(unit, level).await
                } else {
                    self.reveal_native_to_target(unit, level, rng).await
                }
            }
            // Above the table free recall stays the exercise.
            _ => self.reveal_target_to_native(unit, level).await,
        }
    }

    async fn generate_for_sentence(
        &self,
        unit: &PracticeUnit,
        level: i32,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        match level {
            -1 => self.guess_sentence_meaning(unit, level).await,
            0..=5 => match rng.index(3) {
                0 => self.cloze_choice(unit, level, 2, rng).await,
                1 => self.cloze_choice(unit, level, 4, rng).await,
                _ => self.cloze_reveal(unit, level, rng).await,
            },
            // The gap between the cloze band and free recall.
            6 => Ok(None),
            _ => self.reveal_target_to_native(unit, level).await,
        }
    }

    async fn try_to_remember(
        &self,
        unit: &PracticeUnit,
        level: i32,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        let solution = if translations.is_empty() {
            None
        } else {
            Some(snapshot.translations.join(", "))
        };
        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: ExerciseKind::TryToRemember,
            direction: Direction::TargetToNative,
            prompt: format!("Try to remember \"{}\"", unit.content),
            solution,
            answer_options: Vec::new(),
            unit: snapshot,
            level,
            is_repeatable: false,
        }))
    }

    async fn guess_sentence_meaning(
        &self,
        unit: &PracticeUnit,
        level: i32,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        if translations.is_empty() {
            return Ok(None);
        }
        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: ExerciseKind::GuessSentenceMeaning,
            direction: Direction::TargetToNative,
            prompt: format!("What could \"{}\" mean?", unit.content),
            solution: Some(snapshot.translations.join(", ")),
            answer_options: Vec::new(),
            unit: snapshot,
            level,
            is_repeatable: false,
        }))
    }

    async fn choice_target_to_native(
        &self,
        unit: &PracticeUnit,
        level: i32,
        option_count: usize,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        if translations.is_empty() {
            return Ok(None);
        }
        let Some(correct) = rng.pick(&translations).cloned() else {
            return Ok(None);
        };

        let wrong = self
            .distractors
            .wrong_translations(unit, &translations, &correct.content, option_count - 1, rng)
            .await?;
        let options = choice::build_options(&correct.content, wrong, option_count, rng);

        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: choice_kind(option_count),
            direction: Direction::TargetToNative,
            prompt: format!("What does \"{}\" mean?", unit.content),
            solution: Some(correct.content),
            answer_options: options,
            unit: snapshot,
            level,
            is_repeatable: true,
        }))
    }

    async fn choice_native_to_target(
        &self,
        unit: &PracticeUnit,
        level: i32,
        option_count: usize,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        if translations.is_empty() {
            return Ok(None);
        }
        let Some(chosen) = rng.pick(&translations).cloned() else {
            return Ok(None);
        };

        let carriers = self.carrier_contents(unit, &chosen).await?;
        let Some(correct) = rng.pick(&carriers).cloned() else {
            return Ok(None);
        };

        let wrong = self
            .distractors
            .wrong_contents(&unit.language, &correct, option_count - 1, rng)
            .await?;
        let options = choice::build_options(&correct, wrong, option_count, rng);

        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: choice_kind(option_count),
            direction: Direction::NativeToTarget,
            prompt: format!("What is the word for \"{}\"?", chosen.content),
            solution: Some(correct),
            answer_options: options,
            unit: snapshot,
            level,
            is_repeatable: true,
        }))
    }

    async fn reveal_target_to_native(
        &self,
        unit: &PracticeUnit,
        level: i32,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        if translations.is_empty() {
            return Ok(None);
        }
        let solution = reveal_solution(snapshot.translations.clone(), self.config.reveal_list_cap);

        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: ExerciseKind::Reveal,
            direction: Direction::TargetToNative,
            prompt: format!("Think of the meaning of \"{}\", then reveal", unit.content),
            solution: Some(solution),
            answer_options: Vec::new(),
            unit: snapshot,
            level,
            is_repeatable: true,
        }))
    }

    async fn reveal_native_to_target(
        &self,
        unit: &PracticeUnit,
        level: i32,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        if translations.is_empty() {
            return Ok(None);
        }
        let Some(chosen) = rng.pick(&translations).cloned() else {
            return Ok(None);
        };

        let carriers = self.carrier_contents(unit, &chosen).await?;
        let solution = reveal_solution(carriers, self.config.reveal_list_cap);

        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: ExerciseKind::Reveal,
            direction: Direction::NativeToTarget,
            prompt: format!("Think of the word for \"{}\", then reveal", chosen.content),
            solution: Some(solution),
            answer_options: Vec::new(),
            unit: snapshot,
            level,
            is_repeatable: true,
        }))
    }

    async fn cloze_choice(
        &self,
        unit: &PracticeUnit,
        level: i32,
        option_count: usize,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        if translations.is_empty() {
            return Ok(None);
        }
        let Some(parts) =
            cloze::blank_random_token(&unit.content, self.config.cloze_min_token_chars, rng)
        else {
            return Ok(None);
        };

        let wrong = self
            .distractors
            .wrong_contents(&unit.language, &parts.answer, option_count - 1, rng)
            .await?;
        let options = choice::build_options(&parts.answer, wrong, option_count, rng);
        let prompt = cloze_prompt(&parts.prompt, &snapshot.translations);

        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: ExerciseKind::ClozeChoice,
            direction: Direction::TargetToNative,
            prompt,
            solution: Some(parts.answer),
            answer_options: options,
            unit: snapshot,
            level,
            is_repeatable: true,
        }))
    }

    async fn cloze_reveal(
        &self,
        unit: &PracticeUnit,
        level: i32,
        rng: &mut PracticeRng,
    ) -> Result<Option<Exercise>, CoreError> {
        let (snapshot, translations) = self.snapshot(unit).await?;
        if translations.is_empty() {
            return Ok(None);
        }
        let Some(parts) =
            cloze::blank_random_token(&unit.content, self.config.cloze_min_token_chars, rng)
        else {
            return Ok(None);
        };
        let prompt = cloze_prompt(&parts.prompt, &snapshot.translations);

        Ok(Some(Exercise {
            id: new_exercise_id(),
            kind: ExerciseKind::ClozeReveal,
            direction: Direction::TargetToNative,
            prompt,
            solution: Some(parts.answer),
            answer_options: Vec::new(),
            unit: snapshot,
            level,
            is_repeatable: true,
        }))
    }

    async fn snapshot(
        &self,
        unit: &PracticeUnit,
    ) -> Result<(UnitSnapshot, Vec<Translation>), CoreError> {
        let translations = self.translations.get_by_ids(&unit.translations).await?;
        let snapshot = UnitSnapshot {
            language: unit.language.clone(),
            content: unit.content.clone(),
            translations: translations
                .iter()
                .map(|translation| translation.content.clone())
                .collect(),
        };
        Ok((snapshot, translations))
    }

    /// Contents of every unit in the same language sharing this translation;
    /// the unit itself always qualifies.
    async fn carrier_contents(
        &self,
        unit: &PracticeUnit,
        translation: &Translation,
    ) -> Result<Vec<String>, CoreError> {
        let carrier_keys = self
            .translations
            .find_unit_keys_by_translation(&translation.content)
            .await?;
        let mut contents: Vec<String> = carrier_keys
            .into_iter()
            .filter(|key| key.language == unit.language)
            .map(|key| key.content)
            .collect();
        if contents.is_empty() {
            contents.push(unit.content.clone());
        }
        Ok(contents)
    }
}

fn new_exercise_id() -> String {
    format!("exercise-{}", Uuid::new_v4())
}

fn choice_kind(option_count: usize) -> ExerciseKind {
    if option_count <= 2 {
        ExerciseKind::ChooseFromTwo
    } else {
        ExerciseKind::ChooseFromFour
    }
}

/// The blanked sentence with the first translation underneath as the hint.
fn cloze_prompt(blanked: &str, translations: &[String]) -> String {
    match translations.first() {
        Some(hint) => format!("{blanked}\n{hint}"),
        None => blanked.to_string(),
    }
}

/// Caps a long solutions list, marking the overflow instead of listing it.
fn reveal_solution(mut entries: Vec<String>, cap: usize) -> String {
    let overflow = entries.len().saturating_sub(cap);
    entries.truncate(cap);
    let mut solution = entries.join(", ");
    if overflow > 0 {
        solution.push_str(", …more");
    }
    solution
}
