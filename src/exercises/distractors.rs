use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::ExerciseConfig;
use crate::contracts::{TranslationRepo, UnitRepo};
use crate::error::CoreError;
use crate::exercises::text;
use crate::rng::PracticeRng;
use crate::types::{PracticeUnit, Translation};

/// Picks wrong answers for choice exercises. Ideal candidates look plausible
/// next to the correct answer (similar length) without being confusable with
/// it (edit distance above the configured floor); when the corpus cannot
/// supply enough of those, any other distinct answer fills in.
pub struct DistractorBuilder {
    units: Arc<dyn UnitRepo>,
    translations: Arc<dyn TranslationRepo>,
    config: ExerciseConfig,
}

impl DistractorBuilder {
    pub fn new(
        units: Arc<dyn UnitRepo>,
        translations: Arc<dyn TranslationRepo>,
        config: ExerciseConfig,
    ) -> Self {
        Self {
            units,
            translations,
            config,
        }
    }

    /// Wrong native-language answers for a target→native choice exercise.
    /// The ideal pool is the translations of other currently-due units in the
    /// unit's language; the fallback pool is every translation in the correct
    /// answer's language.
    pub async fn wrong_translations(
        &self,
        unit: &PracticeUnit,
        correct_translations: &[Translation],
        correct_answer: &str,
        count: usize,
        rng: &mut PracticeRng,
    ) -> Result<Vec<String>, CoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut used: HashSet<String> = HashSet::new();
        used.insert(correct_answer.to_string());
        let target_len = correct_answer.chars().count();

        let pool = self.due_translation_pool(unit).await?;
        let ideal = dedup_contents(
            pool.iter()
                .filter(|candidate| {
                    text::is_length_within(
                        &candidate.content,
                        target_len,
                        self.config.distractor_length_tolerance,
                    ) && correct_translations.iter().all(|correct| {
                        text::levenshtein(&candidate.content, &correct.content)
                            > self.config.distractor_min_edit_distance
                    })
                })
                .map(|candidate| candidate.content.as_str()),
            &used,
        );

        let mut wrong = rng.sample(&ideal, count);
        used.extend(wrong.iter().cloned());

        if wrong.len() < count {
            let fallback_language = correct_translations
                .first()
                .map(|translation| translation.language.clone())
                .unwrap_or_default();
            let fallback_pool = self.translations.get_all_in_language(&fallback_language).await?;
            let fallback = dedup_contents(
                fallback_pool
                    .iter()
                    .map(|candidate| candidate.content.as_str()),
                &used,
            );
            wrong.extend(rng.sample(&fallback, count - wrong.len()));
        }

        Ok(wrong)
    }

    /// Wrong target-language contents for a native→target choice exercise;
    /// both pools draw from currently-due units in the language.
    pub async fn wrong_contents(
        &self,
        language: &str,
        correct_content: &str,
        count: usize,
        rng: &mut PracticeRng,
    ) -> Result<Vec<String>, CoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut used: HashSet<String> = HashSet::new();
        used.insert(correct_content.to_string());
        let target_len = correct_content.chars().count();

        let languages = [language.to_string()];
        let due_units = self.units.get_due(&languages, None, Utc::now()).await?;

        let ideal = dedup_contents(
            due_units
                .iter()
                .filter(|candidate| {
                    !candidate.content.is_empty()
                        && text::is_length_within(
                            &candidate.content,
                            target_len,
                            self.config.distractor_length_tolerance,
                        )
                        && text::levenshtein(&candidate.content, correct_content)
                            > self.config.distractor_min_edit_distance
                })
                .map(|candidate| candidate.content.as_str()),
            &used,
        );

        let mut wrong = rng.sample(&ideal, count);
        used.extend(wrong.iter().cloned());

        if wrong.len() < count {
            let fallback = dedup_contents(
                due_units
                    .iter()
                    .filter(|candidate| !candidate.content.is_empty())
                    .map(|candidate| candidate.content.as_str()),
                &used,
            );
            wrong.extend(rng.sample(&fallback, count - wrong.len()));
        }

        Ok(wrong)
    }

    async fn due_translation_pool(
        &self,
        unit: &PracticeUnit,
    ) -> Result<Vec<Translation>, CoreError> {
        let languages = [unit.language.clone()];
        let due_units = self.units.get_due(&languages, None, Utc::now()).await?;

        let mut ids = Vec::new();
        for due in &due_units {
            if due.uid == unit.uid {
                continue;
            }
            ids.extend(due.translations.iter().cloned());
        }
        self.translations.get_by_ids(&ids).await
    }
}

/// Distinct contents in first-occurrence order, minus anything already used.
fn dedup_contents<'a>(
    candidates: impl Iterator<Item = &'a str>,
    used: &HashSet<String>,
) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut distinct = Vec::new();
    for content in candidates {
        if used.contains(content) {
            continue;
        }
        if seen.insert(content) {
            distinct.push(content.to_string());
        }
    }
    distinct
}
