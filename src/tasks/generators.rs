use uuid::Uuid;

use crate::types::{PracticeUnit, Task, TaskSize, TaskType, Translation};

/// One generator per task type. Self-contained: the unit, its resolved
/// translations and its resolved level go in, a bool or a full task comes out.
pub trait TaskGenerator: Send + Sync {
    fn task_type(&self) -> TaskType;

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool;

    fn build(&self, unit: &PracticeUnit, translations: &[Translation]) -> Task;
}

/// Every unit-level generator, in registration order.
///
/// Resource-extraction task types (add-vocab/examples/fact-cards-to-resource)
/// are created by ingestion flows, not here, so they have no generator.
pub fn registry() -> Vec<Box<dyn TaskGenerator>> {
    vec![
        Box::new(TryToRememberGenerator),
        Box::new(GuessSentenceMeaningGenerator),
        Box::new(ChooseFromTwoTargetToNativeGenerator),
        Box::new(ChooseFromTwoNativeToTargetGenerator),
        Box::new(ChooseFromFourTargetToNativeGenerator),
        Box::new(ChooseFromFourNativeToTargetGenerator),
        Box::new(RevealTargetToNativeGenerator),
        Box::new(RevealNativeToTargetGenerator),
        Box::new(ClozeChoiceGenerator),
        Box::new(ClozeRevealGenerator),
        Box::new(AddTranslationGenerator),
    ]
}

fn practice_task(unit: &PracticeUnit, task_type: TaskType, title: &str, prompt: String) -> Task {
    Task {
        uid: Uuid::new_v4().to_string(),
        language: unit.language.clone(),
        task_type,
        title: title.to_string(),
        prompt,
        is_active: true,
        is_one_time: false,
        task_size: TaskSize::Small,
        evaluate_difficulty_after_doing: true,
        decide_whether_to_do_again_after_doing: false,
        associated_units: vec![unit.uid.clone()],
        last_shown_at: None,
        last_difficulty_rating: None,
    }
}

fn has_content(unit: &PracticeUnit) -> bool {
    !unit.content.is_empty()
}

fn first_translation(translations: &[Translation]) -> &str {
    translations
        .first()
        .map(|translation| translation.content.as_str())
        .unwrap_or_default()
}

pub struct TryToRememberGenerator;

impl TaskGenerator for TryToRememberGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::TryToRemember
    }

    // No translations required: first contact works from the content alone.
    fn is_applicable(
        &self,
        unit: &PracticeUnit,
        _translations: &[Translation],
        level: i32,
    ) -> bool {
        level == -1 && !unit.kind.is_sentence() && has_content(unit)
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Try to remember",
            format!("Try to remember \"{}\"", unit.content),
        )
    }
}

pub struct GuessSentenceMeaningGenerator;

impl TaskGenerator for GuessSentenceMeaningGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::GuessSentenceMeaning
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        level == -1 && unit.kind.is_sentence() && has_content(unit) && !translations.is_empty()
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Guess the meaning",
            format!("What could \"{}\" mean?", unit.content),
        )
    }
}

fn word_choice_applicable(
    unit: &PracticeUnit,
    translations: &[Translation],
    level: i32,
    band: [i32; 2],
) -> bool {
    !unit.kind.is_sentence()
        && has_content(unit)
        && !translations.is_empty()
        && band.contains(&level)
}

pub struct ChooseFromTwoTargetToNativeGenerator;

impl TaskGenerator for ChooseFromTwoTargetToNativeGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::ChooseFromTwoTargetToNative
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        word_choice_applicable(unit, translations, level, [0, 1])
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Choose the correct translation",
            format!("What does \"{}\" mean?", unit.content),
        )
    }
}

pub struct ChooseFromTwoNativeToTargetGenerator;

impl TaskGenerator for ChooseFromTwoNativeToTargetGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::ChooseFromTwoNativeToTarget
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        word_choice_applicable(unit, translations, level, [1, 2])
    }

    fn build(&self, unit: &PracticeUnit, translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Choose the correct word",
            format!("What is the word for \"{}\"?", first_translation(translations)),
        )
    }
}

pub struct ChooseFromFourTargetToNativeGenerator;

impl TaskGenerator for ChooseFromFourTargetToNativeGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::ChooseFromFourTargetToNative
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        word_choice_applicable(unit, translations, level, [1, 2])
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Choose the correct translation",
            format!("What does \"{}\" mean?", unit.content),
        )
    }
}

pub struct ChooseFromFourNativeToTargetGenerator;

impl TaskGenerator for ChooseFromFourNativeToTargetGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::ChooseFromFourNativeToTarget
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        word_choice_applicable(unit, translations, level, [2, 3])
    }

    fn build(&self, unit: &PracticeUnit, translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Choose the correct word",
            format!("What is the word for \"{}\"?", first_translation(translations)),
        )
    }
}

pub struct RevealTargetToNativeGenerator;

impl TaskGenerator for RevealTargetToNativeGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::RevealTargetToNative
    }

    // Sentences reach free recall later than words.
    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        let threshold_met = if unit.kind.is_sentence() {
            level > 6
        } else {
            level >= 3
        };
        threshold_met && has_content(unit) && !translations.is_empty()
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "What does this mean?",
            format!("Think of the meaning of \"{}\", then reveal", unit.content),
        )
    }
}

pub struct RevealNativeToTargetGenerator;

impl TaskGenerator for RevealNativeToTargetGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::RevealNativeToTarget
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        let threshold_met = if unit.kind.is_sentence() {
            level > 6
        } else {
            level >= 4
        };
        threshold_met && has_content(unit) && !translations.is_empty()
    }

    fn build(&self, unit: &PracticeUnit, translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "What word has this translation?",
            format!("Think of the word for \"{}\", then reveal", first_translation(translations)),
        )
    }
}

fn cloze_applicable(unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
    unit.kind.is_sentence()
        && has_content(unit)
        && !translations.is_empty()
        && (0..=5).contains(&level)
}

pub struct ClozeChoiceGenerator;

impl TaskGenerator for ClozeChoiceGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::ClozeChoice
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        cloze_applicable(unit, translations, level)
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Fill in the blank",
            format!("Fill in the missing word of \"{}\"", unit.content),
        )
    }
}

pub struct ClozeRevealGenerator;

impl TaskGenerator for ClozeRevealGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::ClozeReveal
    }

    fn is_applicable(&self, unit: &PracticeUnit, translations: &[Translation], level: i32) -> bool {
        cloze_applicable(unit, translations, level)
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        practice_task(
            unit,
            self.task_type(),
            "Fill in the blank",
            format!("Fill in the missing word of \"{}\"", unit.content),
        )
    }
}

/// Data repair: a unit without translations cannot be practiced past first
/// contact, so surface a one-time task asking the learner to add one.
pub struct AddTranslationGenerator;

impl TaskGenerator for AddTranslationGenerator {
    fn task_type(&self) -> TaskType {
        TaskType::AddTranslation
    }

    fn is_applicable(
        &self,
        unit: &PracticeUnit,
        translations: &[Translation],
        _level: i32,
    ) -> bool {
        has_content(unit) && translations.is_empty()
    }

    fn build(&self, unit: &PracticeUnit, _translations: &[Translation]) -> Task {
        let mut task = practice_task(
            unit,
            self.task_type(),
            "Add a translation",
            format!("\"{}\" has no translation yet. Add one.", unit.content),
        );
        task.task_size = TaskSize::Medium;
        task.is_one_time = true;
        task.evaluate_difficulty_after_doing = false;
        task
    }
}
