use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    Word,
    Sentence,
    FactCard,
    Resource,
    Goal,
    Unspecified,
}

impl UnitKind {
    /// Sentences get cloze/meaning exercises and later reveal thresholds;
    /// everything else follows the word dispatch table.
    pub fn is_sentence(&self) -> bool {
        matches!(self, Self::Sentence)
    }
}

impl Default for UnitKind {
    fn default() -> Self {
        Self::Unspecified
    }
}

/// Stable lookup key: a unit is identified by (language, content).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitKey {
    pub language: String,
    pub content: String,
}

impl UnitKey {
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeUnit {
    pub uid: String,
    pub language: String,
    pub content: String,
    #[serde(default)]
    pub kind: UnitKind,
    /// Translation uids, resolved through the translation repository.
    #[serde(default)]
    pub translations: Vec<String>,
    #[serde(default)]
    pub do_not_practice: bool,
    #[serde(default)]
    pub priority: i32,
    /// Task-reference list maintained by the task coordinator.
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl PracticeUnit {
    pub fn new(language: impl Into<String>, content: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            language: language.into(),
            content: content.into(),
            kind,
            translations: Vec::new(),
            do_not_practice: false,
            priority: 0,
            tasks: Vec::new(),
        }
    }

    pub fn key(&self) -> UnitKey {
        UnitKey::new(self.language.clone(), self.content.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub uid: String,
    pub language: String,
    pub content: String,
}

impl Translation {
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            language: language.into(),
            content: content.into(),
        }
    }
}

/// A learning resource (an article, a video, a song) whose vocabulary the
/// learner extracts and practices over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uid: String,
    pub language: String,
    pub title: String,
    pub last_shown_at: Option<DateTime<Utc>>,
    /// Unit uids linked to this resource.
    #[serde(default)]
    pub associated_units: Vec<String>,
}

impl Resource {
    pub fn new(language: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            language: language.into(),
            title: title.into(),
            last_shown_at: None,
            associated_units: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSentence {
    pub uid: String,
    pub language: String,
    pub content: String,
    /// Unit uids of the vocabulary this example exercises.
    #[serde(default)]
    pub associated_units: Vec<String>,
}

impl ExampleSentence {
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            language: language.into(),
            content: content.into(),
            associated_units: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    TryToRemember,
    ChooseFromTwoTargetToNative,
    ChooseFromTwoNativeToTarget,
    ChooseFromFourTargetToNative,
    ChooseFromFourNativeToTarget,
    RevealTargetToNative,
    RevealNativeToTarget,
    ClozeChoice,
    ClozeReveal,
    GuessSentenceMeaning,
    AddTranslation,
    AddVocabToResource,
    AddExamplesToResource,
    AddFactCardsToResource,
}

impl TaskType {
    /// Ingestion-side task types that pull new material out of a resource.
    pub const RESOURCE_EXTRACTION: [TaskType; 3] = [
        Self::AddVocabToResource,
        Self::AddExamplesToResource,
        Self::AddFactCardsToResource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TryToRemember => "try-to-remember",
            Self::ChooseFromTwoTargetToNative => "choose-from-two-target-to-native",
            Self::ChooseFromTwoNativeToTarget => "choose-from-two-native-to-target",
            Self::ChooseFromFourTargetToNative => "choose-from-four-target-to-native",
            Self::ChooseFromFourNativeToTarget => "choose-from-four-native-to-target",
            Self::RevealTargetToNative => "reveal-target-to-native",
            Self::RevealNativeToTarget => "reveal-native-to-target",
            Self::ClozeChoice => "cloze-choice",
            Self::ClozeReveal => "cloze-reveal",
            Self::GuessSentenceMeaning => "guess-sentence-meaning",
            Self::AddTranslation => "add-translation",
            Self::AddVocabToResource => "add-vocab-to-resource",
            Self::AddExamplesToResource => "add-examples-to-resource",
            Self::AddFactCardsToResource => "add-fact-cards-to-resource",
        }
    }

    /// The task types that mark a resource as still worth extracting from.
    pub fn is_resource_extraction(&self) -> bool {
        Self::RESOURCE_EXTRACTION.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskSize {
    Small,
    Medium,
    Big,
}

impl Default for TaskSize {
    fn default() -> Self {
        Self::Small
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub uid: String,
    pub language: String,
    pub task_type: TaskType,
    pub title: String,
    pub prompt: String,
    pub is_active: bool,
    pub is_one_time: bool,
    #[serde(default)]
    pub task_size: TaskSize,
    pub evaluate_difficulty_after_doing: bool,
    pub decide_whether_to_do_again_after_doing: bool,
    /// Unit uids this task targets.
    pub associated_units: Vec<String>,
    pub last_shown_at: Option<DateTime<Utc>>,
    pub last_difficulty_rating: Option<f64>,
}

/// Review outcome on the 1–4 ordinal scale; 3 and above count as a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Fail,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub fn score(&self) -> u8 {
        match self {
            Self::Fail => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.score() >= 3
    }
}

/// Mirror of the scheduling primitive's card phase, kept as our own enum so the
/// persisted format does not depend on a third-party crate's serde layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewPhase {
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for ReviewPhase {
    fn default() -> Self {
        Self::New
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub unit_uid: String,
    pub level: i32,
    pub streak: u32,
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: i64,
    pub scheduled_days: i64,
    pub reps: i32,
    pub lapses: i32,
    #[serde(default)]
    pub phase: ReviewPhase,
    pub last_review: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Blank record for a (unit, level) pair that has never been reviewed.
    pub fn fresh(unit_uid: impl Into<String>, level: i32, now: DateTime<Utc>) -> Self {
        Self {
            unit_uid: unit_uid.into(),
            level,
            streak: 0,
            due: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            phase: ReviewPhase::New,
            last_review: None,
        }
    }

    /// A record counts toward the unit's resolved level only once it has
    /// actually been reviewed.
    pub fn is_reviewed(&self) -> bool {
        self.reps > 0
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    TargetToNative,
    NativeToTarget,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TargetToNative => "target-to-native",
            Self::NativeToTarget => "native-to-target",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    TryToRemember,
    Reveal,
    ChooseFromTwo,
    ChooseFromFour,
    ClozeChoice,
    ClozeReveal,
    GuessSentenceMeaning,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TryToRemember => "try-to-remember",
            Self::Reveal => "reveal",
            Self::ChooseFromTwo => "choose-from-two",
            Self::ChooseFromFour => "choose-from-four",
            Self::ClozeChoice => "cloze-choice",
            Self::ClozeReveal => "cloze-reveal",
            Self::GuessSentenceMeaning => "guess-sentence-meaning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub content: String,
    pub is_correct: bool,
}

/// Unit data frozen at generation time so the exercise stays consistent even
/// if the corpus changes mid-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSnapshot {
    pub language: String,
    pub content: String,
    pub translations: Vec<String>,
}

/// Ephemeral practice item. Never persisted; only the review outcome of doing
/// one flows back into a progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub kind: ExerciseKind,
    pub direction: Direction,
    pub prompt: String,
    pub solution: Option<String>,
    #[serde(default)]
    pub answer_options: Vec<AnswerOption>,
    pub unit: UnitSnapshot,
    pub level: i32,
    pub is_repeatable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub exercises: Vec<Exercise>,
    pub current_exercise_index: usize,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self {
            id: format!("lesson-{}", Uuid::new_v4()),
            exercises,
            current_exercise_index: 0,
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.exercises.get(self.current_exercise_index)
    }

    /// Moves the cursor forward; marks the lesson completed when the last
    /// exercise has been passed.
    pub fn advance(&mut self) {
        if self.current_exercise_index + 1 < self.exercises.len() {
            self.current_exercise_index += 1;
        } else {
            self.is_completed = true;
        }
    }
}
