/// 例句提议器的「记忆新鲜度」阈值：关联词汇中 top-of-mind 比例低于此值才算需要练习
pub const TOP_OF_MIND_THRESHOLD: f64 = 0.8;

/// 沉浸内容选词时偏向已见到期词汇的权重（其余概率选新词）
pub const SEEN_OVER_NEW_BIAS: f64 = 0.7;

/// Minimum / maximum number of exercises in one lesson.
pub const LESSON_MIN_SIZE: usize = 5;
pub const LESSON_MAX_SIZE: usize = 20;

/// Ideal distractors stay within this many characters of the correct answer.
pub const DISTRACTOR_LENGTH_TOLERANCE: usize = 3;

/// Ideal distractors must differ from every correct translation by more than
/// this edit distance.
pub const DISTRACTOR_MIN_EDIT_DISTANCE: usize = 2;

/// Reveal solutions list at most this many entries before "…more".
pub const REVEAL_LIST_CAP: usize = 8;

/// Target retention passed to the scheduling primitive.
pub const DEFAULT_REQUEST_RETENTION: f64 = 0.9;

/// Consecutive passes required before a unit advances one level.
pub const STREAK_TO_LEVEL_UP: u32 = 2;

/// Cloze tokens shorter than this are skipped when a longer candidate exists.
pub const CLOZE_MIN_TOKEN_CHARS: usize = 3;

/// Placeholder glyphs for blanked cloze tokens, by script direction.
pub const CLOZE_PLACEHOLDER_LTR: &str = "???";
pub const CLOZE_PLACEHOLDER_RTL: &str = "؟؟؟";

/// A resource shown within this window does not count as due again yet.
pub const RESOURCE_RESHOW_COOLDOWN_MINUTES: i64 = 10;
