use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/practice.sled"),
            engine: EngineConfig::from_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// FSRS 期望保留率，间隔由此推算
    pub request_retention: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            request_retention: constants::DEFAULT_REQUEST_RETENTION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonConfig {
    pub min_size: usize,
    pub max_size: usize,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            min_size: constants::LESSON_MIN_SIZE,
            max_size: constants::LESSON_MAX_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseConfig {
    pub distractor_length_tolerance: usize,
    pub distractor_min_edit_distance: usize,
    /// 解答列表最多展示的词条数，超出部分折叠
    pub reveal_list_cap: usize,
    #[serde(default = "default_cloze_min_token_chars")]
    pub cloze_min_token_chars: usize,
}

fn default_cloze_min_token_chars() -> usize {
    constants::CLOZE_MIN_TOKEN_CHARS
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            distractor_length_tolerance: constants::DISTRACTOR_LENGTH_TOLERANCE,
            distractor_min_edit_distance: constants::DISTRACTOR_MIN_EDIT_DISTANCE,
            reveal_list_cap: constants::REVEAL_LIST_CAP,
            cloze_min_token_chars: constants::CLOZE_MIN_TOKEN_CHARS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposerConfig {
    pub top_of_mind_threshold: f64,
    pub seen_over_new_bias: f64,
}

impl Default for ProposerConfig {
    fn default() -> Self {
        Self {
            top_of_mind_threshold: constants::TOP_OF_MIND_THRESHOLD,
            seen_over_new_bias: constants::SEEN_OVER_NEW_BIAS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub lesson: LessonConfig,
    #[serde(default)]
    pub exercise: ExerciseConfig,
    #[serde(default)]
    pub proposer: ProposerConfig,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.scheduler.request_retention = env_or_parse(
            "PRACTICE_REQUEST_RETENTION",
            config.scheduler.request_retention,
        );
        config.lesson.min_size = env_or_parse("PRACTICE_LESSON_MIN_SIZE", config.lesson.min_size);
        config.lesson.max_size = env_or_parse("PRACTICE_LESSON_MAX_SIZE", config.lesson.max_size);
        config.proposer.seen_over_new_bias = env_or_parse(
            "PRACTICE_SEEN_OVER_NEW_BIAS",
            config.proposer.seen_over_new_bias,
        );
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.5..=0.99).contains(&self.scheduler.request_retention) {
            return Err("scheduler.request_retention must be in [0.5,0.99]".to_string());
        }
        if self.lesson.min_size == 0 {
            return Err("lesson.min_size must be > 0".to_string());
        }
        if self.lesson.max_size < self.lesson.min_size {
            return Err("lesson.max_size must be >= lesson.min_size".to_string());
        }
        if self.exercise.reveal_list_cap == 0 {
            return Err("exercise.reveal_list_cap must be > 0".to_string());
        }
        if self.exercise.cloze_min_token_chars == 0 {
            return Err("exercise.cloze_min_token_chars must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.proposer.top_of_mind_threshold) {
            return Err("proposer.top_of_mind_threshold must be in [0,1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.proposer.seen_over_new_bias) {
            return Err("proposer.seen_over_new_bias must be in [0,1]".to_string());
        }
        Ok(())
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
