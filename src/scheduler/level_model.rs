use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::SchedulerConfig;
use crate::constants::STREAK_TO_LEVEL_UP;
use crate::contracts::ProgressRepo;
use crate::error::CoreError;
use crate::scheduler::srs::Srs;
use crate::types::{PracticeUnit, ProgressRecord, Rating};

/// Level/streak transition for one review outcome.
///
/// A pass keeps the unit at its floor level and extends the streak; once the
/// streak reaches [`STREAK_TO_LEVEL_UP`] the unit climbs one level and the
/// streak restarts. A fail drops the unit one level (never below 0) and
/// clears the streak. Levels never move by more than one per review.
pub fn next_level_and_streak(level: i32, streak: u32, rating: Rating) -> (i32, u32) {
    if rating.is_pass() {
        let new_streak = streak + 1;
        if new_streak >= STREAK_TO_LEVEL_UP {
            (level.max(0) + 1, 0)
        } else {
            (level.max(0), new_streak)
        }
    } else {
        ((level - 1).max(0), 0)
    }
}

/// Highest level with a non-degenerate (actually reviewed) record, -1 when
/// the unit has never been reviewed.
pub fn resolve_level(records: &[ProgressRecord]) -> i32 {
    records
        .iter()
        .filter(|record| record.is_reviewed())
        .map(|record| record.level)
        .max()
        .unwrap_or(-1)
}

pub fn record_at(records: &[ProgressRecord], level: i32) -> Option<&ProgressRecord> {
    records
        .iter()
        .find(|record| record.level == level && record.is_reviewed())
}

/// Absence of state is data: a brand-new unit is due at level 0 by
/// definition, while a missing record at any other level means "not due
/// there".
pub fn is_due_at_level(records: &[ProgressRecord], level: i32, now: DateTime<Utc>) -> bool {
    match record_at(records, level) {
        Some(record) => record.is_due(now),
        None => level == 0 && resolve_level(records) == -1,
    }
}

pub fn is_seen(records: &[ProgressRecord]) -> bool {
    resolve_level(records) >= 0
}

/// Due at the unit's resolved level; unseen units count as due.
pub fn is_due_now(records: &[ProgressRecord], now: DateTime<Utc>) -> bool {
    let level = resolve_level(records);
    if level < 0 {
        return true;
    }
    record_at(records, level)
        .map(|record| record.is_due(now))
        .unwrap_or(true)
}

pub fn is_seen_and_due(records: &[ProgressRecord], now: DateTime<Utc>) -> bool {
    is_seen(records) && is_due_now(records, now)
}

/// Reviewed before and not due again yet — the unit is still fresh in the
/// learner's memory.
pub fn is_top_of_mind(records: &[ProgressRecord], now: DateTime<Utc>) -> bool {
    is_seen(records) && !is_due_now(records, now)
}

/// Structural eligibility: can any exercise be generated for this unit at
/// this level? Sentences defer free recall to much later than words, and
/// level 6 is a sentence dead zone between the cloze band and the reveal
/// band.
pub fn is_eligible_at_level(unit: &PracticeUnit, has_translations: bool, level: i32) -> bool {
    if unit.content.is_empty() {
        return false;
    }
    if unit.kind.is_sentence() {
        match level {
            -1 => has_translations,
            0..=5 => has_translations,
            6 => false,
            _ => has_translations,
        }
    } else {
        match level {
            -1 => true,
            _ => has_translations,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewOptions {
    /// Force `due = now` on fail/hard outcomes so the unit resurfaces sooner
    /// than the scheduler's own interval.
    pub immediate_due: bool,
}

/// Interprets scheduling-primitive output plus streak/outcome into discrete
/// mastery levels, and answers due/eligibility questions about them.
pub struct LevelModel {
    srs: Srs,
    progress: Arc<dyn ProgressRepo>,
}

impl LevelModel {
    pub fn new(config: &SchedulerConfig, progress: Arc<dyn ProgressRepo>) -> Self {
        Self {
            srs: Srs::new(config.request_retention),
            progress,
        }
    }

    /// Records one review outcome at the given level and persists the
    /// resulting record at its new level.
    pub async fn record_review(
        &self,
        unit_uid: &str,
        level: i32,
        rating: Rating,
        options: ReviewOptions,
    ) -> Result<ProgressRecord, CoreError> {
        let now = Utc::now();
        let current = self
            .progress
            .get(unit_uid, level)
            .await?
            .unwrap_or_else(|| ProgressRecord::fresh(unit_uid, level, now));

        let scheduled = self.srs.reschedule(&current, rating, now);
        let (new_level, new_streak) = next_level_and_streak(level, current.streak, rating);

        let mut updated = scheduled;
        updated.level = new_level;
        updated.streak = new_streak;
        if options.immediate_due && !rating.is_pass() {
            updated.due = now;
        }

        if new_level < level {
            // The failed level must stop counting toward the resolved level,
            // otherwise the unit could never regress.
            self.progress
                .upsert(&ProgressRecord::fresh(unit_uid, level, now))
                .await?;
        }
        self.progress.upsert(&updated).await?;

        tracing::debug!(
            unit_uid,
            level,
            new_level,
            streak = new_streak,
            rating = rating.score(),
            "recorded review"
        );
        Ok(updated)
    }

    pub async fn records_for(&self, unit_uid: &str) -> Result<Vec<ProgressRecord>, CoreError> {
        self.progress.get_all_for_unit(unit_uid).await
    }

    pub async fn resolved_level(&self, unit_uid: &str) -> Result<i32, CoreError> {
        let records = self.progress.get_all_for_unit(unit_uid).await?;
        Ok(resolve_level(&records))
    }

    pub async fn is_due_at_level(
        &self,
        unit_uid: &str,
        level: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let records = self.progress.get_all_for_unit(unit_uid).await?;
        Ok(is_due_at_level(&records, level, now))
    }

    pub async fn is_top_of_mind(
        &self,
        unit_uid: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let records = self.progress.get_all_for_unit(unit_uid).await?;
        Ok(is_top_of_mind(&records, now))
    }
}
