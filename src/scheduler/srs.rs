use chrono::{DateTime, Utc};
use rs_fsrs::{Card, Parameters, FSRS};

use crate::types::{ProgressRecord, Rating, ReviewPhase};

/// Boundary to the FSRS scheduling primitive.
///
/// Progress records mirror the card fields so the persisted format never
/// depends on the library's own serde layout; this module is the only place
/// that maps between the two.
pub struct Srs {
    fsrs: FSRS,
}

impl Srs {
    pub fn new(request_retention: f64) -> Self {
        Self {
            fsrs: FSRS::new(Parameters {
                request_retention,
                ..Default::default()
            }),
        }
    }

    /// Runs one review outcome through the scheduler and returns the record
    /// with its card state replaced. Level and streak are copied through
    /// untouched; the level model owns those.
    pub fn reschedule(
        &self,
        record: &ProgressRecord,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> ProgressRecord {
        let card = card_from_record(record, now);
        let record_log = self.fsrs.repeat(card, now);
        let next = record_log[&fsrs_rating(rating)].card.clone();
        record_with_card(record, &next)
    }
}

fn fsrs_rating(rating: Rating) -> rs_fsrs::Rating {
    match rating {
        Rating::Fail => rs_fsrs::Rating::Again,
        Rating::Hard => rs_fsrs::Rating::Hard,
        Rating::Good => rs_fsrs::Rating::Good,
        Rating::Easy => rs_fsrs::Rating::Easy,
    }
}

fn phase_from_state(state: rs_fsrs::State) -> ReviewPhase {
    match state {
        rs_fsrs::State::New => ReviewPhase::New,
        rs_fsrs::State::Learning => ReviewPhase::Learning,
        rs_fsrs::State::Review => ReviewPhase::Review,
        rs_fsrs::State::Relearning => ReviewPhase::Relearning,
    }
}

fn state_from_phase(phase: ReviewPhase) -> rs_fsrs::State {
    match phase {
        ReviewPhase::New => rs_fsrs::State::New,
        ReviewPhase::Learning => rs_fsrs::State::Learning,
        ReviewPhase::Review => rs_fsrs::State::Review,
        ReviewPhase::Relearning => rs_fsrs::State::Relearning,
    }
}

fn card_from_record(record: &ProgressRecord, _now: DateTime<Utc>) -> Card {
    let mut card = Card::new();
    if record.is_reviewed() {
        card.due = record.due;
        card.stability = record.stability;
        card.difficulty = record.difficulty;
        card.elapsed_days = record.elapsed_days;
        card.scheduled_days = record.scheduled_days;
        card.reps = record.reps;
        card.lapses = record.lapses;
        card.state = state_from_phase(record.phase);
        if let Some(last_review) = record.last_review {
            card.last_review = last_review;
        }
    }
    card
}

fn record_with_card(record: &ProgressRecord, card: &Card) -> ProgressRecord {
    ProgressRecord {
        unit_uid: record.unit_uid.clone(),
        level: record.level,
        streak: record.streak,
        due: card.due,
        stability: card.stability,
        difficulty: card.difficulty,
        elapsed_days: card.elapsed_days,
        scheduled_days: card.scheduled_days,
        reps: card.reps,
        lapses: card.lapses,
        phase: phase_from_state(card.state),
        last_review: Some(card.last_review),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_REQUEST_RETENTION;
    use chrono::Duration;

    fn srs() -> Srs {
        Srs::new(DEFAULT_REQUEST_RETENTION)
    }

    #[test]
    fn first_review_leaves_the_new_phase() {
        let now = Utc::now();
        let fresh = ProgressRecord::fresh("u1", 0, now);

        let updated = srs().reschedule(&fresh, Rating::Good, now);

        assert_eq!(updated.reps, 1);
        assert_ne!(updated.phase, ReviewPhase::New);
        assert!(updated.due > now);
        assert_eq!(updated.last_review, Some(now));
        assert_eq!(updated.level, 0);
        assert_eq!(updated.streak, 0);
    }

    #[test]
    fn easy_review_schedules_days_out() {
        let now = Utc::now();
        let fresh = ProgressRecord::fresh("u1", 0, now);

        let updated = srs().reschedule(&fresh, Rating::Easy, now);

        assert!(updated.scheduled_days >= 1);
        assert!(updated.due >= now + Duration::days(1));
        assert_eq!(updated.phase, ReviewPhase::Review);
    }

    #[test]
    fn failing_a_reviewed_card_counts_a_lapse() {
        let now = Utc::now();
        let fresh = ProgressRecord::fresh("u1", 0, now);
        let reviewed = srs().reschedule(&fresh, Rating::Easy, now);
        assert_eq!(reviewed.lapses, 0);

        let later = now + Duration::days(30);
        let failed = srs().reschedule(&reviewed, Rating::Fail, later);

        assert_eq!(failed.lapses, 1);
        assert_eq!(failed.phase, ReviewPhase::Relearning);
        assert_eq!(failed.reps, 2);
    }

    #[test]
    fn stability_grows_across_spaced_passes() {
        let now = Utc::now();
        let fresh = ProgressRecord::fresh("u1", 0, now);
        let first = srs().reschedule(&fresh, Rating::Good, now);

        let later = now + Duration::days(10);
        let second = srs().reschedule(&first, Rating::Good, later);

        assert!(second.stability > first.stability);
        assert!(second.due > later);
    }
}
