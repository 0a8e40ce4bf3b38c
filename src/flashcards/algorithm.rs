//! SM-2 Spaced Repetition Algorithm
//!
//! Variant of the SuperMemo 2 algorithm used to schedule flashcard reviews.
//!
//! Ratings (0-3):
//! - 0: Again, the learner failed to recall the answer
//! - 1: Hard
//! - 2: Good
//! - 3: Easy
//!
//! Unlike textbook SM-2, a failed review resets the repetition count but
//! leaves the ease factor untouched.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::models::{Rating, ReviewState, MIN_EASE_FACTOR};

/// Milliseconds in one day
pub const DAY_MS: i64 = 86_400_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Invalid rating: {0} (expected 0-3)")]
    InvalidArgument(i64),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Calculate the next review state for a card
///
/// # Arguments
/// * `current` - The learner's current state, `None` if never reviewed
/// * `rating` - Recall grade
/// * `now` - Time of the review
///
/// # Returns
/// A new state that replaces `current`
pub fn calculate_next_review(
    current: Option<&ReviewState>,
    rating: Rating,
    now: DateTime<Utc>,
) -> ReviewState {
    let current = current.copied().unwrap_or_default();

    let (interval, repetitions, ease_factor) = match rating {
        Rating::Again => (1, 0, current.ease_factor),
        _ => {
            let interval = match current.repetitions {
                0 => 1,
                1 => 6,
                _ => (current.interval as f64 * current.ease_factor).round() as u32,
            };

            // EF' = EF + (0.1 - (3-q) * (0.08 + (3-q) * 0.02))
            let distance = (Rating::Easy.value() - rating.value()) as f64;
            let ease_factor = (current.ease_factor + (0.1 - distance * (0.08 + distance * 0.02)))
                .max(MIN_EASE_FACTOR);

            (interval, current.repetitions + 1, ease_factor)
        }
    };

    ReviewState {
        interval,
        repetitions,
        ease_factor,
        next_review: now.timestamp_millis() + interval as i64 * DAY_MS,
    }
}

/// Validate a raw rating and calculate the next review state
pub fn next_review_state(
    current: Option<&ReviewState>,
    rating: i64,
    now: DateTime<Utc>,
) -> Result<ReviewState> {
    let rating = Rating::try_from(rating)?;
    Ok(calculate_next_review(current, rating, now))
}

/// Calculate the interval each rating would give.
/// Used to show learners what each button leads to.
pub fn preview_intervals(current: Option<&ReviewState>) -> [u32; 4] {
    let now = DateTime::<Utc>::UNIX_EPOCH;
    Rating::ALL.map(|rating| calculate_next_review(current, rating, now).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
