//! Data models for the flashcard system

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::SchedulerError;

/// Ease factor given to a card the first time a learner rates it
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// A deck groups the flashcards generated for one subject (usually a disease summary)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            card_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn new(deck_id: Uuid, front: String, back: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front,
            back,
            tags: Vec::new(),
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Recall grade submitted by a learner after seeing the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rating {
    /// Failed to recall
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn value(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Again),
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Easy),
            other => Err(SchedulerError::InvalidArgument(other)),
        }
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

/// Informal phase of a card, derived from `(repetitions, interval)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewPhase {
    /// Never rated by this learner
    New,
    /// Zero or one successful repetition
    Learning,
    /// Interval grows by the ease factor
    Review,
}

/// Spaced repetition state of one card for one learner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    /// Current interval in days
    #[serde(default)]
    pub interval: u32,
    /// Consecutive successful reviews since the last lapse
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Epoch milliseconds at which the card is due again
    #[serde(default)]
    pub next_review: i64,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            interval: 0,
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            next_review: 0,
        }
    }
}

impl ReviewState {
    /// Check if the card is due for review at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now.timestamp_millis()
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.next_review).single()
    }

    pub fn phase(&self) -> ReviewPhase {
        match (self.repetitions, self.interval) {
            (0, 0) => ReviewPhase::New,
            (0, _) | (1, _) => ReviewPhase::Learning,
            _ => ReviewPhase::Review,
        }
    }
}

/// Review states of one card keyed by learner id
pub type LearnerStates = BTreeMap<String, ReviewState>;

/// Statistics for a deck or all decks, from one learner's point of view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub due_cards: usize,
}

/// A card with the learner's current state, used for review sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardWithState {
    pub card: Flashcard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ReviewState>,
}

impl CardWithState {
    /// Never-reviewed cards sort before everything else
    pub fn due_key(&self) -> i64 {
        self.state.map_or(i64::MIN, |s| s.next_review)
    }
}
