//! Storage operations for flashcards
//!
//! Directory structure:
//! ```text
//! {data-dir}/flashcards/
//! ├── decks.json           # Array of all decks
//! ├── cards/
//! │   └── {card-id}.json   # Individual card files
//! └── states/
//!     └── {card-id}.json   # Review state per learner id
//! ```
//!
//! Writes are last-write-wins; there is no locking between processes.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{calculate_next_review, SchedulerError};
use super::models::*;

#[derive(Error, Debug)]
pub enum FlashcardStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

pub type Result<T> = std::result::Result<T, FlashcardStorageError>;

/// Storage manager for flashcard operations
pub struct FlashcardStorage {
    /// Base data path (e.g., ~/.local/share/revisa)
    data_path: PathBuf,
}

impl FlashcardStorage {
    pub fn new(data_path: PathBuf) -> Self {
        Self { data_path }
    }

    /// Default data directory for the current user
    pub fn default_data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("revisa"))
    }

    fn flashcards_dir(&self) -> PathBuf {
        self.data_path.join("flashcards")
    }

    fn cards_dir(&self) -> PathBuf {
        self.flashcards_dir().join("cards")
    }

    fn states_dir(&self) -> PathBuf {
        self.flashcards_dir().join("states")
    }

    fn decks_path(&self) -> PathBuf {
        self.flashcards_dir().join("decks.json")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    fn state_path(&self, card_id: Uuid) -> PathBuf {
        self.states_dir().join(format!("{}.json", card_id))
    }

    /// Initialize the directory layout
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.cards_dir())?;
        fs::create_dir_all(self.states_dir())?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            let empty_decks: Vec<Deck> = Vec::new();
            fs::write(&decks_path, serde_json::to_string_pretty(&empty_decks)?)?;
        }

        Ok(())
    }

    // ==================== Deck Operations ====================

    /// List all decks
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.list_decks()?
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or(FlashcardStorageError::DeckNotFound(deck_id))
    }

    pub fn create_deck(&self, name: String, description: Option<String>) -> Result<Deck> {
        self.init()?;

        let mut deck = Deck::new(name);
        deck.description = description;

        let mut decks = self.list_decks()?;
        decks.push(deck.clone());
        self.write_decks(&decks)?;

        log::info!("Created deck '{}' ({})", deck.name, deck.id);
        Ok(deck)
    }

    fn write_decks(&self, decks: &[Deck]) -> Result<()> {
        fs::write(self.decks_path(), serde_json::to_string_pretty(decks)?)?;
        Ok(())
    }

    fn update_deck(&self, deck: &Deck) -> Result<()> {
        let mut decks = self.list_decks()?;
        let pos = decks
            .iter()
            .position(|d| d.id == deck.id)
            .ok_or(FlashcardStorageError::DeckNotFound(deck.id))?;

        decks[pos] = deck.clone();
        self.write_decks(&decks)
    }

    /// Delete a deck and all its cards
    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        for card in self.list_cards(Some(deck_id))? {
            self.remove_card_files(card.id)?;
        }

        let mut decks = self.list_decks()?;
        decks.retain(|d| d.id != deck_id);
        self.write_decks(&decks)
    }

    fn update_deck_card_count(&self, deck_id: Uuid) -> Result<()> {
        let cards = self.list_cards(Some(deck_id))?;
        let mut deck = self.get_deck(deck_id)?;
        deck.card_count = cards.len();
        deck.updated_at = Utc::now();
        self.update_deck(&deck)
    }

    // ==================== Card Operations ====================

    /// List cards, optionally restricted to one deck, ordered by position
    pub fn list_cards(&self, deck_id: Option<Uuid>) -> Result<Vec<Flashcard>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let card: Flashcard = serde_json::from_str(&content)?;
                if deck_id.map_or(true, |id| card.deck_id == id) {
                    cards.push(card);
                }
            }
        }

        cards.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(cards)
    }

    pub fn get_card(&self, card_id: Uuid) -> Result<Flashcard> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(FlashcardStorageError::CardNotFound(card_id));
        }

        let content = fs::read_to_string(&card_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn create_card(
        &self,
        deck_id: Uuid,
        front: String,
        back: String,
        tags: Option<Vec<String>>,
    ) -> Result<Flashcard> {
        self.init()?;
        // Fail early on an unknown deck
        self.get_deck(deck_id)?;

        let position = self.list_cards(Some(deck_id))?.len() as i32;

        let mut card = Flashcard::new(deck_id, front, back);
        card.position = position;
        if let Some(t) = tags {
            card.tags = t;
        }

        fs::write(self.card_path(card.id), serde_json::to_string_pretty(&card)?)?;
        self.update_deck_card_count(deck_id)?;

        Ok(card)
    }

    /// Delete a card and all learners' states for it
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let card = self.get_card(card_id)?;
        self.remove_card_files(card_id)?;
        self.update_deck_card_count(card.deck_id)
    }

    fn remove_card_files(&self, card_id: Uuid) -> Result<()> {
        for path in [self.card_path(card_id), self.state_path(card_id)] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    // ==================== State Operations ====================

    fn read_states(&self, card_id: Uuid) -> Result<LearnerStates> {
        let state_path = self.state_path(card_id);
        if !state_path.exists() {
            return Ok(LearnerStates::new());
        }

        let content = fs::read_to_string(&state_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Get a learner's state for a card, `None` if never reviewed
    pub fn get_review_state(&self, card_id: Uuid, learner: &str) -> Result<Option<ReviewState>> {
        Ok(self.read_states(card_id)?.get(learner).copied())
    }

    // ==================== Review Operations ====================

    /// Submit a review. The learner's previous state is replaced by the result.
    pub fn submit_review(
        &self,
        card_id: Uuid,
        learner: &str,
        rating: i64,
        now: DateTime<Utc>,
    ) -> Result<ReviewState> {
        let rating = Rating::try_from(rating)?;
        // Reviews only exist for known cards
        self.get_card(card_id)?;

        let mut states = self.read_states(card_id)?;
        let next = calculate_next_review(states.get(learner), rating, now);
        states.insert(learner.to_string(), next);

        fs::create_dir_all(self.states_dir())?;
        fs::write(self.state_path(card_id), serde_json::to_string_pretty(&states)?)?;

        log::debug!(
            "Card {} rated {} by {}: interval {}d, ease {:.2}",
            card_id,
            rating.label(),
            learner,
            next.interval,
            next.ease_factor
        );
        Ok(next)
    }

    /// Cards due for a learner, oldest due first. Never-reviewed cards are due.
    pub fn get_due_cards(
        &self,
        learner: &str,
        deck_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Vec<CardWithState>> {
        let mut due_cards = Vec::new();

        for card in self.list_cards(deck_id)? {
            let state = self.get_review_state(card.id, learner)?;
            if state.map_or(true, |s| s.is_due(now)) {
                due_cards.push(CardWithState { card, state });
            }
        }

        // Stable sort keeps position order among equally due cards
        due_cards.sort_by_key(CardWithState::due_key);

        Ok(due_cards)
    }

    pub fn get_review_stats(
        &self,
        learner: &str,
        deck_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<ReviewStats> {
        let cards = self.list_cards(deck_id)?;
        let mut stats = ReviewStats {
            total_cards: cards.len(),
            ..Default::default()
        };

        for card in &cards {
            let state = self.get_review_state(card.id, learner)?;
            let phase = state.map_or(ReviewPhase::New, |s| s.phase());

            match phase {
                ReviewPhase::New => stats.new_cards += 1,
                ReviewPhase::Learning => stats.learning_cards += 1,
                ReviewPhase::Review => stats.review_cards += 1,
            }

            if state.map_or(true, |s| s.is_due(now)) {
                stats.due_cards += 1;
            }
        }

        Ok(stats)
    }
}
