use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use revisa_lib::flashcards::{Deck, Flashcard, FlashcardStorage};

/// Shared application state for flashcard commands
pub struct App {
    pub storage: FlashcardStorage,
}

impl App {
    /// Initialize from `data_dir`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FlashcardStorage::default_data_dir()
                .context("Failed to get data directory")?,
        };

        let storage = FlashcardStorage::new(data_dir);
        storage.init().context("Failed to initialize flashcard storage")?;

        Ok(Self { storage })
    }

    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        self.storage.list_decks().context("Failed to list decks")
    }

    /// Find a deck by id or name (case-insensitive, exact match first, then prefix)
    pub fn find_deck(&self, query: &str) -> Result<Deck> {
        let decks = self.list_decks()?;

        if let Ok(id) = Uuid::parse_str(query) {
            if let Some(deck) = decks.iter().find(|d| d.id == id) {
                return Ok(deck.clone());
            }
        }

        let query_lower = query.to_lowercase();
        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == query_lower) {
            return Ok(deck.clone());
        }

        let matches: Vec<&Deck> = decks
            .iter()
            .filter(|d| d.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No deck matching '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous deck name '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|d| format!("  - {}", d.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Find a card by full id or unique id prefix
    pub fn find_card(&self, query: &str) -> Result<Flashcard> {
        if let Ok(id) = Uuid::parse_str(query) {
            return self.storage.get_card(id).context("Failed to get card");
        }

        let cards = self.storage.list_cards(None).context("Failed to list cards")?;
        let matches: Vec<&Flashcard> = cards
            .iter()
            .filter(|c| c.id.to_string().starts_with(query))
            .collect();

        match matches.len() {
            0 => bail!("No card with id starting with '{}'", query),
            1 => Ok(matches[0].clone()),
            n => bail!("Ambiguous card id '{}' ({} matches)", query, n),
        }
    }
}
