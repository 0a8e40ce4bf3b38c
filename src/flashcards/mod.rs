//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - Deck management (one collection per studied subject)
//! - Flashcard CRUD
//! - SM-2 variant review scheduler
//! - Per-learner review state tracking

pub mod algorithm;
pub mod models;
pub mod storage;

pub use algorithm::{calculate_next_review, next_review_state, SchedulerError};
pub use models::*;
pub use storage::{FlashcardStorage, FlashcardStorageError};
