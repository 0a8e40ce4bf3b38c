pub mod config;
pub mod exam_stats;
pub mod flashcards;
