pub mod card;
pub mod deck;
pub mod ingest;
pub mod stats;
