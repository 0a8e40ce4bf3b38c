//! Exam statistics ingestion
//!
//! Reads the spreadsheet of past exam questions, detects the semantic
//! columns of each sheet, normalizes labels and produces the flat record
//! array consumed by the analytics dashboard.

pub mod artifact;
pub mod columns;
mod errors;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod sheet;
pub mod summary;

pub use artifact::{read_artifact, write_artifact};
pub use errors::{IngestError, IngestResult};
pub use models::*;
pub use pipeline::{ingest, run, IngestOutput};
pub use sheet::{load_workbook, Cell, RawSheet, Workbook};
pub use summary::{summarize, DatasetSummary};
