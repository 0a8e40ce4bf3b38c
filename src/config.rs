//! Ingestion configuration
//!
//! Every field has a default, so an empty (or absent) TOML file yields the
//! standard behavior for the exam statistics spreadsheet.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// What to do with the combined "Pediatria / Psiquiatria" area label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PediatricsPsychiatryRule {
    /// Map to "Pediatria". Lossy: the psychiatry signal is dropped.
    #[default]
    CollapseToPediatrics,
    /// Keep the combined label as its own area
    KeepCombined,
}

/// Configuration for the exam statistics ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Year used when neither the sheet name nor a row announces one
    pub default_year: u16,
    /// Sheets whose lowercased name contains one of these hold only charts
    pub chart_sheet_markers: Vec<String>,
    /// Named-exam marker announcing a section header with a year ("AMRIGS 2019")
    pub exam_marker: String,
    /// Marker of column-header rows
    pub header_marker: String,
    /// Long cells containing this marker are never the summary column
    pub summary_exclusion_marker: String,

    pub area_column: usize,
    pub specialty_column: usize,
    pub topic_column: usize,

    pub focus_scan_rows: usize,
    pub keyword_scan_rows: usize,
    pub summary_scan_rows: usize,
    /// Keyword matches are only accepted at this column index or later
    pub keyword_min_column: usize,
    /// Keyword matches must be shorter than this many characters
    pub keyword_max_len: usize,
    /// Summary cells must be longer than this many characters
    pub summary_min_len: usize,
    pub default_focus_column: usize,
    pub default_summary_column: usize,
    pub focus_keywords: Vec<String>,

    pub pediatrics_psychiatry: PediatricsPsychiatryRule,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_year: 2024,
            chart_sheet_markers: vec![
                "gráfico".to_string(),
                "grafico".to_string(),
                "chart".to_string(),
            ],
            exam_marker: "AMRIGS".to_string(),
            header_marker: "QUESTÃO".to_string(),
            summary_exclusion_marker: "QUESTÃO".to_string(),
            area_column: 1,
            specialty_column: 2,
            topic_column: 3,
            focus_scan_rows: 20,
            keyword_scan_rows: 25,
            summary_scan_rows: 25,
            keyword_min_column: 4,
            keyword_max_len: 50,
            summary_min_len: 50,
            default_focus_column: 6,
            default_summary_column: 7,
            focus_keywords: [
                "Diagnóstico",
                "Diagnostico",
                "Tratamento",
                "Conduta",
                "Quadro clínico",
                "Quadro clinico",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            pediatrics_psychiatry: PediatricsPsychiatryRule::default(),
        }
    }
}

impl IngestConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading ingest config from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn is_chart_sheet(&self, sheet_name: &str) -> bool {
        let name = sheet_name.to_lowercase();
        self.chart_sheet_markers
            .iter()
            .any(|marker| name.contains(&marker.to_lowercase()))
    }
}
