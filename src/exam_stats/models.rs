//! Data models for the exam statistics dataset

use serde::{Deserialize, Serialize};

/// One historical exam question, as stored in the dataset artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestionRecord {
    pub year: u16,
    /// Question number within its exam; not unique across years
    pub id: i64,
    /// Normalized macro-area, never empty
    pub area: String,
    pub specialty: String,
    pub topic: String,
    /// What the question tests ("Diagnóstico", "Tratamento", ...)
    pub focus: String,
    pub summary: String,
    /// Character count of `summary`
    pub summary_length: usize,
}

impl ExamQuestionRecord {
    pub fn new(
        year: u16,
        id: i64,
        area: String,
        specialty: String,
        topic: String,
        focus: String,
        summary: String,
    ) -> Self {
        let summary_length = summary.chars().count();
        Self {
            year,
            id,
            area,
            specialty,
            topic,
            focus,
            summary,
            summary_length,
        }
    }
}

/// Why a row produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    EmptyRow,
    /// Named-exam section header; only updates the running year
    ExamHeader,
    /// Bare year section header
    YearHeader,
    ColumnHeader,
    /// Title rows, notes, anything without an id and an area
    NotDataRow,
    EmptyArea,
}

/// Aggregate outcome of an ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub sheets_read: usize,
    pub sheets_excluded: usize,
    /// Sheets skipped because they could not be parsed
    pub sheets_unreadable: usize,
    pub records_emitted: usize,
    pub rows_skipped: usize,
    /// Rows that changed the running year
    pub year_headers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_length_counts_chars() {
        let record = ExamQuestionRecord::new(
            2023,
            1,
            "Cirurgia".into(),
            "Geral".into(),
            "Outros".into(),
            "Indefinido".into(),
            "Icterícia".into(),
        );
        assert_eq!(record.summary_length, 9);
    }

    #[test]
    fn test_json_field_names() {
        let record = ExamQuestionRecord::new(
            2019,
            12,
            "Pediatria".into(),
            "Neonatologia".into(),
            "Icterícia neonatal".into(),
            "Conduta".into(),
            String::new(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["summaryLength"], 0);
        assert_eq!(json["year"], 2019);
        assert_eq!(json["focus"], "Conduta");
    }
}
