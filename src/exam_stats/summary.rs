//! Aggregate counts over the exam statistics dataset

use std::collections::BTreeMap;

use serde::Serialize;

use super::models::ExamQuestionRecord;

/// A label and how many questions carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Dataset-wide distribution of questions
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub total_questions: usize,
    /// Ascending by year
    pub by_year: Vec<LabelCount>,
    pub by_area: Vec<LabelCount>,
    pub by_focus: Vec<LabelCount>,
    pub top_topics: Vec<LabelCount>,
    /// Mean summary length in characters
    pub average_summary_length: f64,
}

/// Count labels, ordered by count descending then label ascending
fn ranked<'a, I>(labels: I) -> Vec<LabelCount>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the alphabetical order among ties
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

pub fn summarize(records: &[ExamQuestionRecord], top_topics: usize) -> DatasetSummary {
    let mut by_year: BTreeMap<u16, usize> = BTreeMap::new();
    for record in records {
        *by_year.entry(record.year).or_default() += 1;
    }

    let mut topics = ranked(records.iter().map(|r| r.topic.as_str()));
    topics.truncate(top_topics);

    let total_length: usize = records.iter().map(|r| r.summary_length).sum();
    let average_summary_length = if records.is_empty() {
        0.0
    } else {
        total_length as f64 / records.len() as f64
    };

    DatasetSummary {
        total_questions: records.len(),
        by_year: by_year
            .into_iter()
            .map(|(year, count)| LabelCount {
                label: year.to_string(),
                count,
            })
            .collect(),
        by_area: ranked(records.iter().map(|r| r.area.as_str())),
        by_focus: ranked(records.iter().map(|r| r.focus.as_str())),
        top_topics: topics,
        average_summary_length,
    }
}
