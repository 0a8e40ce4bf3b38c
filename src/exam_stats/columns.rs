//! Column role detection
//!
//! The exam spreadsheets have no fixed schema for the focus and summary
//! columns, so each role is resolved by an ordered list of strategies. The
//! first strategy that finds a column wins; within one strategy the last
//! matching cell in row-major scan order wins.

use serde::Serialize;

use super::sheet::Cell;
use crate::config::IngestConfig;

/// One way of locating a column in the top rows of a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnStrategy {
    /// A cell whose trimmed text is fully bracket-delimited, e.g. "[Tratamento]"
    BracketTag { scan_rows: usize },
    /// A short cell containing one of the keywords
    Keyword {
        scan_rows: usize,
        min_column: usize,
        max_len: usize,
        keywords: Vec<String>,
    },
    /// A long text cell to the right of `after_column`
    LongText {
        scan_rows: usize,
        after_column: usize,
        min_len: usize,
        exclude: String,
    },
    Fixed(usize),
}

impl ColumnStrategy {
    /// Column index found by this strategy, if any
    pub fn detect(&self, rows: &[Vec<Cell>]) -> Option<usize> {
        match self {
            ColumnStrategy::BracketTag { scan_rows } => last_match(rows, *scan_rows, |_, text| {
                let text = text.trim();
                text.len() >= 2 && text.starts_with('[') && text.ends_with(']')
            }),
            ColumnStrategy::Keyword {
                scan_rows,
                min_column,
                max_len,
                keywords,
            } => last_match(rows, *scan_rows, |col, text| {
                if col < *min_column || text.chars().count() >= *max_len {
                    return false;
                }
                let lower = text.to_lowercase();
                keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
            }),
            ColumnStrategy::LongText {
                scan_rows,
                after_column,
                min_len,
                exclude,
            } => last_match(rows, *scan_rows, |col, text| {
                col > *after_column
                    && text.chars().count() > *min_len
                    && !text.to_uppercase().contains(&exclude.to_uppercase())
            }),
            ColumnStrategy::Fixed(col) => Some(*col),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnStrategy::BracketTag { .. } => "bracket-tag",
            ColumnStrategy::Keyword { .. } => "keyword",
            ColumnStrategy::LongText { .. } => "long-text",
            ColumnStrategy::Fixed(_) => "fixed",
        }
    }
}

/// Last text cell in the first `scan_rows` rows accepted by `accept(col, text)`
fn last_match<F>(rows: &[Vec<Cell>], scan_rows: usize, accept: F) -> Option<usize>
where
    F: Fn(usize, &str) -> bool,
{
    let mut found = None;
    for row in rows.iter().take(scan_rows) {
        for (col, cell) in row.iter().enumerate() {
            if let Some(text) = cell.as_text() {
                if accept(col, text) {
                    found = Some(col);
                }
            }
        }
    }
    found
}

/// Column index from the first strategy that finds one, with the strategy used
pub fn resolve<'a>(
    strategies: &'a [ColumnStrategy],
    rows: &[Vec<Cell>],
) -> Option<(usize, &'a ColumnStrategy)> {
    strategies
        .iter()
        .find_map(|strategy| strategy.detect(rows).map(|col| (col, strategy)))
}

/// Resolved column roles of one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRoleAssignment {
    pub focus_column: usize,
    pub summary_column: usize,
}

pub fn focus_strategies(config: &IngestConfig) -> Vec<ColumnStrategy> {
    vec![
        ColumnStrategy::BracketTag {
            scan_rows: config.focus_scan_rows,
        },
        ColumnStrategy::Keyword {
            scan_rows: config.keyword_scan_rows,
            min_column: config.keyword_min_column,
            max_len: config.keyword_max_len,
            keywords: config.focus_keywords.clone(),
        },
        ColumnStrategy::Fixed(config.default_focus_column),
    ]
}

pub fn summary_strategies(config: &IngestConfig, focus_column: usize) -> Vec<ColumnStrategy> {
    vec![
        ColumnStrategy::LongText {
            scan_rows: config.summary_scan_rows,
            after_column: focus_column,
            min_len: config.summary_min_len,
            exclude: config.summary_exclusion_marker.clone(),
        },
        ColumnStrategy::Fixed(config.default_summary_column),
    ]
}

/// Detect the focus column, then the summary column to its right
pub fn detect_columns(rows: &[Vec<Cell>], config: &IngestConfig) -> ColumnRoleAssignment {
    let focus = focus_strategies(config);
    let (focus_column, focus_by) =
        resolve(&focus, rows).unwrap_or((config.default_focus_column, &focus[focus.len() - 1]));

    let summary = summary_strategies(config, focus_column);
    let (summary_column, summary_by) = resolve(&summary, rows)
        .unwrap_or((config.default_summary_column, &summary[summary.len() - 1]));

    log::debug!(
        "Columns: focus={} ({}), summary={} ({})",
        focus_column,
        focus_by.name(),
        summary_column,
        summary_by.name()
    );

    ColumnRoleAssignment {
        focus_column,
        summary_column,
    }
}
