//! In-memory spreadsheet model and workbook loading

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use super::errors::{IngestError, IngestResult};

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: &str) -> Self {
        Cell::Text(value.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text cell whose trimmed content is non-empty
    pub fn as_trimmed_text(&self) -> Option<&str> {
        self.as_text().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Leading integer of the cell, the way a lenient `parseInt` reads it:
    /// numbers are truncated, text must start (after whitespace) with digits.
    pub fn leading_integer(&self) -> Option<i64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Cell::Number(_) | Cell::Empty => None,
            Cell::Text(s) => {
                let s = s.trim_start();
                let (sign, digits) = match s.strip_prefix('-') {
                    Some(rest) => (-1, rest),
                    None => (1, s.strip_prefix('+').unwrap_or(s)),
                };
                let end = digits
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(digits.len());
                digits[..end].parse::<i64>().ok().map(|n| sign * n)
            }
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

/// Row-major cells of one spreadsheet tab
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build a sheet from a calamine range. Leading empty columns that
    /// calamine trims are restored so column indices match the sheet.
    pub fn from_range(name: &str, range: &Range<Data>) -> Self {
        let col_offset = range.start().map_or(0, |(_, col)| col as usize);

        let rows = range
            .rows()
            .map(|row| {
                std::iter::repeat(Cell::Empty)
                    .take(col_offset)
                    .chain(row.iter().map(Cell::from))
                    .collect()
            })
            .collect();

        Self::new(name, rows)
    }
}

/// Cell at `col`, or `Empty` past the end of a short row
pub fn cell_at(row: &[Cell], col: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

pub fn is_empty_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty)
}

/// Sheets loaded from one spreadsheet file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<RawSheet>,
    /// Names of sheets that could not be parsed, skipped
    pub unreadable_sheets: Vec<String>,
}

/// Keep every sheet that parsed, in workbook order, and note the ones that did not
fn collect_sheets<I, E>(path: &Path, ranges: I) -> Workbook
where
    I: IntoIterator<Item = (String, Result<Range<Data>, E>)>,
    E: std::fmt::Display,
{
    let mut workbook = Workbook::default();
    for (name, range) in ranges {
        match range {
            Ok(range) => workbook.sheets.push(RawSheet::from_range(&name, &range)),
            Err(e) => {
                log::warn!(
                    "Skipping unreadable sheet '{}' in {}: {}",
                    name,
                    path.display(),
                    e
                );
                workbook.unreadable_sheets.push(name);
            }
        }
    }
    workbook
}

/// Load every sheet of a spreadsheet file (xlsx, xlsm, xls, ods), in workbook order.
///
/// Only a file that cannot be opened at all is an error; a corrupt sheet is
/// skipped and listed in [`Workbook::unreadable_sheets`].
pub fn load_workbook(path: &Path) -> IngestResult<Workbook> {
    let mut reader = open_workbook_auto(path).map_err(|e| IngestError::SourceUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let sheet_names = reader.sheet_names().to_vec();

    let ranges = sheet_names.into_iter().map(|name| {
        let range = reader.worksheet_range(&name);
        (name, range)
    });
    let workbook = collect_sheets(path, ranges);

    log::debug!(
        "Loaded {} sheets from {} ({} unreadable)",
        workbook.sheets.len(),
        path.display(),
        workbook.unreadable_sheets.len()
    );
    Ok(workbook)
}
