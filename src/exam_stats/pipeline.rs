//! Exam statistics ingestion
//!
//! Turns the raw workbook into a flat list of [`ExamQuestionRecord`]s. Each
//! sheet is processed as a fold over its rows carrying the running year and
//! the records emitted so far. Rows that cannot be interpreted are skipped,
//! never reported as errors.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::artifact::write_artifact;
use super::columns::{detect_columns, ColumnRoleAssignment};
use super::models::{ExamQuestionRecord, IngestReport, SkipReason};
use super::normalize::{clean_focus, normalize_area, or_sentinel, Sentinel};
use super::errors::IngestResult;
use super::sheet::{cell_at, is_empty_row, load_workbook, Cell, RawSheet};
use crate::config::IngestConfig;

/// Plausible exam years: 2000-2029
fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"20[0-2][0-9]").unwrap())
}

fn bare_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^20[0-2][0-9]$").unwrap())
}

/// First plausible exam year inside `text`
pub fn find_year(text: &str) -> Option<u16> {
    year_regex()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// A cell holding nothing but a plausible exam year
fn bare_year(cell: &Cell) -> Option<u16> {
    match cell {
        Cell::Number(n) if n.fract() == 0.0 && (2000.0..=2029.0).contains(n) => Some(*n as u16),
        Cell::Text(s) if bare_year_regex().is_match(s.trim()) => s.trim().parse().ok(),
        _ => None,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_uppercase().contains(&needle.to_uppercase())
}

/// What a single row contributes to the sheet scan
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Record(ExamQuestionRecord),
    /// Section header announcing the year of the following rows
    SetYear(u16),
    Skipped(SkipReason),
}

/// Per-sheet settings shared by every row
#[derive(Debug, Clone, Copy)]
pub struct SheetContext<'a> {
    pub config: &'a IngestConfig,
    pub columns: ColumnRoleAssignment,
}

/// Interpret one row given the running year
pub fn classify_row(row: &[Cell], year: u16, ctx: &SheetContext<'_>) -> RowOutcome {
    if is_empty_row(row) {
        return RowOutcome::Skipped(SkipReason::EmptyRow);
    }

    let first = cell_at(row, 0);
    let id = first.leading_integer();
    let is_data_row = id.is_some() && cell_at(row, 1).as_text().is_some();

    let id = match id {
        Some(id) if is_data_row => id,
        _ => return classify_non_data_row(first, ctx.config),
    };

    let config = ctx.config;
    let area = match cell_at(row, config.area_column)
        .as_text()
        .and_then(|raw| normalize_area(raw, config.pediatrics_psychiatry))
    {
        Some(area) => area,
        None => return RowOutcome::Skipped(SkipReason::EmptyArea),
    };

    let specialty = or_sentinel(
        cell_at(row, config.specialty_column).as_text(),
        Sentinel::Specialty,
    );
    let topic = or_sentinel(cell_at(row, config.topic_column).as_text(), Sentinel::Topic);

    let focus = cell_at(row, ctx.columns.focus_column)
        .as_text()
        .map(clean_focus)
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| Sentinel::Focus.value().to_string());

    let summary = cell_at(row, ctx.columns.summary_column)
        .as_text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    RowOutcome::Record(ExamQuestionRecord::new(
        year, id, area, specialty, topic, focus, summary,
    ))
}

fn classify_non_data_row(first: &Cell, config: &IngestConfig) -> RowOutcome {
    if let Some(text) = first.as_text() {
        if contains_ignore_case(text, &config.exam_marker) {
            return match find_year(text) {
                Some(year) => RowOutcome::SetYear(year),
                None => RowOutcome::Skipped(SkipReason::ExamHeader),
            };
        }
        if contains_ignore_case(text, &config.header_marker) {
            return RowOutcome::Skipped(SkipReason::ColumnHeader);
        }
    }

    match bare_year(first) {
        Some(year) => RowOutcome::SetYear(year),
        None => RowOutcome::Skipped(SkipReason::NotDataRow),
    }
}

/// Accumulator of the fold over a sheet's rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetScan {
    pub year: u16,
    pub records: Vec<ExamQuestionRecord>,
    pub skipped: usize,
    pub year_headers: usize,
}

impl SheetScan {
    pub fn new(year: u16) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    /// Pure transition: the scan state after reading `row`
    pub fn step(mut self, row: &[Cell], ctx: &SheetContext<'_>) -> Self {
        match classify_row(row, self.year, ctx) {
            RowOutcome::Record(record) => self.records.push(record),
            RowOutcome::SetYear(year) => {
                self.year = year;
                self.year_headers += 1;
                self.skipped += 1;
            }
            RowOutcome::Skipped(reason) => {
                log::debug!("Row skipped: {:?}", reason);
                self.skipped += 1;
            }
        }
        self
    }
}

/// Scan one data sheet. The starting year comes from the sheet name or the default.
pub fn scan_sheet(sheet: &RawSheet, config: &IngestConfig) -> SheetScan {
    let year = find_year(&sheet.name).unwrap_or(config.default_year);
    let ctx = SheetContext {
        config,
        columns: detect_columns(&sheet.rows, config),
    };

    sheet
        .rows
        .iter()
        .fold(SheetScan::new(year), |scan, row| scan.step(row, &ctx))
}

/// Records and report of a full ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestOutput {
    pub records: Vec<ExamQuestionRecord>,
    pub report: IngestReport,
}

/// Ingest every sheet of a workbook, in sheet order then row order
pub fn ingest(workbook: &[RawSheet], config: &IngestConfig) -> IngestOutput {
    let mut output = IngestOutput::default();

    for sheet in workbook {
        if config.is_chart_sheet(&sheet.name) {
            log::debug!("Skipping chart sheet '{}'", sheet.name);
            output.report.sheets_excluded += 1;
            continue;
        }

        let scan = scan_sheet(sheet, config);
        log::info!(
            "Sheet '{}': {} records, {} rows skipped",
            sheet.name,
            scan.records.len(),
            scan.skipped
        );

        output.report.sheets_read += 1;
        output.report.rows_skipped += scan.skipped;
        output.report.year_headers += scan.year_headers;
        output.records.extend(scan.records);
    }

    output.report.records_emitted = output.records.len();
    output
}

/// Load `source`, ingest it and write the dataset artifact to `output`.
///
/// The artifact is only written once the workbook has been opened and
/// ingested, so an unreadable source leaves any existing `output` untouched.
pub fn run(source: &Path, output: &Path, config: &IngestConfig) -> IngestResult<IngestOutput> {
    let workbook = load_workbook(source)?;

    let mut result = ingest(&workbook.sheets, config);
    result.report.sheets_unreadable = workbook.unreadable_sheets.len();

    write_artifact(output, &result.records)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PediatricsPsychiatryRule;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    Cell::Empty
                } else if let Ok(n) = c.parse::<f64>() {
                    Cell::Number(n)
                } else {
                    Cell::text(c)
                }
            })
            .collect()
    }

    fn question(id: &str, area: &str, focus: &str, summary: &str) -> Vec<Cell> {
        row(&[id, area, "Cardiologia", "Síndrome coronariana", "", "", focus, summary])
    }

    fn ctx(config: &IngestConfig) -> SheetContext<'_> {
        SheetContext {
            config,
            columns: ColumnRoleAssignment {
                focus_column: 6,
                summary_column: 7,
            },
        }
    }

    #[test]
    fn test_find_year() {
        assert_eq!(find_year("AMRIGS 2019 PROVA"), Some(2019));
        assert_eq!(find_year("Prova2023"), Some(2023));
        assert_eq!(find_year("1999"), None);
        assert_eq!(find_year("2035"), None);
        assert_eq!(find_year("Planilha"), None);
    }

    #[test]
    fn test_data_row_record() {
        let config = IngestConfig::default();
        let outcome = classify_row(
            &question("12", "Clinica Medica", "[Conduta]", "Resumo da questão"),
            2020,
            &ctx(&config),
        );

        let RowOutcome::Record(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.year, 2020);
        assert_eq!(record.id, 12);
        assert_eq!(record.area, "Clínica Médica");
        assert_eq!(record.specialty, "Cardiologia");
        assert_eq!(record.focus, "Conduta");
        assert_eq!(record.summary, "Resumo da questão");
        assert_eq!(record.summary_length, record.summary.chars().count());
    }

    #[test]
    fn test_sentinels() {
        let config = IngestConfig::default();
        let outcome = classify_row(&row(&["3", "Cirurgia"]), 2020, &ctx(&config));

        let RowOutcome::Record(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.specialty, "Geral");
        assert_eq!(record.topic, "Outros");
        assert_eq!(record.focus, "Indefinido");
        assert_eq!(record.summary, "");
        assert_eq!(record.summary_length, 0);
    }

    #[test]
    fn test_empty_area_dropped() {
        let config = IngestConfig::default();
        let outcome = classify_row(&row(&["4", "   ", "Trauma"]), 2020, &ctx(&config));
        assert_eq!(outcome, RowOutcome::Skipped(SkipReason::EmptyArea));
    }

    #[test]
    fn test_non_data_rows() {
        let config = IngestConfig::default();
        let ctx = ctx(&config);

        assert_eq!(
            classify_row(&row(&["AMRIGS 2019 PROVA"]), 2024, &ctx),
            RowOutcome::SetYear(2019)
        );
        assert_eq!(
            classify_row(&row(&["Prova AMRIGS"]), 2024, &ctx),
            RowOutcome::Skipped(SkipReason::ExamHeader)
        );
        assert_eq!(
            classify_row(&row(&["QUESTÃO", "ÁREA"]), 2024, &ctx),
            RowOutcome::Skipped(SkipReason::ColumnHeader)
        );
        assert_eq!(classify_row(&row(&["2018"]), 2024, &ctx), RowOutcome::SetYear(2018));
        assert_eq!(
            classify_row(&row(&["Estatísticas gerais"]), 2024, &ctx),
            RowOutcome::Skipped(SkipReason::NotDataRow)
        );
        // An id without a text second cell is not a data row
        assert_eq!(
            classify_row(&row(&["7", "8"]), 2024, &ctx),
            RowOutcome::Skipped(SkipReason::NotDataRow)
        );
        assert_eq!(
            classify_row(&[Cell::Empty, Cell::Empty], 2024, &ctx),
            RowOutcome::Skipped(SkipReason::EmptyRow)
        );
    }

    #[test]
    fn test_step_updates_year() {
        let config = IngestConfig::default();
        let ctx = ctx(&config);

        let scan = SheetScan::new(2024)
            .step(&question("1", "Cirurgia", "", ""), &ctx)
            .step(&row(&["AMRIGS 2019 PROVA"]), &ctx)
            .step(&question("2", "Cirurgia", "", ""), &ctx);

        assert_eq!(scan.year, 2019);
        assert_eq!(scan.year_headers, 1);
        assert_eq!(scan.skipped, 1);
        assert_eq!(scan.records[0].year, 2024);
        assert_eq!(scan.records[1].year, 2019);
    }

    #[test]
    fn test_sheet_without_year_uses_default() {
        let config = IngestConfig {
            default_year: 2022,
            ..Default::default()
        };
        let sheet = RawSheet::new(
            "Planilha",
            vec![
                question("1", "Cirurgia", "", ""),
                question("2", "Pediatria", "", ""),
            ],
        );

        let output = ingest(&[sheet], &config);
        assert_eq!(output.records.len(), 2);
        assert!(output.records.iter().all(|r| r.year == 2022));
    }

    #[test]
    fn test_sheet_name_year() {
        let config = IngestConfig::default();
        let sheet = RawSheet::new("Prova 2021", vec![question("1", "Cirurgia", "", "")]);
        let output = ingest(&[sheet], &config);
        assert_eq!(output.records[0].year, 2021);
    }

    #[test]
    fn test_exam_header_inherited_by_following_rows() {
        let config = IngestConfig::default();
        let sheet = RawSheet::new(
            "Dados",
            vec![
                row(&["AMRIGS 2019 PROVA"]),
                question("1", "Cirurgia", "", ""),
                question("2", "Cirurgia", "", ""),
            ],
        );

        let output = ingest(&[sheet], &config);
        assert_eq!(output.records.len(), 2);
        assert!(output.records.iter().all(|r| r.year == 2019));
        assert_eq!(output.report.year_headers, 1);
    }

    #[test]
    fn test_bracket_focus_column_detected() {
        let config = IngestConfig::default();
        let summary =
            "Gestante de 32 semanas com pressão arterial elevada e proteinúria significativa.";
        let sheet = RawSheet::new(
            "2023",
            vec![
                row(&["QUESTÃO", "ÁREA", "ESPECIALIDADE", "TEMA"]),
                row(&[
                    "1",
                    "Obstetrícia",
                    "Pré-natal",
                    "Pré-eclâmpsia",
                    "[Tratamento]",
                    summary,
                ]),
                row(&["2", "Clinica Medica", "Nefrologia", "", "[Conduta]", ""]),
            ],
        );

        let output = ingest(&[sheet], &config);
        assert_eq!(output.records.len(), 2);
        assert_eq!(output.records[0].focus, "Tratamento");
        assert_eq!(output.records[0].summary, summary);
        assert_eq!(output.records[0].area, "Ginecologia e Obstetrícia");
        assert_eq!(output.records[1].focus, "Conduta");
        assert_eq!(output.records[1].area, "Clínica Médica");
        assert_eq!(output.records[1].topic, "Outros");
    }

    #[test]
    fn test_chart_sheets_excluded() {
        let config = IngestConfig::default();
        let workbook = vec![
            RawSheet::new("Gráficos", vec![question("1", "Cirurgia", "", "")]),
            RawSheet::new("2020", vec![question("1", "Cirurgia", "", "")]),
        ];

        let output = ingest(&workbook, &config);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.report.sheets_excluded, 1);
        assert_eq!(output.report.sheets_read, 1);
    }

    #[test]
    fn test_order_follows_sheets_then_rows() {
        let config = IngestConfig::default();
        let workbook = vec![
            RawSheet::new(
                "2021",
                vec![
                    question("5", "Cirurgia", "", ""),
                    question("3", "Cirurgia", "", ""),
                ],
            ),
            RawSheet::new("2020", vec![question("1", "Cirurgia", "", "")]),
        ];

        let output = ingest(&workbook, &config);
        let keys: Vec<(u16, i64)> = output.records.iter().map(|r| (r.year, r.id)).collect();
        assert_eq!(keys, vec![(2021, 5), (2021, 3), (2020, 1)]);
    }

    #[test]
    fn test_pediatrics_rule_from_config() {
        let config = IngestConfig {
            pediatrics_psychiatry: PediatricsPsychiatryRule::KeepCombined,
            ..Default::default()
        };
        let sheet = RawSheet::new("2020", vec![question("1", "Pediatria / Psiquiatria", "", "")]);
        let output = ingest(&[sheet], &config);
        assert_eq!(output.records[0].area, "Pediatria / Psiquiatria");
    }

    #[test]
    fn test_invariants_hold() {
        let config = IngestConfig::default();
        let sheet = RawSheet::new(
            "2020",
            vec![
                row(&["Título"]),
                question("1", "", "", ""),
                question(
                    "2",
                    "Cirurgia",
                    "[Diagnóstico]",
                    "Paciente com dor abdominal em fossa ilíaca direita há 12 horas.",
                ),
                row(&["x", "Cirurgia"]),
                question("3", "Preventiva", "", "Curto"),
            ],
        );

        let output = ingest(&[sheet], &config);
        assert_eq!(output.records.len(), 2);
        assert_eq!(output.report.rows_skipped, 3);
        for record in &output.records {
            assert!(!record.area.is_empty());
            assert_eq!(record.summary_length, record.summary.chars().count());
        }
    }

    #[test]
    fn test_run_unreadable_source_keeps_existing_artifact() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("questoes.xlsx");
        let output = dir.path().join("exam_stats.json");
        std::fs::write(&source, b"not a spreadsheet").unwrap();
        std::fs::write(&output, "[]\n").unwrap();

        let result = run(&source, &output, &IngestConfig::default());
        assert!(matches!(
            result,
            Err(crate::exam_stats::IngestError::SourceUnreadable { .. })
        ));
        assert_eq!(std::fs::read(&output).unwrap(), b"[]\n");
    }

    #[test]
    fn test_run_missing_source_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("exam_stats.json");

        let result = run(
            &dir.path().join("missing.xlsx"),
            &output,
            &IngestConfig::default(),
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
