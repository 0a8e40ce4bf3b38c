//! Dataset artifact reading and writing
//!
//! The artifact is a pretty-printed JSON array of records. It is written to a
//! temporary file next to the target and renamed into place, so a failed run
//! never leaves a partial file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::errors::IngestResult;
use super::models::ExamQuestionRecord;

/// Serialize records to the artifact's exact byte format
pub fn to_artifact_string(records: &[ExamQuestionRecord]) -> IngestResult<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

/// Atomically write the dataset artifact to `path`
pub fn write_artifact(path: &Path, records: &[ExamQuestionRecord]) -> IngestResult<()> {
    let json = to_artifact_string(records)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn read_artifact(path: &Path) -> IngestResult<Vec<ExamQuestionRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;
    use crate::exam_stats::pipeline::ingest;
    use crate::exam_stats::sheet::{Cell, RawSheet};
    use tempfile::TempDir;

    fn sample_records() -> Vec<ExamQuestionRecord> {
        vec![
            ExamQuestionRecord::new(
                2019,
                1,
                "Cirurgia".into(),
                "Trauma".into(),
                "ATLS".into(),
                "Conduta".into(),
                "Vítima de colisão automobilística".into(),
            ),
            ExamQuestionRecord::new(
                2020,
                2,
                "Pediatria".into(),
                "Geral".into(),
                "Outros".into(),
                "Indefinido".into(),
                String::new(),
            ),
        ]
    }

    fn sample_workbook() -> Vec<RawSheet> {
        vec![RawSheet::new(
            "AMRIGS 2022",
            vec![
                vec![Cell::text("QUESTÃO"), Cell::text("ÁREA")],
                vec![
                    Cell::Number(1.0),
                    Cell::text("Clinica Medica"),
                    Cell::text("Pneumologia"),
                    Cell::text("Asma"),
                    Cell::text("[Tratamento]"),
                ],
            ],
        )]
    }

    #[test]
    fn test_write_and_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("exam_stats.json");

        write_artifact(&path, &sample_records()).unwrap();

        let loaded = read_artifact(&path).unwrap();
        assert_eq!(loaded, sample_records());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"summaryLength\": 33"));
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("exam_stats.json");

        write_artifact(&path, &sample_records()).unwrap();
        write_artifact(&path, &sample_records()[..1]).unwrap();

        assert_eq!(read_artifact(&path).unwrap().len(), 1);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_ingest_twice_is_byte_identical() {
        let config = IngestConfig::default();
        let workbook = sample_workbook();

        let first = to_artifact_string(&ingest(&workbook, &config).records).unwrap();
        let second = to_artifact_string(&ingest(&workbook, &config).records).unwrap();
        assert_eq!(first, second);

        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.json");
        let b = temp.path().join("b.json");
        write_artifact(&a, &ingest(&workbook, &config).records).unwrap();
        write_artifact(&b, &ingest(&workbook, &config).records).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_read_missing_artifact() {
        let temp = TempDir::new().unwrap();
        assert!(read_artifact(&temp.path().join("missing.json")).is_err());
    }
}
