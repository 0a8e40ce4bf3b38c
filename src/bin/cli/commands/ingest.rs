use std::path::Path;

use anyhow::{Context, Result};

use revisa_lib::config::IngestConfig;
use revisa_lib::exam_stats;

use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    source: &Path,
    output: &Path,
    config_path: Option<&Path>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let config = IngestConfig::load_or_default(config_path)
        .context("Failed to load ingest config")?;

    let result = exam_stats::run(source, output, &config)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": source.to_string_lossy(),
                "output": output.to_string_lossy(),
                "report": result.report,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let report = &result.report;
            println!(
                "{} {} records written to {}",
                paint("\u{2713}", Color::GREEN, use_color),
                report.records_emitted,
                output.display()
            );
            println!(
                "{}",
                paint(
                    &format!(
                        "  {} sheets read, {} excluded, {} unreadable, {} rows skipped",
                        report.sheets_read,
                        report.sheets_excluded,
                        report.sheets_unreadable,
                        report.rows_skipped
                    ),
                    Color::DIM,
                    use_color
                )
            );
        }
    }

    Ok(())
}
