use std::path::Path;

use anyhow::{Context, Result};

use revisa_lib::exam_stats::{read_artifact, summarize};

use crate::render::terminal::{heading, render_counts};
use crate::OutputFormat;

pub fn run(artifact: &Path, top: usize, format: &OutputFormat, use_color: bool) -> Result<()> {
    let records = read_artifact(artifact)
        .with_context(|| format!("Failed to read dataset {}", artifact.display()))?;
    let summary = summarize(&records, top);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} questions, average summary {:.0} characters",
                summary.total_questions, summary.average_summary_length
            );

            let sections = [
                ("By year", &summary.by_year),
                ("By area", &summary.by_area),
                ("By focus", &summary.by_focus),
                ("Top topics", &summary.top_topics),
            ];
            for (title, counts) in sections {
                println!();
                println!("{}", heading(title, use_color));
                for line in render_counts(counts, use_color) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
