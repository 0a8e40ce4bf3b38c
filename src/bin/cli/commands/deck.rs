use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{rule, truncate};
use crate::OutputFormat;

pub fn run_create(
    app: &App,
    name: &str,
    description: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app
        .storage
        .create_deck(name.to_string(), description)
        .context("Failed to create deck")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => {
            println!("Created deck \"{}\"", deck.name);
            println!("  ID: {}", deck.id);
        }
    }

    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = app.list_decks()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decks)?),
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks.");
                return Ok(());
            }

            let name_width = decks
                .iter()
                .map(|d| d.name.chars().count())
                .max()
                .unwrap_or(4)
                .clamp(4, 40);

            println!("{:<nw$} {:>5}  {}", "Name", "Cards", "ID", nw = name_width);
            println!("{} {}  {}", rule(name_width), rule(5), rule(36));
            for deck in &decks {
                println!(
                    "{:<nw$} {:>5}  {}",
                    truncate(&deck.name, name_width),
                    deck.card_count,
                    deck.id,
                    nw = name_width
                );
            }
        }
    }

    Ok(())
}
