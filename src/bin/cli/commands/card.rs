use anyhow::{Context, Result};
use chrono::Utc;

use revisa_lib::flashcards::algorithm::{format_interval, preview_intervals};
use revisa_lib::flashcards::{Rating, ReviewState};

use crate::app::App;
use crate::render::terminal::{heading, paint, rule, truncate, Color};
use crate::OutputFormat;

pub fn run_add(
    app: &App,
    deck: &str,
    front: &str,
    back: &str,
    tags: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck)?;
    let tag_list = tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    let card = app
        .storage
        .create_card(deck.id, front.to_string(), back.to_string(), tag_list)
        .context("Failed to create card")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!("Added card to \"{}\"", deck.name);
            println!("  ID: {}", card.id);
        }
    }

    Ok(())
}

/// "again 1d  hard 15d  good 15d  easy 15d"
fn preview_line(state: Option<&ReviewState>) -> String {
    Rating::ALL
        .iter()
        .zip(preview_intervals(state))
        .map(|(rating, days)| format!("{} {}", rating.label(), format_interval(days)))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn run_due(
    app: &App,
    learner: &str,
    deck: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let deck_id = match deck {
        Some(query) => Some(app.find_deck(query)?.id),
        None => None,
    };

    let due = app
        .storage
        .get_due_cards(learner, deck_id, Utc::now())
        .context("Failed to list due cards")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&due)?),
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due for {}.", learner);
                return Ok(());
            }

            for item in &due {
                let id = item.card.id.to_string();
                let short_id = &id[..8];
                let status = if item.state.is_none() {
                    paint("new", Color::YELLOW, use_color)
                } else {
                    paint("due", Color::RED, use_color)
                };
                println!(
                    "{} [{}] {}",
                    paint(short_id, Color::DIM, use_color),
                    status,
                    truncate(&item.card.front, 70)
                );
                println!(
                    "    {}",
                    paint(&preview_line(item.state.as_ref()), Color::DIM, use_color)
                );
            }

            println!("\n{} cards due", due.len());
        }
    }

    Ok(())
}

pub fn run_rate(
    app: &App,
    card: &str,
    rating: i64,
    learner: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let card = app.find_card(card)?;
    let state = app
        .storage
        .submit_review(card.id, learner, rating, Utc::now())
        .context("Failed to submit review")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
        OutputFormat::Plain => {
            let due = state
                .due_date()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!(
                "{} next review in {} ({})",
                paint("\u{2713}", Color::GREEN, use_color),
                format_interval(state.interval),
                due
            );
            println!(
                "  repetitions {}, ease {:.2}",
                state.repetitions, state.ease_factor
            );
        }
    }

    Ok(())
}

pub fn run_stats(
    app: &App,
    learner: &str,
    deck: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let deck_id = match deck {
        Some(query) => Some(app.find_deck(query)?.id),
        None => None,
    };

    let stats = app
        .storage
        .get_review_stats(learner, deck_id, Utc::now())
        .context("Failed to compute review stats")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("{}", heading(&format!("Review stats for {}", learner), use_color));
            println!("{}", rule(24));
            println!("{:<16}{:>8}", "Total", stats.total_cards);
            println!("{:<16}{:>8}", "New", stats.new_cards);
            println!("{:<16}{:>8}", "Learning", stats.learning_cards);
            println!("{:<16}{:>8}", "Review", stats.review_cards);
            println!("{:<16}{:>8}", "Due now", stats.due_cards);
        }
    }

    Ok(())
}
