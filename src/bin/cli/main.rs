mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "revisa-cli", about = "Exam statistics and flashcard review CLI", version)]
struct Cli {
    /// Flashcard data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Build the exam statistics dataset from a spreadsheet
    Ingest {
        /// Spreadsheet file (xlsx, xls, ods)
        source: PathBuf,
        /// Dataset JSON to write
        #[arg(long, short, default_value = "exam_stats.json")]
        output: PathBuf,
        /// TOML file overriding the ingestion heuristics
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Summarize a dataset built by `ingest`
    Stats {
        /// Dataset JSON
        artifact: PathBuf,
        /// Number of topics to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Deck management
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Flashcards and reviews
    #[command(subcommand)]
    Card(CardCommand),
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create a deck
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// List decks
    List,
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to a deck
    Add {
        /// Deck name (case-insensitive prefix match) or id
        deck: String,
        front: String,
        back: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List cards due for a learner
    Due {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        deck: Option<String>,
    },

    /// Rate a card: 0 again, 1 hard, 2 good, 3 easy
    Rate {
        /// Card id or unique id prefix
        card: String,
        #[arg(allow_negative_numbers = true)]
        rating: i64,
        #[arg(long)]
        learner: String,
    },

    /// Review statistics for a learner
    Stats {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        deck: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    match cli.command {
        Command::Ingest {
            source,
            output,
            config,
        } => {
            if let Err(err) =
                commands::ingest::run(&source, &output, config.as_deref(), &cli.format, use_color)
            {
                log::error!("Ingestion failed, no dataset written: {:#}", err);
                return Err(err);
            }
        }
        Command::Stats { artifact, top } => {
            commands::stats::run(&artifact, top, &cli.format, use_color)?;
        }
        Command::Deck(subcmd) => {
            let app = app::App::new(cli.data_dir)?;
            match subcmd {
                DeckCommand::Create { name, description } => {
                    commands::deck::run_create(&app, &name, description, &cli.format)?;
                }
                DeckCommand::List => {
                    commands::deck::run_list(&app, &cli.format)?;
                }
            }
        }
        Command::Card(subcmd) => {
            let app = app::App::new(cli.data_dir)?;
            match subcmd {
                CardCommand::Add {
                    deck,
                    front,
                    back,
                    tags,
                } => {
                    commands::card::run_add(
                        &app,
                        &deck,
                        &front,
                        &back,
                        tags.as_deref(),
                        &cli.format,
                    )?;
                }
                CardCommand::Due { learner, deck } => {
                    commands::card::run_due(
                        &app,
                        &learner,
                        deck.as_deref(),
                        &cli.format,
                        use_color,
                    )?;
                }
                CardCommand::Rate {
                    card,
                    rating,
                    learner,
                } => {
                    commands::card::run_rate(
                        &app,
                        &card,
                        rating,
                        &learner,
                        &cli.format,
                        use_color,
                    )?;
                }
                CardCommand::Stats { learner, deck } => {
                    commands::card::run_stats(
                        &app,
                        &learner,
                        deck.as_deref(),
                        &cli.format,
                        use_color,
                    )?;
                }
            }
        }
    }

    Ok(())
}
