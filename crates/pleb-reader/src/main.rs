//! Pleb Reader - render notes, threads, and articles from a JSONL note store.
//!
//! Pages are written to stdout as static HTML; logs go to stderr.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pleb_reader::{Config, Reader, format, segment};

/// Pleb Reader - static HTML pages for Nostr notes.
#[derive(Parser, Debug)]
#[command(name = "pleb-reader")]
#[command(about = "Render Nostr notes, threads, and articles as HTML", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the thread focused on a note.
    Thread { id: String },
    /// Render a note as a long-form article.
    Article { id: String },
    /// Render every note in the feed.
    Feed,
    /// Reply to a note and render its thread.
    Reply { id: String, text: String },
    /// Print the segments of a piece of note text as JSON.
    Segments { text: String },
    /// Print the rich-text formatting of a piece of note text.
    Format { text: String },
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let page = match args.command {
        Command::Segments { text } => {
            println!("{}", serde_json::to_string_pretty(&segment(&text))?);
            return Ok(());
        }
        Command::Format { text } => {
            println!("{}", format(&text));
            return Ok(());
        }
        Command::Thread { id } => {
            let mut reader = open_reader()?;
            reader.open_thread(&id);
            reader.render_thread()
        }
        Command::Article { id } => open_reader()?.render_article(&id)?,
        Command::Feed => open_reader()?.render_feed(),
        Command::Reply { id, text } => {
            let mut reader = open_reader()?;
            reader.open_thread(&id);
            reader.reply(&id, &text);
            reader.render_thread()
        }
    };

    println!("{}", page.into_string());
    Ok(())
}

/// Load configuration and the note store behind it.
fn open_reader() -> anyhow::Result<Reader> {
    let config = Config::from_env()?;
    let (source, stats) = pleb_core::load_jsonl(&config.store_path)?;
    tracing::info!(
        files = stats.files_processed,
        notes = stats.valid_records,
        invalid = stats.invalid_records,
        "note store loaded"
    );
    Ok(Reader::new(source, &config))
}
