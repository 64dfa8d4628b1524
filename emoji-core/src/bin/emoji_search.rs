//! Search the emoji catalog from the command line
//!
//! Run: cargo run --bin emoji-search -- heart
//!      cargo run --bin emoji-search -- --sections

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use emoji_core::skin_tones::SqliteSkinToneStore;
use emoji_core::{catalog, corpus, search, Localization, PickerConfiguration, SkinToneStore};

#[derive(Parser)]
#[command(name = "emoji-search")]
#[command(about = "Rank emoji for a query the way the picker does")]
struct Args {
    /// Query to search for
    query: Option<String>,

    /// Print the sections instead of searching
    #[arg(long)]
    sections: bool,

    /// Picker configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Localization JSON file
    #[arg(long)]
    localization: Option<PathBuf>,

    /// Emoji dataset JSON file (defaults to the bundled dataset)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Skin-tone database to apply persisted tones from
    #[arg(long)]
    store: Option<PathBuf>,

    /// Platform version used to hide emoji that cannot render
    #[arg(long, default_value = "26.0")]
    platform_version: String,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    let config = match &args.config {
        Some(path) => PickerConfiguration::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PickerConfiguration::default(),
    };
    let localization = match &args.localization {
        Some(path) => Localization::load(path)
            .with_context(|| format!("loading localization from {}", path.display()))?,
        None => Localization::default(),
    };

    let emoji = match &args.corpus {
        Some(path) => corpus::from_path(path),
        None => corpus::bundled(),
    };

    let persisted = match &args.store {
        Some(path) => SqliteSkinToneStore::open(path)
            .with_context(|| format!("opening skin-tone store {}", path.display()))?
            .get()?,
        None => HashMap::new(),
    };

    let sections = catalog::build_sections(
        &emoji,
        &config,
        &localization,
        &persisted,
        &args.platform_version,
    );

    if args.sections || args.query.is_none() {
        for section in &sections {
            println!("{} [{}] ({})", section.title, section.icon, section.emojis.len());
            let glyphs: Vec<&str> = section.emojis.iter().map(|e| e.emoji.as_str()).collect();
            println!("  {}", glyphs.join(" "));
        }
        return Ok(());
    }

    let query = args.query.unwrap_or_default();
    let results = search::search(&query, &sections);

    println!("{}", localization.search_results_header(results.len() as u64));
    for emoji in &results {
        println!("{}  {}", emoji.emoji, emoji.description);
    }

    Ok(())
}
