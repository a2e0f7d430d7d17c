use cardz::api::{CardzApi, CmdMessage, ConfigAction, DisplayCard, DisplayDeck, MessageLevel};
use cardz::config::CardzConfig;
use cardz::error::{CardzError, Result};
use cardz::persist::AutoPersist;
use cardz::store::fs_backend::FsBackend;
use cardz::store::CollectionStore;
use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CARDZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;

    let config = CardzConfig::load(&data_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        CardzConfig::default()
    });

    let backend = Arc::new(FsBackend::new(data_dir.clone()));
    let store = Arc::new(CollectionStore::load(backend.as_ref()));
    let persist = AutoPersist::spawn(Arc::clone(&store), backend, config.autosave_window());
    let api = CardzApi::new(store, data_dir, &config);

    let outcome = dispatch(&api, cli.command);

    // Edits made by the command are still inside the quiescence window.
    persist.shutdown().await;
    outcome
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    let proj_dirs = ProjectDirs::from("com", "cardz", "cardz")
        .ok_or_else(|| CardzError::Api("Could not determine data dir".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn dispatch(api: &CardzApi, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Decks) | None => handle_decks(api),
        Some(Commands::AddDeck { name }) => report(api.add_deck(&name)?.messages),
        Some(Commands::RmDeck { deck }) => report(api.delete_deck(&deck)?.messages),
        Some(Commands::RenameDeck { deck, name }) => {
            report(api.rename_deck(&deck, &name)?.messages)
        }
        Some(Commands::List { deck }) => handle_list(api, &deck),
        Some(Commands::Add {
            deck,
            question,
            answer,
        }) => report(api.add_card(&deck, &question, &answer)?.messages),
        Some(Commands::Remove { deck, indexes }) => {
            report(api.remove_cards(&deck, &indexes)?.messages)
        }
        Some(Commands::Shuffle { deck }) => report(api.shuffle_deck(&deck)?.messages),
        Some(Commands::Import { deck, file }) => report(api.import_file(&deck, &file)?.messages),
        Some(Commands::Export { deck, output, save }) => handle_export(api, &deck, output, save),
        Some(Commands::Config { key, value }) => handle_config(api, key, value),
    }
}

fn report(messages: Vec<CmdMessage>) -> Result<()> {
    print_messages(&messages);
    Ok(())
}

fn handle_decks(api: &CardzApi) -> Result<()> {
    let result = api.list_decks()?;
    print_decks(&result.listed_decks);
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(api: &CardzApi, deck: &str) -> Result<()> {
    let result = api.list_cards(deck)?;
    print_cards(&result.listed_cards);
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(api: &CardzApi, deck: &str, output: Option<PathBuf>, save: bool) -> Result<()> {
    if output.is_some() || save {
        let cwd = std::env::current_dir().map_err(CardzError::Io)?;
        let result = api.export_to_file(deck, output, &cwd)?;
        print_messages(&result.messages);
        return Ok(());
    }

    // Plain stdout export: keep stdout to the exported text alone.
    let result = api.export_deck(deck)?;
    if let Some(text) = &result.exported {
        print!("{}", text);
    }
    for message in &result.messages {
        eprintln!("{}", message.content.dimmed());
    }
    Ok(())
}

fn handle_config(api: &CardzApi, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = api.config(action.clone())?;
    if let (ConfigAction::ShowAll, Some(config)) = (&action, &result.config) {
        for key in CardzConfig::KEYS {
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const COUNT_WIDTH: usize = 10;

fn print_decks(decks: &[DisplayDeck]) {
    for dd in decks {
        let idx_str = format!("{:>3}. ", dd.index);
        let count = format!("{} cards", dd.deck.cards.len());
        let available = LINE_WIDTH.saturating_sub(idx_str.width() + COUNT_WIDTH + TIME_WIDTH);

        let name = truncate_to_width(&dd.deck.name, available);
        let padding = available.saturating_sub(name.width());

        println!(
            "{}{}{}{:>cw$}{}",
            idx_str.yellow(),
            name.bold(),
            " ".repeat(padding),
            count,
            format_time_ago(dd.deck.created_at).dimmed(),
            cw = COUNT_WIDTH
        );
    }
}

const ARROW: &str = " → ";

fn print_cards(cards: &[DisplayCard]) {
    for dc in cards {
        let idx_str = format!("{:>4}. ", dc.index);
        let available = LINE_WIDTH.saturating_sub(idx_str.width() + ARROW.width());
        let half = available / 2;

        let prompt = truncate_to_width(&single_line(&dc.card.prompt), half);
        let response = truncate_to_width(&single_line(&dc.card.response), half);
        let padding = half.saturating_sub(prompt.width());

        println!(
            "{}{}{}{}{}",
            idx_str.yellow(),
            prompt,
            " ".repeat(padding),
            ARROW.dimmed(),
            response
        );
    }
}

fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = timeago::Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
