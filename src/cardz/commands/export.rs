use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CardzError, Result};
use crate::store::CollectionStore;
use std::fs;
use std::path::{Path, PathBuf};

use super::helpers::{resolve_deck, DeckSelector};

/// Serialize a deck to delimited text, leaving it to the caller where to put it.
pub fn run(store: &CollectionStore, selector: &DeckSelector) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    let text = codec::serialize(&deck.records());

    let mut result = CmdResult::default();
    result.exported = Some(text);
    result.add_message(CmdMessage::info(format!(
        "Exported {} cards from {}",
        deck.cards.len(),
        deck.name
    )));
    Ok(result)
}

/// Export a deck to `output`, or to `<deck name><extension>` in `dir`.
pub fn to_file(
    store: &CollectionStore,
    selector: &DeckSelector,
    output: Option<PathBuf>,
    dir: &Path,
    extension: &str,
) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    let path = output.unwrap_or_else(|| default_export_path(dir, &deck.name, extension));

    let text = codec::serialize(&deck.records());
    // Always UTF-8, never with a byte-order mark.
    fs::write(&path, text.as_bytes()).map_err(CardzError::Io)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} cards to {}",
        deck.cards.len(),
        path.display()
    )));
    result.written_path = Some(path);
    Ok(result)
}

fn default_export_path(dir: &Path, deck_name: &str, extension: &str) -> PathBuf {
    let stem = sanitize_filename(deck_name);
    let stem = if stem.is_empty() { "deck".to_string() } else { stem };
    dir.join(format!("{}{}", stem, extension))
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
