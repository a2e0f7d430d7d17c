//! # API Facade
//!
//! [`CardzApi`] is the single entry point for every cardz operation. It turns
//! user-facing input (deck positions or names, 1-based card numbers, paths)
//! into calls on the command layer and hands back a [`CmdResult`].
//!
//! It does no business logic and no terminal I/O. Those live in
//! `commands/*.rs` and the binary respectively.
//!
//! ## Sharing the Store
//!
//! The store is held behind an `Arc` so the same instance can be handed to
//! [`crate::persist::AutoPersist`], which saves it after edits settle.

use crate::commands::{self, CmdResult, DeckSelector};
use crate::config::CardzConfig;
use crate::encoding::EncodingDetector;
use crate::error::{CardzError, Result};
use crate::store::CollectionStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, DisplayCard, DisplayDeck, MessageLevel};

pub struct CardzApi {
    store: Arc<CollectionStore>,
    data_dir: PathBuf,
    detector: EncodingDetector,
    export_extension: String,
}

impl CardzApi {
    pub fn new(store: Arc<CollectionStore>, data_dir: PathBuf, config: &CardzConfig) -> Self {
        Self {
            store,
            data_dir,
            detector: EncodingDetector::new(config.encodings.clone()),
            export_extension: config.export_extension.clone(),
        }
    }

    pub fn store(&self) -> &Arc<CollectionStore> {
        &self.store
    }

    pub fn list_decks(&self) -> Result<CmdResult> {
        commands::decks::list(&self.store)
    }

    pub fn add_deck(&self, name: &str) -> Result<CmdResult> {
        commands::decks::add(&self.store, name)
    }

    pub fn delete_deck(&self, deck: &str) -> Result<CmdResult> {
        commands::decks::delete(&self.store, &DeckSelector::parse(deck))
    }

    pub fn rename_deck(&self, deck: &str, name: &str) -> Result<CmdResult> {
        commands::decks::rename(&self.store, &DeckSelector::parse(deck), name)
    }

    pub fn list_cards(&self, deck: &str) -> Result<CmdResult> {
        commands::cards::list(&self.store, &DeckSelector::parse(deck))
    }

    pub fn add_card(&self, deck: &str, prompt: &str, response: &str) -> Result<CmdResult> {
        commands::cards::add(&self.store, &DeckSelector::parse(deck), prompt, response)
    }

    /// `indexes` are the 1-based numbers shown by `list_cards`.
    pub fn remove_cards<I: AsRef<str>>(&self, deck: &str, indexes: &[I]) -> Result<CmdResult> {
        let indexes = parse_card_indexes(indexes)?;
        commands::cards::remove(&self.store, &DeckSelector::parse(deck), &indexes)
    }

    pub fn shuffle_deck(&self, deck: &str) -> Result<CmdResult> {
        commands::cards::shuffle(&self.store, &DeckSelector::parse(deck))
    }

    pub fn import_bytes(&self, deck: &str, bytes: &[u8]) -> Result<CmdResult> {
        commands::import::run(&self.store, &DeckSelector::parse(deck), bytes, &self.detector)
    }

    pub fn import_file(&self, deck: &str, path: &Path) -> Result<CmdResult> {
        commands::import::from_path(&self.store, &DeckSelector::parse(deck), path, &self.detector)
    }

    pub fn export_deck(&self, deck: &str) -> Result<CmdResult> {
        commands::export::run(&self.store, &DeckSelector::parse(deck))
    }

    /// Write a deck to `output`, or to `<deck name><export ext>` in `dir`.
    pub fn export_to_file(
        &self,
        deck: &str,
        output: Option<PathBuf>,
        dir: &Path,
    ) -> Result<CmdResult> {
        commands::export::to_file(
            &self.store,
            &DeckSelector::parse(deck),
            output,
            dir,
            &self.export_extension,
        )
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.data_dir, action)
    }
}

fn parse_card_indexes<I: AsRef<str>>(indexes: &[I]) -> Result<Vec<usize>> {
    indexes
        .iter()
        .map(|s| {
            let s = s.as_ref().trim();
            s.parse::<usize>()
                .map_err(|_| CardzError::Api(format!("Invalid card number: {}", s)))
        })
        .collect()
}
