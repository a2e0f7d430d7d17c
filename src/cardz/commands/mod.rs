use crate::config::CardzConfig;
use crate::model::{Card, Deck};
use std::path::PathBuf;

pub mod cards;
pub mod config;
pub mod decks;
pub mod export;
pub mod helpers;
pub mod import;

pub use helpers::DeckSelector;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A deck with its 1-based display position.
#[derive(Debug, Clone)]
pub struct DisplayDeck {
    pub index: usize,
    pub deck: Deck,
}

/// A card with its 1-based display position within its deck.
#[derive(Debug, Clone)]
pub struct DisplayCard {
    pub index: usize,
    pub card: Card,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_cards: Vec<Card>,
    pub listed_decks: Vec<DisplayDeck>,
    pub listed_cards: Vec<DisplayCard>,
    pub exported: Option<String>,
    pub written_path: Option<PathBuf>,
    pub config: Option<CardzConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_cards(mut self, cards: Vec<Card>) -> Self {
        self.affected_cards = cards;
        self
    }

    pub fn with_listed_decks(mut self, decks: Vec<DisplayDeck>) -> Self {
        self.listed_decks = decks;
        self
    }

    pub fn with_listed_cards(mut self, cards: Vec<DisplayCard>) -> Self {
        self.listed_cards = cards;
        self
    }

    pub fn with_config(mut self, config: CardzConfig) -> Self {
        self.config = Some(config);
        self
    }
}
