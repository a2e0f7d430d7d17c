use crate::error::{CardzError, Result};
use crate::model::{Deck, Record};
use crate::store::CollectionStore;
use std::fmt;

/// How a user points at a deck: its 1-based position or its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckSelector {
    Index(usize),
    Name(String),
}

impl DeckSelector {
    /// Digits select by position, anything else by name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<usize>() {
            Ok(n) => DeckSelector::Index(n),
            Err(_) => DeckSelector::Name(input.to_string()),
        }
    }
}

impl fmt::Display for DeckSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckSelector::Index(n) => write!(f, "{}", n),
            DeckSelector::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

pub fn resolve_deck(store: &CollectionStore, selector: &DeckSelector) -> Result<Deck> {
    let found = match selector {
        DeckSelector::Index(n) => n
            .checked_sub(1)
            .and_then(|i| store.decks().into_iter().nth(i)),
        DeckSelector::Name(name) => store.find_deck(name),
    };
    found.ok_or_else(|| CardzError::Api(format!("Deck {} not found", selector)))
}

/// Trim both sides of a hand-written card and reject empty ones.
pub fn authored_record(prompt: &str, response: &str) -> Result<Record> {
    let prompt = prompt.trim();
    let response = response.trim();
    if prompt.is_empty() || response.is_empty() {
        return Err(CardzError::Api(
            "Both question and answer are required".into(),
        ));
    }
    Ok(Record::new(prompt, response))
}
