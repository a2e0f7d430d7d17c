use crate::commands::{CmdMessage, CmdResult, DisplayDeck};
use crate::error::Result;
use crate::store::CollectionStore;

use super::helpers::{resolve_deck, DeckSelector};

pub fn list(store: &CollectionStore) -> Result<CmdResult> {
    let decks: Vec<DisplayDeck> = store
        .decks()
        .into_iter()
        .enumerate()
        .map(|(i, deck)| DisplayDeck { index: i + 1, deck })
        .collect();

    let mut result = CmdResult::default();
    if decks.is_empty() {
        result.add_message(CmdMessage::info("No decks yet."));
    }
    Ok(result.with_listed_decks(decks))
}

pub fn add(store: &CollectionStore, name: &str) -> Result<CmdResult> {
    let deck = store.add_deck(name)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deck created: {}", deck.name)));
    Ok(result)
}

pub fn delete(store: &CollectionStore, selector: &DeckSelector) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    let removed = store.delete_deck(deck.id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deck deleted: {} ({} cards)",
        removed.name,
        removed.cards.len()
    )));
    Ok(result.with_affected_cards(removed.cards))
}

pub fn rename(store: &CollectionStore, selector: &DeckSelector, name: &str) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    store.rename_deck(deck.id, name)?;

    let renamed = store.deck(deck.id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deck renamed: {} -> {}",
        deck.name, renamed.name
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Deck, Record};

    #[test]
    fn lists_decks_with_one_based_indexes() {
        let store = CollectionStore::new(vec![Deck::new("A"), Deck::new("B")]);
        let result = list(&store).unwrap();
        let listed: Vec<(usize, String)> = result
            .listed_decks
            .iter()
            .map(|d| (d.index, d.deck.name.clone()))
            .collect();
        assert_eq!(listed, vec![(1, "A".to_string()), (2, "B".to_string())]);
    }

    #[test]
    fn empty_list_says_so() {
        let store = CollectionStore::new(Vec::new());
        let result = list(&store).unwrap();
        assert!(result.listed_decks.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn add_then_delete_by_name() {
        let store = CollectionStore::new(Vec::new());
        add(&store, "Verbs").unwrap();
        let deck = store.decks()[0].clone();
        store.add_card(deck.id, Record::new("gitmek", "to go")).unwrap();

        let result = delete(&store, &DeckSelector::Name("verbs".into())).unwrap();
        assert_eq!(result.affected_cards.len(), 1);
        assert!(store.decks().is_empty());
    }

    #[test]
    fn rename_by_index() {
        let store = CollectionStore::new(vec![Deck::new("Old")]);
        rename(&store, &DeckSelector::Index(1), "New").unwrap();
        assert_eq!(store.decks()[0].name, "New");
    }
}
