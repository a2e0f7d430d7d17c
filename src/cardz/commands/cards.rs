use crate::commands::{CmdMessage, CmdResult, DisplayCard};
use crate::error::{CardzError, Result};
use crate::store::CollectionStore;

use super::helpers::{authored_record, resolve_deck, DeckSelector};

pub fn list(store: &CollectionStore, selector: &DeckSelector) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    let cards: Vec<DisplayCard> = deck
        .cards
        .into_iter()
        .enumerate()
        .map(|(i, card)| DisplayCard { index: i + 1, card })
        .collect();

    let mut result = CmdResult::default();
    if cards.is_empty() {
        result.add_message(CmdMessage::info(format!("Deck {} is empty.", deck.name)));
    }
    Ok(result.with_listed_cards(cards))
}

pub fn add(
    store: &CollectionStore,
    selector: &DeckSelector,
    prompt: &str,
    response: &str,
) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    let record = authored_record(prompt, response)?;
    let card = store.add_card(deck.id, record)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card added to {}: {}",
        deck.name, card.prompt
    )));
    Ok(result.with_affected_cards(vec![card]))
}

/// Remove cards by their 1-based display index.
pub fn remove(
    store: &CollectionStore,
    selector: &DeckSelector,
    indexes: &[usize],
) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    let positions = indexes
        .iter()
        .map(|&i| {
            i.checked_sub(1).ok_or(CardzError::CardIndexOutOfRange {
                index: i,
                len: deck.cards.len(),
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    // Report the number the user typed, not the position.
    let removed = store
        .remove_cards(deck.id, &positions)
        .map_err(|e| match e {
            CardzError::CardIndexOutOfRange { index, len } => CardzError::CardIndexOutOfRange {
                index: index + 1,
                len,
            },
            other => other,
        })?;

    let mut result = CmdResult::default();
    for card in &removed {
        result.add_message(CmdMessage::success(format!("Card removed: {}", card.prompt)));
    }
    Ok(result.with_affected_cards(removed))
}

pub fn shuffle(store: &CollectionStore, selector: &DeckSelector) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    store.shuffle(deck.id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Shuffled {} cards in {}",
        deck.cards.len(),
        deck.name
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Deck, Record};

    fn store() -> CollectionStore {
        let deck = Deck::new("Verbs").with_records([
            Record::new("gitmek", "to go"),
            Record::new("gelmek", "to come"),
            Record::new("yapmak", "to do"),
        ]);
        CollectionStore::new(vec![deck])
    }

    #[test]
    fn lists_cards_in_order() {
        let store = store();
        let result = list(&store, &DeckSelector::Index(1)).unwrap();
        let prompts: Vec<&str> = result
            .listed_cards
            .iter()
            .map(|c| c.card.prompt.as_str())
            .collect();
        assert_eq!(prompts, vec!["gitmek", "gelmek", "yapmak"]);
        assert_eq!(result.listed_cards[2].index, 3);
    }

    #[test]
    fn add_trims_and_appends() {
        let store = store();
        add(&store, &DeckSelector::Index(1), " okumak ", " to read ").unwrap();
        let deck = &store.decks()[0];
        assert_eq!(deck.cards.len(), 4);
        assert_eq!(deck.cards[3].record(), Record::new("okumak", "to read"));
    }

    #[test]
    fn add_rejects_blank_fields() {
        let store = store();
        assert!(add(&store, &DeckSelector::Index(1), "okumak", " ").is_err());
        assert_eq!(store.decks()[0].cards.len(), 3);
    }

    #[test]
    fn remove_uses_one_based_indexes() {
        let store = store();
        let result = remove(&store, &DeckSelector::Index(1), &[1, 3]).unwrap();
        assert_eq!(result.affected_cards.len(), 2);
        assert_eq!(store.decks()[0].cards[0].prompt, "gelmek");
    }

    #[test]
    fn remove_rejects_zero_and_out_of_range() {
        let store = store();
        assert!(remove(&store, &DeckSelector::Index(1), &[0]).is_err());
        let err = remove(&store, &DeckSelector::Index(1), &[1, 4]).unwrap_err();
        assert!(matches!(
            err,
            CardzError::CardIndexOutOfRange { index: 4, len: 3 }
        ));
        assert_eq!(store.decks()[0].cards.len(), 3);
    }

    #[test]
    fn shuffle_keeps_the_same_cards() {
        let store = store();
        let before = store.decks()[0].records();
        shuffle(&store, &DeckSelector::Index(1)).unwrap();
        let mut after = store.decks()[0].records();
        let mut before = before;
        before.sort_by(|a, b| a.prompt.cmp(&b.prompt));
        after.sort_by(|a, b| a.prompt.cmp(&b.prompt));
        assert_eq!(before, after);
    }
}
