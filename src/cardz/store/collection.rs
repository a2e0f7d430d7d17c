use super::backend::StorageBackend;
use crate::error::{CardzError, Result};
use crate::model::{Card, Deck, Record};
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

pub const STARTER_DECK_NAME: &str = "Başlangıç";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    DeckAdded,
    DeckDeleted,
    DeckRenamed,
    CardAdded,
    CardsRemoved,
    Merged,
    Replaced,
    Shuffled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub deck_id: Uuid,
    pub kind: ChangeKind,
}

pub type ChangeListener = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

/// The canonical in-memory collection.
///
/// Every mutation runs under one lock and notifies listeners before the lock
/// is released, so listeners observe mutations in the order they happened.
/// Listeners must not call back into the store.
pub struct CollectionStore {
    decks: Mutex<Vec<Deck>>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl CollectionStore {
    pub fn new(decks: Vec<Deck>) -> Self {
        Self {
            decks: Mutex::new(decks),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Build the store from persisted state.
    ///
    /// Loading never notifies listeners. If nothing usable is persisted, the
    /// starter collection is seeded and saved straight away; a failure of
    /// that save is logged and otherwise ignored.
    pub fn load(backend: &dyn StorageBackend) -> Self {
        match read_persisted(backend) {
            Ok(decks) => {
                tracing::debug!(decks = decks.len(), "loaded collection");
                Self::new(decks)
            }
            Err(e) => {
                tracing::warn!(error = %e, "seeding starter collection");
                let decks = starter_collection();
                if let Err(e) = backend.save_decks(&decks) {
                    tracing::error!(error = %e, "failed to save starter collection");
                }
                Self::new(decks)
            }
        }
    }

    pub fn subscribe(&self, listener: ChangeListener) {
        lock(&self.listeners).push(listener);
    }

    pub fn decks(&self) -> Vec<Deck> {
        lock(&self.decks).clone()
    }

    pub fn deck(&self, deck_id: Uuid) -> Result<Deck> {
        let decks = lock(&self.decks);
        decks
            .iter()
            .find(|d| d.id == deck_id)
            .cloned()
            .ok_or(CardzError::DeckNotFound(deck_id))
    }

    /// First deck whose name matches, ignoring case.
    pub fn find_deck(&self, name: &str) -> Option<Deck> {
        let wanted = name.trim().to_lowercase();
        lock(&self.decks)
            .iter()
            .find(|d| d.name.to_lowercase() == wanted)
            .cloned()
    }

    pub fn add_deck(&self, name: &str) -> Result<Deck> {
        let name = validate_name(name)?;
        let deck = Deck::new(name);
        let added = deck.clone();
        self.mutate(deck.id, ChangeKind::DeckAdded, move |decks| {
            decks.push(deck);
            Ok(())
        })?;
        Ok(added)
    }

    pub fn delete_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.mutate(deck_id, ChangeKind::DeckDeleted, |decks| {
            let pos = decks
                .iter()
                .position(|d| d.id == deck_id)
                .ok_or(CardzError::DeckNotFound(deck_id))?;
            Ok(decks.remove(pos))
        })
    }

    pub fn rename_deck(&self, deck_id: Uuid, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        self.mutate(deck_id, ChangeKind::DeckRenamed, |decks| {
            deck_mut(decks, deck_id)?.name = name;
            Ok(())
        })
    }

    pub fn add_card(&self, deck_id: Uuid, record: Record) -> Result<Card> {
        self.mutate(deck_id, ChangeKind::CardAdded, |decks| {
            let card = Card::new(record);
            deck_mut(decks, deck_id)?.cards.push(card.clone());
            Ok(card)
        })
    }

    /// Append `records` to the deck, then shuffle the whole deck.
    ///
    /// Returns the number of cards added. An empty batch changes nothing and
    /// emits no event.
    pub fn merge(&self, deck_id: Uuid, records: Vec<Record>) -> Result<usize> {
        if records.is_empty() {
            self.deck(deck_id)?;
            return Ok(0);
        }
        self.mutate(deck_id, ChangeKind::Merged, |decks| {
            let deck = deck_mut(decks, deck_id)?;
            let added = records.len();
            deck.cards.extend(records.into_iter().map(Card::new));
            deck.cards.shuffle(&mut rand::thread_rng());
            Ok(added)
        })
    }

    pub fn replace_all(&self, deck_id: Uuid, records: Vec<Record>) -> Result<()> {
        self.mutate(deck_id, ChangeKind::Replaced, |decks| {
            deck_mut(decks, deck_id)?.cards = records.into_iter().map(Card::new).collect();
            Ok(())
        })
    }

    /// Remove cards by 0-based position. Either every index is valid and all
    /// of them are removed, or nothing is.
    pub fn remove_cards(&self, deck_id: Uuid, indexes: &[usize]) -> Result<Vec<Card>> {
        self.mutate(deck_id, ChangeKind::CardsRemoved, |decks| {
            let deck = deck_mut(decks, deck_id)?;
            let len = deck.cards.len();
            let unique: BTreeSet<usize> = indexes.iter().copied().collect();
            if let Some(&index) = unique.iter().find(|&&i| i >= len) {
                return Err(CardzError::CardIndexOutOfRange { index, len });
            }

            let mut removed = Vec::with_capacity(unique.len());
            for &index in unique.iter().rev() {
                removed.push(deck.cards.remove(index));
            }
            removed.reverse();
            Ok(removed)
        })
    }

    pub fn shuffle(&self, deck_id: Uuid) -> Result<()> {
        self.mutate(deck_id, ChangeKind::Shuffled, |decks| {
            deck_mut(decks, deck_id)?
                .cards
                .shuffle(&mut rand::thread_rng());
            Ok(())
        })
    }

    fn mutate<T, F>(&self, deck_id: Uuid, kind: ChangeKind, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Deck>) -> Result<T>,
    {
        let mut decks = lock(&self.decks);
        let out = f(&mut *decks)?;

        let event = ChangeEvent { deck_id, kind };
        for listener in lock(&self.listeners).iter() {
            listener(&event);
        }
        drop(decks);

        Ok(out)
    }
}

/// The collection a fresh install starts with.
pub fn starter_collection() -> Vec<Deck> {
    vec![Deck::new(STARTER_DECK_NAME).with_records([
        Record::new("Merhaba", "Hello"),
        Record::new("Teşekkürler", "Thank you"),
        Record::new("Kitap", "Book"),
    ])]
}

fn read_persisted(backend: &dyn StorageBackend) -> Result<Vec<Deck>> {
    match backend.load_decks() {
        Ok(Some(decks)) => Ok(decks),
        Ok(None) => Err(CardzError::PersistenceLoad(format!(
            "nothing saved at {}",
            backend.location().display()
        ))),
        Err(e) => Err(CardzError::PersistenceLoad(e.to_string())),
    }
}

fn deck_mut(decks: &mut [Deck], deck_id: Uuid) -> Result<&mut Deck> {
    decks
        .iter_mut()
        .find(|d| d.id == deck_id)
        .ok_or(CardzError::DeckNotFound(deck_id))
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CardzError::Api("Deck name cannot be empty".into()));
    }
    Ok(name.to_string())
}

// A panic inside a mutation must not take the collection down with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub fn records(count: usize, prefix: &str) -> Vec<Record> {
        (1..=count)
            .map(|i| Record::new(format!("{prefix} q{i}"), format!("{prefix} a{i}")))
            .collect()
    }

    /// A store with a single deck holding `count` cards.
    pub fn store_with_deck(count: usize) -> (CollectionStore, Uuid) {
        let deck = Deck::new("Fixture").with_records(records(count, "existing"));
        let id = deck.id;
        (CollectionStore::new(vec![deck]), id)
    }
}
