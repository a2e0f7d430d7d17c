use super::backend::StorageBackend;
use crate::error::{CardzError, Result};
use crate::model::Deck;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory storage backend for testing.
///
/// Uses a `Mutex` rather than `RefCell` because saves happen on tokio's
/// blocking pool.
#[derive(Default)]
pub struct MemBackend {
    decks: Mutex<Option<Vec<Deck>>>,
    simulate_write_error: AtomicBool,
    simulate_load_error: AtomicBool,
    writes: AtomicUsize,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted collection.
    pub fn with_decks(decks: Vec<Deck>) -> Self {
        let backend = Self::default();
        *backend.lock() = Some(decks);
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Make `load_decks` fail as if the persisted data were corrupt.
    pub fn set_simulate_load_error(&self, simulate: bool) {
        self.simulate_load_error.store(simulate, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The last successfully saved decks, if any.
    pub fn saved(&self) -> Option<Vec<Deck>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<Deck>>> {
        self.decks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemBackend {
    fn load_decks(&self) -> Result<Option<Vec<Deck>>> {
        if self.simulate_load_error.load(Ordering::SeqCst) {
            return Err(CardzError::Store("Simulated load error".to_string()));
        }
        Ok(self.lock().clone())
    }

    fn save_decks(&self, decks: &[Deck]) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(CardzError::Store("Simulated write error".to_string()));
        }
        *self.lock() = Some(decks.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://decks.json")
    }
}
