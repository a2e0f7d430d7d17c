use crate::error::Result;
use crate::model::Deck;
use std::path::PathBuf;

/// Abstract interface for durable collection storage.
///
/// The whole deck list is read and written as one unit. Backends must be
/// shareable across threads because writes run on a background worker.
pub trait StorageBackend: Send + Sync {
    /// Load the persisted decks.
    /// Returns Ok(None) when nothing has been persisted yet.
    /// Returns Err when something exists but cannot be read or decoded.
    fn load_decks(&self) -> Result<Option<Vec<Deck>>>;

    /// Persist the full deck list.
    /// MUST be atomic (e.g. write to tmp then rename): a crash mid-write must
    /// leave the previous state readable.
    fn save_decks(&self, decks: &[Deck]) -> Result<()>;

    /// Where the collection lives. For MemBackend, a virtual path.
    fn location(&self) -> PathBuf;
}
