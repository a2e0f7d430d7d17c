use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CardzError {
    #[error("Input could not be decoded with any configured encoding")]
    UndecodableInput,

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card index {index} is out of range (deck has {len} cards)")]
    CardIndexOutOfRange { index: usize, len: usize },

    #[error("Failed to persist collection: {0}")]
    PersistenceWrite(String),

    #[error("Failed to load collection: {0}")]
    PersistenceLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, CardzError>;
