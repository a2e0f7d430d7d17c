//! # Storage Layer
//!
//! Cardz keeps the whole collection in memory and mirrors it to durable
//! storage as a single document.
//!
//! ## Pieces
//!
//! - [`collection::CollectionStore`]: the canonical in-memory deck list. All
//!   mutations go through it and each one emits a [`collection::ChangeEvent`].
//! - [`backend::StorageBackend`]: the durable side. It only knows how to load
//!   and save the full deck list.
//! - [`crate::persist::AutoPersist`]: subscribes to the store and saves
//!   through a backend once edits have settled.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production storage in `decks.json`, replaced
//!   atomically (temp file + rename) on every save.
//! - [`mem_backend::MemBackend`]: in-memory storage for tests, with simulated
//!   failures and a save counter.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── decks.json      # All decks and cards (JSON array)
//! └── config.json     # Configuration
//! ```
//!
//! ## Load Fallback
//!
//! A missing or unreadable `decks.json` is not fatal: the store seeds the
//! starter collection and tries to save it. The unreadable file is only
//! replaced by that save, never deleted up front.

pub mod backend;
pub mod collection;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use collection::{ChangeEvent, ChangeKind, CollectionStore};
