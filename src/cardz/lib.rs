//! # Cardz Architecture
//!
//! Cardz is a flashcard library with a small CLI on top. Decks of
//! question/answer cards live in memory, are saved to disk shortly after they
//! change, and move in and out of the app as `;`-delimited text.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, prints results, owns stdout/stderr     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade, resolves deck selectors and card numbers    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - Business logic, returns CmdResult                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/) + AutoPersist (persist.rs)                  │
//! │  - In-memory collection with change events                  │
//! │  - Debounced, atomic saves through a StorageBackend         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text import and export sit beside the layers: [`encoding`] turns raw bytes
//! into text, [`codec`] turns text into records and back.
//!
//! ## No I/O in the Core
//!
//! From `api.rs` inward nothing prints or exits. File reads happen only where
//! an operation is explicitly about a path (import from file, export to
//! file, config).
//!
//! ## Module Overview
//!
//! - [`api`]: the facade
//! - [`commands`]: one module per command group
//! - [`store`]: collection store and storage backends
//! - [`persist`]: debounced auto-save
//! - [`codec`]: delimited text parsing and serialization
//! - [`encoding`]: encoding detection for imports
//! - [`model`]: `Record`, `Card`, `Deck`
//! - [`config`]: configuration
//! - [`error`]: error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod persist;
pub mod store;
