//! # Auto Persistence
//!
//! [`AutoPersist`] keeps the durable copy of the collection in step with the
//! in-memory [`CollectionStore`] without writing on every keystroke.
//!
//! ## Debounce
//!
//! The worker is either *idle* or *pending*. A change event moves it to
//! pending and (re)starts the quiescence timer; each further change restarts
//! the timer again. Only when the timer runs out with no new change does the
//! worker snapshot the whole collection and save it once, then go back to
//! idle. A burst of edits therefore produces one write after the burst, not
//! one per edit and not periodic writes during it.
//!
//! ```text
//!  change      change  change                     (window)
//!    |           |       |<------------------------>|
//!  idle ──> pending ─────────────────────────────> save ──> idle
//! ```
//!
//! ## Failures
//!
//! A failed save is logged and reported to the observer channel, if any. It
//! is not retried: memory stays the source of truth and the next change
//! schedules another attempt. The file on disk is never half written because
//! backends replace it atomically.
//!
//! ## Threads
//!
//! The timer is a tokio task. The save itself is blocking I/O and runs on
//! tokio's blocking pool, so the code mutating the store never waits on disk.

use crate::error::CardzError;
use crate::store::{ChangeEvent, CollectionStore, StorageBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const DEFAULT_QUIESCENCE_WINDOW: Duration = Duration::from_millis(400);

/// What happened to one durable write.
#[derive(Debug, Clone)]
pub enum PersistOutcome {
    Saved {
        at: Instant,
        decks: usize,
        cards: usize,
    },
    Failed {
        at: Instant,
        error: String,
    },
}

impl PersistOutcome {
    pub fn at(&self) -> Instant {
        match self {
            PersistOutcome::Saved { at, .. } | PersistOutcome::Failed { at, .. } => *at,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, PersistOutcome::Saved { .. })
    }
}

enum Signal {
    Changed,
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

enum Wake {
    Signal(Option<Signal>),
    Elapsed,
}

/// Handle to the background persistence worker.
///
/// Must be created inside a tokio runtime. Call [`shutdown`](Self::shutdown)
/// before exiting so a pending write is not lost.
pub struct AutoPersist {
    sender: mpsc::UnboundedSender<Signal>,
    worker: JoinHandle<()>,
}

impl AutoPersist {
    pub fn spawn(
        store: Arc<CollectionStore>,
        backend: Arc<dyn StorageBackend>,
        window: Duration,
    ) -> Self {
        Self::start(store, backend, window, None)
    }

    /// Like [`spawn`](Self::spawn), but every write attempt is also reported
    /// on `observer`.
    pub fn spawn_with_observer(
        store: Arc<CollectionStore>,
        backend: Arc<dyn StorageBackend>,
        window: Duration,
        observer: mpsc::UnboundedSender<PersistOutcome>,
    ) -> Self {
        Self::start(store, backend, window, Some(observer))
    }

    fn start(
        store: Arc<CollectionStore>,
        backend: Arc<dyn StorageBackend>,
        window: Duration,
        observer: Option<mpsc::UnboundedSender<PersistOutcome>>,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let changes = sender.clone();
        store.subscribe(Box::new(move |_: &ChangeEvent| {
            let _ = changes.send(Signal::Changed);
        }));

        let worker = Worker {
            store,
            backend,
            window,
            observer,
        };
        let worker = tokio::spawn(worker.run(receiver));

        Self { sender, worker }
    }

    /// Write the current collection now, whatever the state.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(Signal::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Write anything pending and stop the worker.
    pub async fn shutdown(self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(Signal::Shutdown(done)).is_ok() {
            let _ = wait.await;
        }
        let _ = self.worker.await;
    }
}

struct Worker {
    store: Arc<CollectionStore>,
    backend: Arc<dyn StorageBackend>,
    window: Duration,
    observer: Option<mpsc::UnboundedSender<PersistOutcome>>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<Signal>) {
        let mut pending = false;

        loop {
            // A fresh sleep per iteration: any signal restarts the window.
            let wake = if pending {
                tokio::select! {
                    signal = receiver.recv() => Wake::Signal(signal),
                    _ = tokio::time::sleep(self.window) => Wake::Elapsed,
                }
            } else {
                Wake::Signal(receiver.recv().await)
            };

            match wake {
                Wake::Elapsed => {
                    self.write().await;
                    pending = false;
                }
                Wake::Signal(Some(Signal::Changed)) => {
                    if !pending {
                        tracing::trace!("collection changed, write scheduled");
                    }
                    pending = true;
                }
                Wake::Signal(Some(Signal::Flush(done))) => {
                    self.write().await;
                    pending = false;
                    let _ = done.send(());
                }
                Wake::Signal(Some(Signal::Shutdown(done))) => {
                    if pending {
                        self.write().await;
                    }
                    let _ = done.send(());
                    break;
                }
                Wake::Signal(None) => {
                    if pending {
                        self.write().await;
                    }
                    break;
                }
            }
        }
    }

    async fn write(&self) {
        let at = Instant::now();
        let decks = self.store.decks();
        let deck_count = decks.len();
        let card_count: usize = decks.iter().map(|d| d.cards.len()).sum();

        let backend = Arc::clone(&self.backend);
        let result = tokio::task::spawn_blocking(move || backend.save_decks(&decks)).await;

        let outcome = match result {
            Ok(Ok(())) => {
                tracing::debug!(
                    decks = deck_count,
                    cards = card_count,
                    location = %self.backend.location().display(),
                    "collection saved"
                );
                PersistOutcome::Saved {
                    at,
                    decks: deck_count,
                    cards: card_count,
                }
            }
            Ok(Err(e)) => {
                let error = CardzError::PersistenceWrite(e.to_string());
                tracing::error!(error = %error, "collection not saved");
                PersistOutcome::Failed {
                    at,
                    error: error.to_string(),
                }
            }
            Err(join_error) => {
                let error = CardzError::PersistenceWrite(join_error.to_string());
                tracing::error!(error = %error, "save task did not complete");
                PersistOutcome::Failed {
                    at,
                    error: error.to_string(),
                }
            }
        };

        if let Some(observer) = &self.observer {
            let _ = observer.send(outcome);
        }
    }
}
