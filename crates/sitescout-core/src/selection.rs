//! Currently selected session, shared process-wide.
//!
//! The selection is a `watch` channel: exactly one [`SelectionWriter`]
//! (owned by the selection handler) and any number of cheap
//! [`SelectionReader`]s. Every change bumps a generation counter; the pair
//! (generation, session id) is the [`Epoch`] that asynchronous work captures
//! when it starts and compares before it commits.

use tokio::sync::watch;

use crate::models::SessionId;

/// Selection context an asynchronous operation was started under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Epoch {
    generation: u64,
    session_id: Option<SessionId>,
}

impl Epoch {
    /// Selected session of this epoch
    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// Monotonic change counter
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Create the selection context with nothing selected
pub fn selection_channel() -> (SelectionWriter, SelectionReader) {
    let (tx, rx) = watch::channel(Epoch::default());
    (SelectionWriter { tx }, SelectionReader { rx })
}

/// The single writer of the selection
#[derive(Debug)]
pub struct SelectionWriter {
    tx: watch::Sender<Epoch>,
}

impl SelectionWriter {
    /// Select `session_id` (or nothing).
    ///
    /// Returns the new epoch, or `None` when the id is already selected.
    pub fn select(&self, session_id: Option<SessionId>) -> Option<Epoch> {
        let mut started = None;
        self.tx.send_if_modified(|epoch| {
            if epoch.session_id == session_id {
                return false;
            }
            *epoch = Epoch {
                generation: epoch.generation + 1,
                session_id,
            };
            started = Some(*epoch);
            true
        });
        started
    }

    /// Current epoch
    pub fn current(&self) -> Epoch {
        *self.tx.borrow()
    }

    /// New reader of this selection
    pub fn reader(&self) -> SelectionReader {
        SelectionReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the selection
#[derive(Debug, Clone)]
pub struct SelectionReader {
    rx: watch::Receiver<Epoch>,
}

impl SelectionReader {
    /// Current epoch
    pub fn current(&self) -> Epoch {
        *self.rx.borrow()
    }

    /// Currently selected session id
    pub fn selected(&self) -> Option<SessionId> {
        self.current().session_id
    }

    /// Whether work started under `epoch` may still commit
    pub fn is_current(&self, epoch: &Epoch) -> bool {
        self.current() == *epoch
    }

    /// Wait for the next selection change.
    ///
    /// Returns `None` once the writer is gone.
    pub async fn changed(&mut self) -> Option<Epoch> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
