#![forbid(unsafe_code)]

//! Marshalling work onto the UI thread.
//!
//! Signals, components and the reconciler are single-threaded. Background
//! threads never touch them; they [`post`](UiSender::post) messages, and the
//! UI thread applies them with [`Dispatcher::drain`], typically once per
//! event-loop tick.
//!
//! # Invariants
//!
//! 1. Messages from one sender are handled in the order they were posted.
//! 2. `drain` handles only messages already queued when it started; a
//!    handler that posts more leaves them for the next drain.
//!
//! # Example
//!
//! ```ignore
//! let dispatcher = Dispatcher::new();
//! let tx = dispatcher.sender();
//! spawn_background("fetch", move || {
//!     let rows = load_rows()?;
//!     tx.post(Msg::Loaded(rows))?;
//!     Ok::<_, AppError>(())
//! })?;
//! // on the UI thread, each tick:
//! dispatcher.drain(|Msg::Loaded(rows)| { let _ = todos.set(rows); });
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, error};

/// The [`Dispatcher`] behind a [`UiSender`] is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the UI dispatcher was dropped")]
pub struct Disconnected;

/// Receiving end, owned by the UI thread.
pub struct Dispatcher<M> {
    tx: Sender<M>,
    rx: Receiver<M>,
    queued: Arc<AtomicUsize>,
}

impl<M> fmt::Debug for Dispatcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.pending())
            .finish()
    }
}

impl<M> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Dispatcher<M> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            queued: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A sender that may be moved to other threads.
    #[must_use]
    pub fn sender(&self) -> UiSender<M> {
        UiSender {
            tx: self.tx.clone(),
            queued: Arc::clone(&self.queued),
        }
    }

    /// Messages posted but not yet drained.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    /// Apply the queued messages in order. Returns how many were handled.
    pub fn drain(&self, mut handler: impl FnMut(M)) -> usize {
        let budget = self.pending();
        let mut handled = 0;
        while handled < budget {
            let Ok(msg) = self.rx.try_recv() else {
                break;
            };
            self.queued.fetch_sub(1, Ordering::AcqRel);
            handler(msg);
            handled += 1;
        }
        if handled > 0 {
            debug!(handled, "drained UI messages");
        }
        handled
    }
}

/// Sending end for background threads.
pub struct UiSender<M> {
    tx: Sender<M>,
    queued: Arc<AtomicUsize>,
}

impl<M> Clone for UiSender<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            queued: Arc::clone(&self.queued),
        }
    }
}

impl<M> fmt::Debug for UiSender<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiSender").finish_non_exhaustive()
    }
}

impl<M> UiSender<M> {
    /// Queue `msg` for the UI thread.
    pub fn post(&self, msg: M) -> Result<(), Disconnected> {
        // Counted before sending: `queued` never undercounts the channel.
        self.queued.fetch_add(1, Ordering::AcqRel);
        self.tx.send(msg).map_err(|_| {
            self.queued.fetch_sub(1, Ordering::AcqRel);
            Disconnected
        })
    }
}

/// Run `task` on a named background thread (`"{name}-thread"`).
///
/// An `Err` from the task is logged; it never reaches the UI thread unless
/// the task posts it.
pub fn spawn_background<F, E>(name: &str, task: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: fmt::Display,
{
    let thread_name = format!("{name}-thread");
    thread::Builder::new().name(thread_name).spawn(move || {
        if let Err(err) = task() {
            error!(error = %err, "background task failed");
        }
    })
}
