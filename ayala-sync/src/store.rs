//! Optimistic synchronized store
//!
//! One [`SyncedStore`] per remote path. Local writes are applied immediately
//! and queued to a single writer task, so one device's writes reach the remote
//! in the order they were made. A listener task replaces local state with
//! every remote notification, except echoes of this device's own writes that
//! a newer local write has already superseded.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::StreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::document;
use crate::remote::RemoteStore;

/// First reconnect delay after the watch drops
const RECONNECT_MIN: Duration = Duration::from_millis(500);
/// Reconnect delay ceiling
const RECONNECT_MAX: Duration = Duration::from_secs(30);

/// Queue entries for the writer task
enum Outbound<T> {
    Write(Arc<T>),
    Flush(oneshot::Sender<()>),
}

/// Own write whose echo has not come back yet
struct PendingWrite<T> {
    value: Arc<T>,
    written: bool,
}

/// Own writes in issue order, shared by writer and listener
type PendingWrites<T> = Arc<Mutex<VecDeque<PendingWrite<T>>>>;

fn lock<T>(pending: &Mutex<T>) -> MutexGuard<'_, T> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writer outcome for one queued value
fn settle_pending<T>(pending: &Mutex<VecDeque<PendingWrite<T>>>, value: &Arc<T>, written: bool) {
    let mut pending = lock(pending);
    if written {
        if let Some(entry) = pending.iter_mut().find(|p| Arc::ptr_eq(&p.value, value)) {
            entry.written = true;
        }
    } else {
        // No echo will ever come for a failed write
        pending.retain(|p| !Arc::ptr_eq(&p.value, value));
    }
}

struct StoreInner<T> {
    path: String,
    initial: Arc<T>,
    state: watch::Sender<Arc<T>>,
    ready: watch::Sender<bool>,
    outbound: mpsc::UnboundedSender<Outbound<T>>,
    pending: PendingWrites<T>,
    shutdown: CancellationToken,
}

impl<T> StoreInner<T> {
    fn push(&self, value: Arc<T>) {
        lock(&self.pending).push_back(PendingWrite {
            value: value.clone(),
            written: false,
        });
        if self.outbound.send(Outbound::Write(value.clone())).is_err() {
            tracing::warn!(path = %self.path, "Writer stopped; change kept locally only");
            settle_pending(&self.pending, &value, false);
        }
    }

    /// Write the initial value to an empty or unreadable remote path.
    fn seed(&self) {
        self.push(self.initial.clone());
    }
}

impl<T: PartialEq> StoreInner<T> {
    /// Echoes are matched by equality, so `T` must equal itself after a trip
    /// through the document codec.
    fn apply_remote(&self, value: T) {
        {
            let mut pending = lock(&self.pending);
            match pending.iter().position(|p| *p.value == value) {
                Some(pos) => {
                    // Own echo: everything issued up to it has landed
                    pending.drain(..=pos);
                    if !pending.is_empty() {
                        tracing::trace!(path = %self.path, in_flight = pending.len(), "Stale own echo skipped");
                        return;
                    }
                }
                // Foreign value: echoes of already-written values are superseded
                None => pending.retain(|p| !p.written),
            }
        }
        self.state.send_if_modified(|current| {
            if **current == value {
                false
            } else {
                *current = Arc::new(value);
                true
            }
        });
    }
}

impl<T> Drop for StoreInner<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Local state of type `T` mirrored to one remote path
pub struct SyncedStore<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for SyncedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> std::fmt::Debug for SyncedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedStore")
            .field("path", &self.inner.path)
            .field("ready", &*self.inner.ready.borrow())
            .finish()
    }
}

impl<T> SyncedStore<T>
where
    T: Serialize + DeserializeOwned + PartialEq + Send + Sync + 'static,
{
    /// Bind local state to `path`, starting from `initial`.
    ///
    /// Must be called inside a Tokio runtime: spawns the writer and listener
    /// tasks. Until the first remote notification arrives, readers see
    /// `initial`.
    pub fn connect(remote: Arc<dyn RemoteStore>, path: impl Into<String>, initial: T) -> Self {
        Self::connect_with_state(remote, path, initial, None)
    }

    /// Like [`connect`](Self::connect), but readers start from `cached`
    /// (e.g., the last snapshot saved on this device). Seeding still uses
    /// `initial`.
    pub fn connect_with_state(
        remote: Arc<dyn RemoteStore>,
        path: impl Into<String>,
        initial: T,
        cached: Option<T>,
    ) -> Self {
        let path = path.into();
        let initial = Arc::new(initial);
        let start = cached.map(Arc::new).unwrap_or_else(|| initial.clone());

        let (state, _) = watch::channel(start);
        let (ready, _) = watch::channel(false);
        let (outbound, rx) = mpsc::unbounded_channel();
        let pending: PendingWrites<T> = Arc::default();
        let shutdown = CancellationToken::new();

        let inner = Arc::new(StoreInner {
            path: path.clone(),
            initial,
            state,
            ready,
            outbound,
            pending: pending.clone(),
            shutdown: shutdown.clone(),
        });

        tokio::spawn(run_writer(remote.clone(), path.clone(), rx, pending));
        tokio::spawn(run_listener(Arc::downgrade(&inner), remote, path, shutdown));

        Self { inner }
    }

    /// Remote path this store is bound to
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Current local value
    pub fn get(&self) -> Arc<T> {
        self.inner.state.borrow().clone()
    }

    /// Change feed; the receiver sees the current value immediately
    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.inner.state.subscribe()
    }

    /// Whether the first remote notification has been processed
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.borrow()
    }

    /// Wait for the first remote notification.
    pub async fn wait_ready(&self) {
        let mut rx = self.inner.ready.subscribe();
        // Sender lives in `inner`, which we hold; wait_for cannot fail here
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Replace the local value and push it to the remote.
    pub fn set(&self, value: T) {
        let value = Arc::new(value);
        self.inner.state.send_replace(value.clone());
        self.inner.push(value);
    }

    /// Derive a new value from the current one and push it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let _ = self.try_update(|current| Ok::<_, Infallible>(Some(f(current))));
    }

    /// Fallible update.
    ///
    /// `Ok(Some(next))` writes `next`, `Ok(None)` leaves state untouched and
    /// writes nothing, `Err` aborts. Returns whether a write happened.
    ///
    /// The closure runs under the state lock; it must not call back into
    /// this store.
    pub fn try_update<E>(&self, f: impl FnOnce(&T) -> Result<Option<T>, E>) -> Result<bool, E> {
        let mut outcome: Result<Option<Arc<T>>, E> = Ok(None);
        self.inner.state.send_if_modified(|current| match f(current.as_ref()) {
            Ok(Some(next)) => {
                let next = Arc::new(next);
                *current = next.clone();
                outcome = Ok(Some(next));
                true
            }
            Ok(None) => false,
            Err(e) => {
                outcome = Err(e);
                false
            }
        });

        match outcome? {
            Some(next) => {
                self.inner.push(next);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn settle(&self) {
        let (tx, rx) = oneshot::channel();
        if self.inner.outbound.send(Outbound::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Token cancelled when the store shuts down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    /// Stop listening for remote changes. Queued writes still drain.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

async fn run_writer<T: Serialize>(
    remote: Arc<dyn RemoteStore>,
    path: String,
    mut rx: mpsc::UnboundedReceiver<Outbound<T>>,
    pending: PendingWrites<T>,
) {
    while let Some(message) = rx.recv().await {
        match message {
            Outbound::Write(value) => {
                let doc = match document::sanitize(value.as_ref()) {
                    Ok(doc) => doc,
                    Err(e) => {
                        tracing::error!(path = %path, error = %e, "Failed to encode state");
                        settle_pending(&pending, &value, false);
                        continue;
                    }
                };
                let written = match remote.write(&path, doc).await {
                    Ok(()) => {
                        tracing::trace!(path = %path, "Remote write ok");
                        true
                    }
                    Err(e) => {
                        tracing::error!(path = %path, error = %e, "Remote write failed; local state kept");
                        false
                    }
                };
                settle_pending(&pending, &value, written);
            }
            Outbound::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    tracing::debug!(path = %path, "Writer stopped");
}

async fn run_listener<T>(
    inner: Weak<StoreInner<T>>,
    remote: Arc<dyn RemoteStore>,
    path: String,
    shutdown: CancellationToken,
) where
    T: DeserializeOwned + PartialEq + Send + Sync + 'static,
{
    let mut delay = RECONNECT_MIN;

    loop {
        let watch = tokio::select! {
            _ = shutdown.cancelled() => break,
            watch = remote.watch(&path) => watch,
        };

        match watch {
            Ok(mut stream) => {
                tracing::debug!(path = %path, "Remote watch open");
                loop {
                    let next = tokio::select! {
                        _ = shutdown.cancelled() => return,
                        next = stream.next() => next,
                    };
                    let Some(next) = next else {
                        tracing::warn!(path = %path, "Remote watch ended");
                        break;
                    };
                    let Some(inner) = inner.upgrade() else {
                        return;
                    };
                    match next {
                        Ok(Some(doc)) => match document::revive::<T>(doc) {
                            Ok(value) => inner.apply_remote(value),
                            Err(e) => {
                                tracing::warn!(path = %path, error = %e, "Undecodable remote value; seeding");
                                inner.seed();
                            }
                        },
                        Ok(None) => {
                            tracing::info!(path = %path, "Remote path empty; seeding initial value");
                            inner.seed();
                        }
                        Err(e) => {
                            tracing::error!(path = %path, error = %e, "Remote notification failed");
                        }
                    }
                    inner.ready.send_replace(true);
                    delay = RECONNECT_MIN;
                }
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Remote subscribe failed; serving local state");
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = (delay * 2).min(RECONNECT_MAX);
    }
    tracing::debug!(path = %path, "Listener stopped");
}
