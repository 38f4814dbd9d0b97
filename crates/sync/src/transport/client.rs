//! The reconnecting event-stream client.
//!
//! Owns exactly one socket. Inbound text frames parse as envelopes and route
//! by tag to whichever handler is registered at dispatch time, so replacing
//! the handler map takes effect for the very next frame - a stale closure
//! can never fire. Network failures never surface beyond the connectivity
//! flag; the read loop closes, waits [`RETRY_DELAY`](super::RETRY_DELAY),
//! and connects again, forever.

use std::sync::{Arc, Mutex, RwLock};

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use url::Url;

use haven_protocol::Envelope;

use super::{HandlerMap, RETRY_DELAY};

/// WebSocket client for the server's event endpoint.
pub struct EventStreamClient {
    url: Url,
    handlers: Arc<RwLock<HandlerMap>>,
    connected_tx: watch::Sender<bool>,
    connected_rx: watch::Receiver<bool>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EventStreamClient {
    /// Build a client around the event endpoint URL and an initial handler
    /// map. Nothing connects until [`connect`](Self::connect).
    pub fn new(url: Url, handlers: HandlerMap) -> Self {
        let (connected_tx, connected_rx) = watch::channel(false);
        Self {
            url,
            handlers: Arc::new(RwLock::new(handlers)),
            connected_tx,
            connected_rx,
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
        }
    }

    /// Spawn the connection task. Idempotent: a second call while the task
    /// is alive is a no-op.
    pub fn connect(&self) {
        let mut task = lock(&self.task);
        if let Some(handle) = task.as_ref() {
            if !handle.is_finished() {
                return;
            }
        }

        let url = self.url.clone();
        let handlers = Arc::clone(&self.handlers);
        let connected = self.connected_tx.clone();
        let cancel = self.cancel.clone();
        *task = Some(tokio::spawn(run(url, handlers, connected, cancel)));
    }

    /// Whether a connection is currently established. This flag is the sole
    /// connectivity signal exposed to consumers.
    pub fn is_connected(&self) -> bool {
        *self.connected_rx.borrow()
    }

    /// Watch connectivity transitions (for a Live/Disconnected indicator).
    pub fn connectivity(&self) -> watch::Receiver<bool> {
        self.connected_rx.clone()
    }

    /// Replace the whole handler map. Frames already in flight dispatch to
    /// the new map; previously registered handlers never fire again.
    pub fn set_handlers(&self, handlers: HandlerMap) {
        *write_lock(&self.handlers) = handlers;
    }

    /// Tear down: cancel any pending reconnect, close a live socket, and
    /// guarantee no further connect attempts.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = lock(&self.task).take();
        if let Some(handle) = task {
            let _ = handle.await;
        }
        let _ = self.connected_tx.send(false);
    }
}

/// Connection loop: connect, read until close, wait the fixed delay, repeat.
async fn run(
    url: Url,
    handlers: Arc<RwLock<HandlerMap>>,
    connected: watch::Sender<bool>,
    cancel: CancellationToken,
) {
    loop {
        match connect_async(url.as_str()).await {
            Ok((mut stream, _)) => {
                tracing::info!(%url, "event stream connected");
                let _ = connected.send(true);

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            let _ = stream.close(None).await;
                            let _ = connected.send(false);
                            return;
                        }
                        frame = stream.next() => match frame {
                            Some(Ok(Message::Text(text))) => dispatch(&handlers, &text),
                            Some(Ok(Message::Close(_))) => {
                                tracing::info!("server closed event stream");
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(error)) => {
                                // Force-close; the reconnect cycle is the
                                // only error report consumers get.
                                tracing::error!(%error, "event stream error");
                                break;
                            }
                            None => break,
                        }
                    }
                }

                let _ = connected.send(false);
            }
            Err(error) => {
                tracing::warn!(%url, %error, "event stream connect failed");
            }
        }

        // Exactly one reconnect attempt per close, after a fixed delay.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(RETRY_DELAY) => {}
        }
    }
}

/// Parse a text frame and route it to the currently registered handler.
///
/// Malformed frames are logged and dropped; they never affect the
/// connection. Tags without a handler are dropped silently.
fn dispatch(handlers: &RwLock<HandlerMap>, text: &str) {
    let envelope = match Envelope::parse(text) {
        Ok(envelope) => envelope,
        Err(error) => {
            tracing::warn!(%error, "dropping malformed frame");
            return;
        }
    };

    let handlers = read_lock(handlers);
    if let Some(handler) = handlers.get(&envelope.event_type) {
        handler(envelope);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}
