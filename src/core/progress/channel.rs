//! Progress channel: push stream with a polling fallback.
//!
//! Each `connect()` creates a fresh connection with its own event queue
//! and a single task running the chosen transport. Disconnecting aborts
//! that task, so a superseded connection can never deliver into a newer
//! one.

use super::ScanProgress;
use crate::core::backend::{PushConnector, PushStream, StatusSource};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// How progress is currently being received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// Live push stream
    Push,
    /// Periodic status requests
    Poll,
}

/// The single consumer end of a connection
#[derive(Debug)]
pub struct ProgressSubscription {
    inner: mpsc::UnboundedReceiver<ScanProgress>,
}

impl ProgressSubscription {
    /// Wait for the next event
    ///
    /// Returns `None` once the connection has ended (terminal event
    /// delivered, polling gave up, or disconnected).
    pub async fn recv(&mut self) -> Option<ScanProgress> {
        self.inner.recv().await
    }
}

struct Connection {
    task: JoinHandle<()>,
    transport: watch::Receiver<Transport>,
    events: Option<ProgressSubscription>,
}

/// Maintains the live connection to the job's progress.
pub struct ProgressChannel {
    poll_interval: Duration,
    connection: Option<Connection>,
}

impl ProgressChannel {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            connection: None,
        }
    }

    /// Connect to the progress stream, falling back to polling.
    ///
    /// Any previous connection is torn down first. Returns the transport
    /// chosen by the connection attempt.
    pub async fn connect(
        &mut self,
        push: Arc<dyn PushConnector>,
        status: Arc<dyn StatusSource>,
    ) -> Transport {
        self.disconnect();

        let (tx, rx) = mpsc::unbounded_channel();
        let interval = self.poll_interval;

        let (transport, task) = match push.open().await {
            Ok(stream) => {
                let (transport_tx, transport_rx) = watch::channel(Transport::Push);
                let task = tokio::spawn(run_push(stream, tx, transport_tx, status, interval));
                (transport_rx, task)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Progress stream unavailable, polling status instead");
                let (_transport_tx, transport_rx) = watch::channel(Transport::Poll);
                let task = tokio::spawn(run_poll(status, tx, interval));
                (transport_rx, task)
            }
        };

        let chosen = *transport.borrow();
        self.connection = Some(Connection {
            task,
            transport,
            events: Some(ProgressSubscription { inner: rx }),
        });
        chosen
    }

    /// Take the event stream of the current connection.
    ///
    /// There is exactly one consumer per connection; later calls return
    /// `None`.
    pub fn subscribe(&mut self) -> Option<ProgressSubscription> {
        self.connection.as_mut().and_then(|c| c.events.take())
    }

    /// The transport currently in use, if connected
    pub fn transport(&self) -> Option<Transport> {
        self.connection.as_ref().map(|c| *c.transport.borrow())
    }

    /// Whether the transport task is still running
    pub fn is_active(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|c| !c.task.is_finished())
    }

    /// Tear down the current connection. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.task.abort();
            tracing::debug!("Progress channel disconnected");
        }
    }
}

impl Drop for ProgressChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for ProgressChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressChannel")
            .field("poll_interval", &self.poll_interval)
            .field("transport", &self.transport())
            .finish()
    }
}

async fn run_push(
    mut stream: PushStream,
    tx: mpsc::UnboundedSender<ScanProgress>,
    transport: watch::Sender<Transport>,
    status: Arc<dyn StatusSource>,
    interval: Duration,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(text) => match ScanProgress::from_push_frame(&text) {
                Ok(event) => {
                    let terminal = event.stage.is_terminal();
                    if tx.send(event).is_err() || terminal {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable progress frame");
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Progress stream lost");
                break;
            }
        }
    }

    // Stream ended before a terminal event
    drop(stream);
    tracing::warn!("Falling back to status polling");
    transport.send_replace(Transport::Poll);
    run_poll(status, tx, interval).await;
}

async fn run_poll(
    status: Arc<dyn StatusSource>,
    tx: mpsc::UnboundedSender<ScanProgress>,
    interval: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let event = match status.scan_status().await {
            Ok(response) => ScanProgress::from(response),
            Err(e) => {
                // Without the job context a retry is not meaningful
                tracing::debug!(error = %e, "Status poll failed, polling stopped");
                return;
            }
        };

        let terminal = event.stage.is_terminal();
        if tx.send(event).is_err() || terminal {
            return;
        }
    }
}
