//! Best-effort domain event publishing.
//!
//! Events flow through a bounded in-process queue drained by a background
//! flush task:
//!
//! ```text
//! handler ──publish()──► mpsc (bounded) ──► flush task ──► EventSink
//! ```
//!
//! `publish` waits for queue space (bounded wait) and returns without
//! waiting for broker acknowledgment. A publish that cannot be enqueued is
//! logged and dropped; it never fails the enclosing request. Delivery is
//! fire-and-forget: the sink logs failures and moves on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use deadpool_redis::Pool;
use redis::AsyncCommands;

use parcelhub_core::Username;

/// Topic for user registration events.
pub const USER_CREATED_TOPIC: &str = "user created";

/// A structured domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Destination topic.
    pub topic: String,
    /// Partitioning/identity key.
    pub key: Vec<u8>,
    /// JSON payload.
    pub payload: serde_json::Value,
}

impl DomainEvent {
    /// Event emitted after a user is registered.
    ///
    /// Key is the username bytes; payload carries the username and an
    /// ISO-8601 timestamp.
    #[must_use]
    pub fn user_created(username: &Username, timestamp: DateTime<Utc>) -> Self {
        Self {
            topic: USER_CREATED_TOPIC.to_owned(),
            key: username.as_bytes().to_vec(),
            payload: serde_json::json!({
                "username": username,
                "timestamp": timestamp.to_rfc3339(),
            }),
        }
    }
}

/// Handle for enqueueing domain events.
///
/// Cheap to clone; all clones feed the same queue.
#[derive(Clone)]
pub struct EventPublisher {
    tx: mpsc::Sender<DomainEvent>,
}

impl EventPublisher {
    /// Create a publisher and the receiving end of its queue.
    ///
    /// The receiver is handed to [`spawn_flush`]; tests may keep it to
    /// observe published events directly.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<DomainEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueue an event, waiting for buffer space if the queue is full.
    ///
    /// Never returns an error: if the queue is closed the event is logged
    /// and dropped, because publishing is a side effect and must not abort
    /// the enclosing request.
    pub async fn publish(&self, event: DomainEvent) {
        let topic = event.topic.clone();
        if self.tx.send(event).await.is_err() {
            tracing::warn!(topic = %topic, "event queue closed, dropping event");
        }
    }
}

/// Delivery target for flushed events.
pub enum EventSink {
    /// Publish to a Redis pub/sub channel named by the event topic.
    Redis(Pool),
    /// Log-only sink for single-instance deployments without a broker.
    Log,
}

/// Wire format: Redis pub/sub has no per-message key, so the key rides
/// inside the message next to the payload.
#[derive(Serialize)]
struct WireEvent<'a> {
    key: String,
    value: &'a serde_json::Value,
}

impl EventSink {
    async fn deliver(&self, event: &DomainEvent) {
        match self {
            Self::Log => {
                tracing::info!(topic = %event.topic, payload = %event.payload, "event published");
            }
            Self::Redis(pool) => {
                let mut conn = match pool.get().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to get Redis connection for event publish");
                        return;
                    }
                };

                let wire = WireEvent {
                    key: String::from_utf8_lossy(&event.key).into_owned(),
                    value: &event.payload,
                };
                let message = match serde_json::to_string(&wire) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to serialize event");
                        return;
                    }
                };

                if let Err(e) = conn.publish::<_, _, ()>(&event.topic, &message).await {
                    tracing::warn!(topic = %event.topic, error = %e, "Redis PUBLISH error");
                } else {
                    tracing::debug!(topic = %event.topic, "event published");
                }
            }
        }
    }
}

/// Spawn the background task that drains the queue into the sink.
///
/// The task ends when every publisher clone has been dropped.
pub fn spawn_flush(mut rx: mpsc::Receiver<DomainEvent>, sink: EventSink) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            sink.deliver(&event).await;
        }
        tracing::debug!("event queue drained, flush task exiting");
    })
}
