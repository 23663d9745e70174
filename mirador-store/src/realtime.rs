use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Logical channel the external booking system pushes order changes on.
pub const ORDERS_CHANNEL: &str = "orders-changes";
/// Logical channel it pushes proposal changes on.
pub const PROPOSALS_CHANNEL: &str = "proposals-changes";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// Raw change notification as it arrives on the wire. Inserts and updates
/// carry a post-image in `new_row`, deletes a pre-image in `old_row`; the
/// sender may include either, both, or (uselessly) neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowChange {
    pub op: ChangeOp,
    #[serde(default)]
    pub new_row: Option<serde_json::Value>,
    #[serde(default)]
    pub old_row: Option<serde_json::Value>,
}

/// Uniform notification delivered to subscribers after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub op: ChangeOp,
    pub row_id: String,
    pub row: serde_json::Value,
}

impl RowChange {
    /// Pick the image that describes the row after this change: the
    /// post-image for inserts and updates, the pre-image for deletes,
    /// falling back to the other one when the preferred image is missing.
    /// Returns `None` when no image carries a row id.
    pub fn normalize(self) -> Option<ChangeEvent> {
        let row = match self.op {
            ChangeOp::Insert | ChangeOp::Update => self.new_row.or(self.old_row),
            ChangeOp::Delete => self.old_row.or(self.new_row),
        }?;
        let row_id = row_id_of(&row)?;
        Some(ChangeEvent {
            op: self.op,
            row_id,
            row,
        })
    }
}

fn row_id_of(row: &serde_json::Value) -> Option<String> {
    let id = row.get("id")?;
    id.as_str()
        .map(str::to_string)
        .or_else(|| id.as_i64().map(|n| n.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("publish failed: {0}")]
    Publish(String),
}

/// Transport-level channel access. The production implementation rides
/// Redis pub/sub; tests use the in-memory one.
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Start listening on a channel and stream its raw payloads.
    async fn open(
        &self,
        channel: &str,
    ) -> Result<mpsc::UnboundedReceiver<serde_json::Value>, RealtimeError>;

    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), RealtimeError>;
}

/// Subscription registry enforcing at most one live subscription per
/// channel name, independent of the underlying transport.
pub struct ChannelManager {
    transport: Arc<dyn RealtimeTransport>,
    subs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ChannelManager {
    pub fn new(transport: Arc<dyn RealtimeTransport>) -> Self {
        Self {
            transport,
            subs: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe a callback to a channel. Any existing subscription for
    /// the same name is torn down first.
    pub async fn subscribe<F>(&self, channel: &str, callback: F) -> Result<(), RealtimeError>
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.unsubscribe(channel);

        let mut rx = self.transport.open(channel).await?;
        let channel_name = channel.to_string();
        let handle = tokio::spawn(async move {
            while let Some(raw) = rx.recv().await {
                match serde_json::from_value::<RowChange>(raw) {
                    Ok(change) => {
                        if let Some(event) = change.normalize() {
                            callback(event);
                        }
                    }
                    Err(err) => {
                        warn!("Dropping malformed change on {}: {}", channel_name, err);
                    }
                }
            }
        });

        self.lock_subs().insert(channel.to_string(), handle);
        Ok(())
    }

    /// Tear down one channel's subscription; false when none was live.
    pub fn unsubscribe(&self, channel: &str) -> bool {
        match self.lock_subs().remove(channel) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Tear down every subscription. Safe to call with none live.
    pub fn unsubscribe_all(&self) {
        for (_, handle) in self.lock_subs().drain() {
            handle.abort();
        }
    }

    pub fn active_channels(&self) -> Vec<String> {
        self.lock_subs().keys().cloned().collect()
    }

    /// Best-effort outbound notification; callers decide whether a
    /// delivery failure matters.
    pub async fn broadcast(
        &self,
        channel: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), RealtimeError> {
        self.transport.publish(channel, event, payload).await
    }

    fn lock_subs(&self) -> std::sync::MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.subs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process transport used by tests and the demo wiring. Payloads pushed
/// with [`InMemoryTransport::deliver`] fan out to every open receiver for
/// that channel; published envelopes are recorded for inspection.
#[derive(Default)]
pub struct InMemoryTransport {
    listeners: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<serde_json::Value>>>>,
    published: Mutex<Vec<(String, serde_json::Value)>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&self, channel: &str, payload: serde_json::Value) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(senders) = listeners.get_mut(channel) {
            senders.retain(|tx| tx.send(payload.clone()).is_ok());
        }
    }

    pub fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RealtimeTransport for InMemoryTransport {
    async fn open(
        &self,
        channel: &str,
    ) -> Result<mpsc::UnboundedReceiver<serde_json::Value>, RealtimeError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(channel.to_string())
            .or_default()
            .push(tx);
        Ok(rx)
    }

    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), RealtimeError> {
        let envelope = serde_json::json!({ "event": event, "payload": payload });
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((channel.to_string(), envelope.clone()));
        self.deliver(channel, envelope);
        Ok(())
    }
}
