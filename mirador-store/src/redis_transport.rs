use crate::realtime::{RealtimeError, RealtimeTransport};
use async_trait::async_trait;
use futures_util::StreamExt;
use redis::AsyncCommands;
use tokio::sync::mpsc;
use tracing::warn;

/// Redis pub/sub transport for the real-time channels shared with the
/// external booking system.
pub struct RedisTransport {
    client: redis::Client,
}

impl RedisTransport {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RealtimeTransport for RedisTransport {
    async fn open(
        &self,
        channel: &str,
    ) -> Result<mpsc::UnboundedReceiver<serde_json::Value>, RealtimeError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| RealtimeError::Subscribe(e.to_string()))?;
        pubsub
            .subscribe(channel)
            .await
            .map_err(|e| RealtimeError::Subscribe(e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let channel_name = channel.to_string();
        tokio::spawn(async move {
            let mut stream = pubsub.into_on_message();
            while let Some(msg) = stream.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(err) => {
                        warn!("Unreadable payload on {}: {}", channel_name, err);
                        continue;
                    }
                };
                match serde_json::from_str::<serde_json::Value>(&payload) {
                    Ok(value) => {
                        if tx.send(value).is_err() {
                            // Receiver gone, the subscription was torn down
                            break;
                        }
                    }
                    Err(err) => warn!("Non-JSON payload on {}: {}", channel_name, err),
                }
            }
        });

        Ok(rx)
    }

    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), RealtimeError> {
        let envelope = serde_json::json!({ "event": event, "payload": payload });
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RealtimeError::Publish(e.to_string()))?;
        conn.publish::<_, _, ()>(channel, envelope.to_string())
            .await
            .map_err(|e| RealtimeError::Publish(e.to_string()))?;
        Ok(())
    }
}
