use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_BID_EXPIRY_HOURS: i64 = 24;

/// Bid lifecycle status. Acceptance and rejection are written by the
/// external approval workflow; this layer only ever moves a bid to
/// `Cancelled` or updates its price in place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

/// A price offer for a room upgrade, distinct from a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidItem {
    pub id: Uuid,
    pub room_id: String,
    pub room_name: String,
    pub original_price_cents: i64,
    pub bid_price_cents: i64,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl BidItem {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BidError {
    #[error("bid request failed")]
    RequestFailed,
}

/// The network round trip a bid operation rides on. The production
/// implementation talks to the external booking system; here the link is
/// simulated with a bounded delay and an injectable failure rate.
#[async_trait]
pub trait BidLink: Send + Sync {
    async fn round_trip(&self) -> Result<(), BidError>;
}

pub struct SimulatedLink {
    pub latency: std::time::Duration,
    pub failure_rate: f64,
}

impl Default for SimulatedLink {
    fn default() -> Self {
        Self {
            latency: std::time::Duration::from_millis(150),
            failure_rate: 0.0,
        }
    }
}

#[async_trait]
impl BidLink for SimulatedLink {
    async fn round_trip(&self) -> Result<(), BidError> {
        tokio::time::sleep(self.latency).await;
        if self.failure_rate > 0.0 && rand::random::<f64>() < self.failure_rate {
            return Err(BidError::RequestFailed);
        }
        Ok(())
    }
}

/// Collection of upgrade bids for the active session.
///
/// Uniqueness per room is not enforced on insert; [`BidBook::bid_by_room`]
/// treats the first non-cancelled bid as the active one and callers are
/// expected to check before creating a duplicate.
pub struct BidBook {
    link: Arc<dyn BidLink>,
    bids: Vec<BidItem>,
    last_error: Option<String>,
    expiry_hours: i64,
}

impl BidBook {
    pub fn new(link: Arc<dyn BidLink>) -> Self {
        Self {
            link,
            bids: Vec::new(),
            last_error: None,
            expiry_hours: DEFAULT_BID_EXPIRY_HOURS,
        }
    }

    pub fn with_expiry_hours(mut self, hours: i64) -> Self {
        self.expiry_hours = hours;
        self
    }

    /// Create a pending bid for a room. The simulated round trip may
    /// fail; the failure is recorded on the book and returned.
    pub async fn submit_bid(
        &mut self,
        room_id: impl Into<String>,
        room_name: impl Into<String>,
        original_price_cents: i64,
        bid_price_cents: i64,
    ) -> Result<Uuid, BidError> {
        self.round_trip().await?;

        let room_id = room_id.into();
        let now = Utc::now();
        let bid = BidItem {
            id: Uuid::new_v4(),
            room_id: room_id.clone(),
            room_name: room_name.into(),
            original_price_cents,
            bid_price_cents,
            status: BidStatus::Pending,
            created_at: now,
            expires_at: now + Duration::hours(self.expiry_hours),
        };
        let id = bid.id;
        self.bids.push(bid);
        tracing::info!("Bid {} submitted for room {}", id, room_id);
        Ok(id)
    }

    /// Move a bid to cancelled. Unknown ids are a no-op.
    pub async fn cancel_bid(&mut self, bid_id: Uuid) -> Result<(), BidError> {
        self.round_trip().await?;

        if let Some(bid) = self.bids.iter_mut().find(|b| b.id == bid_id) {
            bid.status = BidStatus::Cancelled;
        }
        Ok(())
    }

    /// Overwrite a bid's price in place. Status and expiry are untouched;
    /// unknown ids are a no-op.
    pub async fn update_bid(&mut self, bid_id: Uuid, new_price_cents: i64) -> Result<(), BidError> {
        self.round_trip().await?;

        if let Some(bid) = self.bids.iter_mut().find(|b| b.id == bid_id) {
            bid.bid_price_cents = new_price_cents;
        }
        Ok(())
    }

    pub fn bids_by_status(&self, status: BidStatus) -> Vec<&BidItem> {
        self.bids.iter().filter(|b| b.status == status).collect()
    }

    /// The active bid for a room, if any. Cancelled bids never count.
    pub fn bid_by_room(&self, room_id: &str) -> Option<&BidItem> {
        self.bids
            .iter()
            .find(|b| b.room_id == room_id && b.status != BidStatus::Cancelled)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Drop pending bids whose expiry has passed; returns how many were
    /// removed.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.bids.len();
        self.bids
            .retain(|b| !(b.status == BidStatus::Pending && b.is_expired()));
        before - self.bids.len()
    }

    pub fn active_count(&self) -> usize {
        self.bids
            .iter()
            .filter(|b| b.status == BidStatus::Pending && !b.is_expired())
            .count()
    }

    async fn round_trip(&mut self) -> Result<(), BidError> {
        let result = self.link.clone().round_trip().await;
        match result {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLink;

    #[async_trait]
    impl BidLink for FailingLink {
        async fn round_trip(&self) -> Result<(), BidError> {
            Err(BidError::RequestFailed)
        }
    }

    fn instant_link() -> Arc<SimulatedLink> {
        Arc::new(SimulatedLink {
            latency: std::time::Duration::from_millis(1),
            failure_rate: 0.0,
        })
    }

    #[tokio::test]
    async fn test_submit_then_lookup_by_room() {
        let mut book = BidBook::new(instant_link());
        book.submit_bid("r1", "Deluxe", 10000, 12000).await.unwrap();

        let bid = book.bid_by_room("r1").unwrap();
        assert_eq!(bid.status, BidStatus::Pending);
        assert_eq!(bid.bid_price_cents, 12000);
        assert_eq!(bid.expires_at, bid.created_at + Duration::hours(24));
    }

    #[tokio::test]
    async fn test_lookup_skips_cancelled_bids() {
        let mut book = BidBook::new(instant_link());
        let first = book.submit_bid("r1", "Deluxe", 10000, 11000).await.unwrap();
        let second = book.submit_bid("r1", "Deluxe", 10000, 12000).await.unwrap();

        book.cancel_bid(first).await.unwrap();
        assert_eq!(book.bid_by_room("r1").unwrap().id, second);

        book.cancel_bid(second).await.unwrap();
        assert!(book.bid_by_room("r1").is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_status_and_expiry() {
        let mut book = BidBook::new(instant_link());
        let id = book.submit_bid("r2", "Junior suite", 15000, 16000).await.unwrap();
        let expires_before = book.bid_by_room("r2").unwrap().expires_at;

        book.update_bid(id, 17500).await.unwrap();
        let bid = book.bid_by_room("r2").unwrap();
        assert_eq!(bid.bid_price_cents, 17500);
        assert_eq!(bid.status, BidStatus::Pending);
        assert_eq!(bid.expires_at, expires_before);
    }

    #[tokio::test]
    async fn test_cancel_unknown_id_is_noop() {
        let mut book = BidBook::new(instant_link());
        book.submit_bid("r1", "Deluxe", 10000, 12000).await.unwrap();
        book.cancel_bid(Uuid::new_v4()).await.unwrap();
        assert_eq!(book.bids_by_status(BidStatus::Pending).len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_returned() {
        let mut book = BidBook::new(Arc::new(FailingLink));
        let result = book.submit_bid("r1", "Deluxe", 10000, 12000).await;
        assert!(result.is_err());
        assert_eq!(book.last_error(), Some("bid request failed"));
        assert!(book.bid_by_room("r1").is_none());

        // A later success clears the error state
        book = BidBook::new(instant_link());
        book.submit_bid("r1", "Deluxe", 10000, 12000).await.unwrap();
        assert!(book.last_error().is_none());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_pending() {
        let mut book = BidBook::new(instant_link()).with_expiry_hours(0);
        book.submit_bid("r1", "Deluxe", 10000, 12000).await.unwrap();
        let kept = book
            .submit_bid("r2", "Suite", 20000, 21000)
            .await
            .unwrap();
        if let Some(bid) = book.bids.iter_mut().find(|b| b.id == kept) {
            bid.expires_at = Utc::now() + Duration::hours(1);
        }

        assert_eq!(book.sweep_expired(), 1);
        assert!(book.bid_by_room("r1").is_none());
        assert!(book.bid_by_room("r2").is_some());
        assert_eq!(book.active_count(), 1);
    }
}
