use crate::realtime::{
    ChangeEvent, ChannelManager, RealtimeError, ORDERS_CHANNEL, PROPOSALS_CHANNEL,
};
use mirador_core::proposal::{NewProposal, Proposal, ProposalStatus};
use mirador_core::repository::ProposalRepository;
use mirador_core::StoreError;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Synchronizes proposals between the front desk and the external booking
/// system: persists them, pushes best-effort notifications out, and
/// surfaces the system's own change feed back to the caller.
pub struct SyncBridge {
    repo: Arc<dyn ProposalRepository>,
    channels: ChannelManager,
}

impl SyncBridge {
    pub fn new(repo: Arc<dyn ProposalRepository>, channels: ChannelManager) -> Self {
        Self { repo, channels }
    }

    /// Persist a proposal, then notify the order's channel. Persistence
    /// failures come back to the caller; a failed notification is only
    /// logged, the proposal is already stored.
    pub async fn create_proposal(&self, payload: NewProposal) -> Result<Proposal, StoreError> {
        let proposal = self.repo.create(payload).await?;
        info!(
            "Proposal {} created for order {}",
            proposal.id, proposal.order_id
        );

        let channel = order_channel(&proposal.order_id);
        let body = serde_json::to_value(&proposal).unwrap_or(serde_json::Value::Null);
        if let Err(err) = self
            .channels
            .broadcast(&channel, "proposal_created", body)
            .await
        {
            warn!("Proposal broadcast on {} failed: {}", channel, err);
        }

        Ok(proposal)
    }

    pub async fn update_proposal_status(
        &self,
        id: Uuid,
        status: ProposalStatus,
    ) -> Result<Proposal, StoreError> {
        self.repo.update_status(id, status).await
    }

    /// Purge proposals whose expiry has passed.
    pub async fn sweep_expired(&self) -> Result<u64, StoreError> {
        let swept = self.repo.expire_overdue().await?;
        if swept > 0 {
            info!("Expired {} overdue proposals", swept);
        }
        Ok(swept)
    }

    /// Follow the external system's order change feed. Re-subscribing
    /// replaces any previous order subscription.
    pub async fn watch_orders<F>(&self, callback: F) -> Result<(), RealtimeError>
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.channels.subscribe(ORDERS_CHANNEL, callback).await
    }

    /// Follow the external system's proposal change feed.
    pub async fn watch_proposals<F>(&self, callback: F) -> Result<(), RealtimeError>
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.channels.subscribe(PROPOSALS_CHANNEL, callback).await
    }

    /// Tear down both change feeds. Safe when nothing is subscribed.
    pub fn unsubscribe_all(&self) {
        self.channels.unsubscribe_all();
    }
}

fn order_channel(order_id: &str) -> String {
    format!("order:{order_id}:proposals")
}
