use crate::error::StoreError;
use crate::proposal::{NewProposal, Proposal, ProposalStatus};
use crate::reservation::Reservation;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for proposal persistence.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Persist a new proposal and return the stored record.
    async fn create(&self, payload: NewProposal) -> Result<Proposal, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>, StoreError>;

    async fn update_status(&self, id: Uuid, status: ProposalStatus) -> Result<Proposal, StoreError>;

    async fn list_for_order(&self, order_id: &str) -> Result<Vec<Proposal>, StoreError>;

    /// Mark every proposal past its expiry as expired, returning how many
    /// rows changed.
    async fn expire_overdue(&self) -> Result<u64, StoreError>;
}

/// Repository trait for the booking roster.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Reservation>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Reservation>, StoreError>;

    /// The roster is only ever mutated wholesale; there is no per-field
    /// update path at this layer.
    async fn replace_all(&self, rows: Vec<Reservation>) -> Result<(), StoreError>;
}
