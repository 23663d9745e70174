use async_trait::async_trait;
use chrono::Utc;
use mirador_core::proposal::{NewProposal, Proposal, ProposalStatus};
use mirador_core::repository::{ProposalRepository, ReservationRepository};
use mirador_core::reservation::Reservation;
use mirador_core::StoreError;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// In-memory proposal store. Backs tests and the no-database demo mode;
/// honors the same failure envelope as the Postgres repository.
#[derive(Default)]
pub struct InMemoryProposalRepository {
    rows: Mutex<HashMap<Uuid, Proposal>>,
    fail_writes: bool,
}

impl InMemoryProposalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose writes always fail, for exercising the error
    /// envelope end to end.
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Proposal>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProposalRepository for InMemoryProposalRepository {
    async fn create(&self, payload: NewProposal) -> Result<Proposal, StoreError> {
        if self.fail_writes {
            return Err(StoreError::InsertFailed("insert failed".to_string()));
        }
        let proposal = Proposal::from_payload(payload);
        self.lock().insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>, StoreError> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn update_status(&self, id: Uuid, status: ProposalStatus) -> Result<Proposal, StoreError> {
        if self.fail_writes {
            return Err(StoreError::UpdateFailed("update failed".to_string()));
        }
        let mut rows = self.lock();
        match rows.get_mut(&id) {
            Some(proposal) => {
                proposal.status = status;
                Ok(proposal.clone())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn list_for_order(&self, order_id: &str) -> Result<Vec<Proposal>, StoreError> {
        let mut rows: Vec<Proposal> = self
            .lock()
            .values()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn expire_overdue(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut expired = 0;
        for proposal in self.lock().values_mut() {
            let sweepable = matches!(
                proposal.status,
                ProposalStatus::Pending | ProposalStatus::PendingHotel
            );
            if sweepable && proposal.expires_at < now {
                proposal.status = ProposalStatus::Expired;
                expired += 1;
            }
        }
        Ok(expired)
    }
}

/// In-memory booking roster.
#[derive(Default)]
pub struct InMemoryReservationRepository {
    rows: Mutex<Vec<Reservation>>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Reservation>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Reservation>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn list(&self) -> Result<Vec<Reservation>, StoreError> {
        Ok(self.lock().clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Reservation>, StoreError> {
        Ok(self.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn replace_all(&self, rows: Vec<Reservation>) -> Result<(), StoreError> {
        *self.lock() = rows;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload(order_id: &str, hours_from_now: i64) -> NewProposal {
        NewProposal {
            order_id: order_id.to_string(),
            kind: "upgrade".to_string(),
            title: "Suite vista mar".to_string(),
            description: Some("Planta 5".to_string()),
            price_difference_cents: 4500,
            original_item_id: Some("room-std".to_string()),
            proposed_item: serde_json::json!({"room": "501"}),
            expires_at: Utc::now() + Duration::hours(hours_from_now),
        }
    }

    #[tokio::test]
    async fn test_create_then_update_status() {
        let repo = InMemoryProposalRepository::new();
        let created = repo.create(payload("ord-1", 48)).await.unwrap();
        assert_eq!(created.status, ProposalStatus::Pending);

        let updated = repo
            .update_status(created.id, ProposalStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(updated.status, ProposalStatus::Accepted);

        let missing = repo
            .update_status(Uuid::new_v4(), ProposalStatus::Accepted)
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failing_repo_returns_insert_failed() {
        let repo = InMemoryProposalRepository::failing();
        let result = repo.create(payload("ord-1", 48)).await;
        assert!(matches!(result, Err(StoreError::InsertFailed(_))));
    }

    #[tokio::test]
    async fn test_expire_overdue_only_touches_pending() {
        let repo = InMemoryProposalRepository::new();
        let stale = repo.create(payload("ord-1", -1)).await.unwrap();
        let fresh = repo.create(payload("ord-1", 48)).await.unwrap();
        let accepted = repo.create(payload("ord-2", -1)).await.unwrap();
        repo.update_status(accepted.id, ProposalStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(repo.expire_overdue().await.unwrap(), 1);
        assert_eq!(
            repo.get(stale.id).await.unwrap().unwrap().status,
            ProposalStatus::Expired
        );
        assert_eq!(
            repo.get(fresh.id).await.unwrap().unwrap().status,
            ProposalStatus::Pending
        );
        assert_eq!(
            repo.get(accepted.id).await.unwrap().unwrap().status,
            ProposalStatus::Accepted
        );
    }

    #[tokio::test]
    async fn test_list_for_order_newest_first() {
        let repo = InMemoryProposalRepository::new();
        repo.create(payload("ord-1", 48)).await.unwrap();
        repo.create(payload("ord-1", 48)).await.unwrap();
        repo.create(payload("ord-2", 48)).await.unwrap();

        let rows = repo.list_for_order("ord-1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].created_at >= rows[1].created_at);
    }
}
