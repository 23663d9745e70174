use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mirador_core::proposal::{NewProposal, Proposal, ProposalStatus};
use mirador_core::repository::ProposalRepository;
use mirador_core::StoreError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::error;
use uuid::Uuid;

pub struct PgProposalRepository {
    pub pool: PgPool,
}

impl PgProposalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: PgRow) -> Result<Proposal, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Proposal {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        kind: row.try_get("kind")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        price_difference_cents: row.try_get("price_difference_cents")?,
        original_item_id: row.try_get("original_item_id")?,
        proposed_item: row.try_get("proposed_item")?,
        status: status.parse().unwrap_or(ProposalStatus::Pending),
        expires_at: row.try_get::<DateTime<Utc>, _>("expires_at")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl ProposalRepository for PgProposalRepository {
    async fn create(&self, payload: NewProposal) -> Result<Proposal, StoreError> {
        let proposal = Proposal::from_payload(payload);

        let result = sqlx::query(
            r#"
            INSERT INTO proposals
                (id, order_id, kind, title, description, price_difference_cents,
                 original_item_id, proposed_item, status, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(proposal.id)
        .bind(&proposal.order_id)
        .bind(&proposal.kind)
        .bind(&proposal.title)
        .bind(&proposal.description)
        .bind(proposal.price_difference_cents)
        .bind(&proposal.original_item_id)
        .bind(&proposal.proposed_item)
        .bind(proposal.status.to_string())
        .bind(proposal.expires_at)
        .bind(proposal.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(proposal),
            Err(err) => {
                error!("Proposal insert failed: {}", err);
                Err(StoreError::InsertFailed(err.to_string()))
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>, StoreError> {
        let row = sqlx::query("SELECT * FROM proposals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.map(map_row)
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn update_status(&self, id: Uuid, status: ProposalStatus) -> Result<Proposal, StoreError> {
        let row = sqlx::query("UPDATE proposals SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                error!("Proposal status update failed: {}", err);
                StoreError::UpdateFailed(err.to_string())
            })?;

        match row {
            Some(row) => map_row(row).map_err(|e| StoreError::Backend(e.to_string())),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn list_for_order(&self, order_id: &str) -> Result<Vec<Proposal>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM proposals WHERE order_id = $1 ORDER BY created_at DESC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter()
            .map(|row| map_row(row).map_err(|e| StoreError::Backend(e.to_string())))
            .collect()
    }

    async fn expire_overdue(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE proposals
            SET status = 'expired'
            WHERE expires_at < NOW() AND status IN ('pending', 'pending_hotel')
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::UpdateFailed(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
