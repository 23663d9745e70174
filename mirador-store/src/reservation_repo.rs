use async_trait::async_trait;
use mirador_core::repository::ReservationRepository;
use mirador_core::reservation::Reservation;
use mirador_core::StoreError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::error;

pub struct PgReservationRepository {
    pub pool: PgPool,
}

impl PgReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: PgRow) -> Result<Reservation, sqlx::Error> {
    Ok(Reservation {
        id: row.try_get("id")?,
        locator: row.try_get("locator")?,
        guest_name: row.try_get("guest_name")?,
        guest_email: row.try_get("guest_email")?,
        check_in: row.try_get("check_in")?,
        nights: row.try_get::<i32, _>("nights")? as u32,
        room_type: row.try_get("room_type")?,
        room_number: row.try_get("room_number")?,
        occupancy: row.try_get("occupancy")?,
        status: row.try_get("status")?,
        extras: row.try_get("extras")?,
        has_pending_request: row.try_get("has_pending_request")?,
    })
}

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    async fn list(&self) -> Result<Vec<Reservation>, StoreError> {
        let rows = sqlx::query("SELECT * FROM reservations ORDER BY check_in, locator")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter()
            .map(|row| map_row(row).map_err(|e| StoreError::Backend(e.to_string())))
            .collect()
    }

    async fn get(&self, id: &str) -> Result<Option<Reservation>, StoreError> {
        let row = sqlx::query("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.map(map_row)
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Wholesale replacement inside one transaction; there is no
    /// per-field update path for the roster.
    async fn replace_all(&self, rows: Vec<Reservation>) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        sqlx::query("DELETE FROM reservations")
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::UpdateFailed(e.to_string()))?;

        for r in &rows {
            sqlx::query(
                r#"
                INSERT INTO reservations
                    (id, locator, guest_name, guest_email, check_in, nights,
                     room_type, room_number, occupancy, status, extras, has_pending_request)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(&r.id)
            .bind(&r.locator)
            .bind(&r.guest_name)
            .bind(&r.guest_email)
            .bind(r.check_in)
            .bind(r.nights as i32)
            .bind(&r.room_type)
            .bind(&r.room_number)
            .bind(&r.occupancy)
            .bind(&r.status)
            .bind(&r.extras)
            .bind(r.has_pending_request)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                error!("Roster replace failed on {}: {}", r.id, err);
                StoreError::UpdateFailed(err.to_string())
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
