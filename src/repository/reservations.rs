//! Reservations repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{enums::ReservationStatus, reservation::Reservation},
    repository::conflict_on_unique,
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    /// Create a new active reservation. Same atomic-insert shape as loans:
    /// the partial unique index owns the one-active-per-pair invariant.
    pub async fn create(
        &self,
        user_id: i32,
        document_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, document_id, reservation_date, status)
            VALUES ($1, $2, $3, 'active')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(document_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                "An active reservation already exists for this user and document",
            )
        })
    }

    /// Transition a reservation out of `active`; zero rows affected means
    /// missing or already terminal.
    async fn transition(&self, id: i32, next: ReservationStatus) -> AppResult<Reservation> {
        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2 WHERE id = $1 AND status = 'active' RETURNING *",
        )
        .bind(id)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(reservation) => Ok(reservation),
            None => {
                let current = self.get_by_id(id).await?;
                Err(AppError::InvalidState(format!(
                    "Reservation {} is already {} and cannot become {}",
                    id, current.status, next
                )))
            }
        }
    }

    /// Mark a reservation cancelled
    pub async fn mark_cancelled(&self, id: i32) -> AppResult<Reservation> {
        self.transition(id, ReservationStatus::Cancelled).await
    }

    /// Mark a reservation honored (the member picked the copy up)
    pub async fn mark_honored(&self, id: i32) -> AppResult<Reservation> {
        self.transition(id, ReservationStatus::Honored).await
    }

    /// Cancel every active reservation for a document; returns the number
    /// cancelled. A second call finds nothing active and returns 0.
    pub async fn cancel_all_for_document(&self, document_id: i32) -> AppResult<i64> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'cancelled' WHERE document_id = $1 AND status = 'active'",
        )
        .bind(document_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    /// Count reservations, optionally filtered by status
    pub async fn count(&self, status: Option<ReservationStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE ($1::reservation_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Reservations for a user, most recent first
    pub async fn list_for_user(
        &self,
        user_id: i32,
        status: Option<ReservationStatus>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE user_id = $1 AND ($2::reservation_status IS NULL OR status = $2)
            ORDER BY reservation_date DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Whether the user currently holds an active reservation for the document
    pub async fn has_active(&self, user_id: i32, document_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reservations WHERE user_id = $1 AND document_id = $2 AND status = 'active')",
        )
        .bind(user_id)
        .bind(document_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
