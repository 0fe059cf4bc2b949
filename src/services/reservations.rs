//! Reservation ledger service
//!
//! Owns physical reservation records and their status transitions, including
//! the bulk cancellation triggered when a document's physical copy becomes
//! available again.

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        enums::ReservationStatus,
        reservation::{CreateReservation, Reservation},
    },
    repository::Repository,
    services::directory::ConsistencyChecker,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    checker: ConsistencyChecker,
}

impl ReservationsService {
    pub fn new(repository: Repository, checker: ConsistencyChecker) -> Self {
        Self { repository, checker }
    }

    /// Create a reservation after live validation: the borrower must be a
    /// member and the document a physical copy currently checked out.
    pub async fn create_reservation(&self, request: &CreateReservation) -> AppResult<Reservation> {
        self.checker.borrowing_member(request.user_id).await?;
        self.checker.reservable_document(request.document_id).await?;

        let reservation = self
            .repository
            .reservations
            .create(request.user_id, request.document_id, Utc::now())
            .await?;

        tracing::info!(
            reservation_id = reservation.id,
            user_id = reservation.user_id,
            document_id = reservation.document_id,
            "Physical reservation created"
        );

        Ok(reservation)
    }

    /// Cancel a reservation (active -> cancelled)
    pub async fn cancel_reservation(&self, reservation_id: i32) -> AppResult<Reservation> {
        let reservation = self.repository.reservations.mark_cancelled(reservation_id).await?;
        tracing::info!(reservation_id, "Reservation cancelled");
        Ok(reservation)
    }

    /// Honor a reservation (active -> honored)
    pub async fn honor_reservation(&self, reservation_id: i32) -> AppResult<Reservation> {
        let reservation = self.repository.reservations.mark_honored(reservation_id).await?;
        tracing::info!(reservation_id, "Reservation honored");
        Ok(reservation)
    }

    /// Cancel every active reservation for a document. Called synchronously
    /// when the document's physical copy returns to the shelf.
    pub async fn cancel_all_for_document(&self, document_id: i32) -> AppResult<i64> {
        let cancelled = self
            .repository
            .reservations
            .cancel_all_for_document(document_id)
            .await?;

        tracing::info!(document_id, cancelled, "Reservation sync for document");
        Ok(cancelled)
    }

    /// Count reservations, optionally filtered by status
    pub async fn count(&self, status: Option<ReservationStatus>) -> AppResult<i64> {
        self.repository.reservations.count(status).await
    }

    /// Reservations for a user, most recent first
    pub async fn list_for_user(
        &self,
        user_id: i32,
        status: Option<ReservationStatus>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Reservation>> {
        self.repository
            .reservations
            .list_for_user(user_id, status, skip, limit)
            .await
    }

    /// Whether the user holds an active reservation for the document
    pub async fn has_active(&self, user_id: i32, document_id: i32) -> AppResult<bool> {
        self.repository.reservations.has_active(user_id, document_id).await
    }
}
