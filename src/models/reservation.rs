//! Reservation (physical hold) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ReservationStatus;

/// Reservation record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub document_id: i32,
    pub reservation_date: DateTime<Utc>,
    pub status: ReservationStatus,
}

/// Create reservation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    /// Reserving user ID (owned by the user service)
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: i32,
    /// Physical document ID (owned by the document service)
    #[validate(range(min = 1, message = "document_id must be positive"))]
    pub document_id: i32,
}
