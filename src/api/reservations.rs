//! Physical reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{
        enums::ReservationStatus,
        reservation::{CreateReservation, Reservation},
    },
};

use super::{loans::CountResponse, validate_payload};

/// Count query; omitting the status counts active reservations
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationCountQuery {
    pub status: Option<ReservationStatus>,
}

/// Bulk-cancellation response for a document sync
#[derive(Serialize, ToSchema)]
pub struct SyncResponse {
    pub document_id: i32,
    /// Number of reservations moved to cancelled
    pub cancelled: i64,
}

/// Create a physical reservation
#[utoipa::path(
    post,
    path = "/reservations/physical",
    tag = "reservations",
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 409, description = "An active reservation already exists for this user and document"),
        (status = 422, description = "User is not a member, or document is not a checked-out physical copy"),
        (status = 503, description = "A sibling service is unreachable")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    validate_payload(&request)?;

    let reservation = state.services.reservations.create_reservation(&request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Cancel a reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is already cancelled or honored")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    Path(reservation_id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.cancel_reservation(reservation_id).await?;
    Ok(Json(reservation))
}

/// Honor a reservation (the member picked the copy up)
#[utoipa::path(
    post,
    path = "/reservations/{id}/honor",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation honored", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is already cancelled or honored")
    )
)]
pub async fn honor_reservation(
    State(state): State<crate::AppState>,
    Path(reservation_id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.honor_reservation(reservation_id).await?;
    Ok(Json(reservation))
}

/// Cancel all active reservations for a document.
///
/// Called by the catalog (or an operator) when the document's physical copy
/// becomes available again. Idempotent: a second call cancels 0.
#[utoipa::path(
    post,
    path = "/reservations/documents/{document_id}/sync",
    tag = "reservations",
    params(
        ("document_id" = i32, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Active reservations cancelled", body = SyncResponse)
    )
)]
pub async fn sync_document_reservations(
    State(state): State<crate::AppState>,
    Path(document_id): Path<i32>,
) -> AppResult<Json<SyncResponse>> {
    let cancelled = state
        .services
        .reservations
        .cancel_all_for_document(document_id)
        .await?;

    Ok(Json(SyncResponse {
        document_id,
        cancelled,
    }))
}

/// Count reservations by status
#[utoipa::path(
    get,
    path = "/reservations/count",
    tag = "reservations",
    params(ReservationCountQuery),
    responses(
        (status = 200, description = "Reservation count", body = CountResponse)
    )
)]
pub async fn count_reservations(
    State(state): State<crate::AppState>,
    Query(query): Query<ReservationCountQuery>,
) -> AppResult<Json<CountResponse>> {
    let status = query.status.unwrap_or(ReservationStatus::Active);
    let count = state.services.reservations.count(Some(status)).await?;
    Ok(Json(CountResponse { count }))
}
