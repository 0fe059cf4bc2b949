//! Per-user circulation queries
//!
//! User records live in the user service; these endpoints only read the
//! circulation ledgers keyed by user id.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{
        enums::{LoanStatus, ReservationStatus},
        loan::Loan,
        reservation::Reservation,
    },
};

const DEFAULT_PAGE_SIZE: i64 = 100;

/// Listing query for a user's loans
#[derive(Debug, Deserialize, IntoParams)]
pub struct LoanListQuery {
    /// Restrict to one status; omit for all
    pub status: Option<LoanStatus>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Listing query for a user's reservations
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationListQuery {
    /// Restrict to one status; omit for all
    pub status: Option<ReservationStatus>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Active-pair probe query
#[derive(Debug, Deserialize, IntoParams)]
pub struct CheckQuery {
    pub document_id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct ActiveLoanCheck {
    pub has_active_loan: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ActiveReservationCheck {
    pub has_active_reservation: bool,
}

/// List a user's loans, soonest due first
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID"),
        LoanListQuery
    ),
    responses(
        (status = 200, description = "User's loans", body = Vec<Loan>)
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<LoanListQuery>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state
        .services
        .loans
        .list_for_user(
            user_id,
            query.status,
            query.skip.unwrap_or(0).max(0),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        )
        .await?;

    Ok(Json(loans))
}

/// List a user's reservations, most recent first
#[utoipa::path(
    get,
    path = "/users/{id}/reservations",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID"),
        ReservationListQuery
    ),
    responses(
        (status = 200, description = "User's reservations", body = Vec<Reservation>)
    )
)]
pub async fn get_user_reservations(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state
        .services
        .reservations
        .list_for_user(
            user_id,
            query.status,
            query.skip.unwrap_or(0).max(0),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        )
        .await?;

    Ok(Json(reservations))
}

/// Whether the user holds an active loan for a document
#[utoipa::path(
    get,
    path = "/users/{id}/loans/check",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID"),
        CheckQuery
    ),
    responses(
        (status = 200, description = "Active loan probe", body = ActiveLoanCheck)
    )
)]
pub async fn check_active_loan(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<CheckQuery>,
) -> AppResult<Json<ActiveLoanCheck>> {
    let has_active_loan = state
        .services
        .loans
        .has_active(user_id, query.document_id)
        .await?;

    Ok(Json(ActiveLoanCheck { has_active_loan }))
}

/// Whether the user holds an active reservation for a document
#[utoipa::path(
    get,
    path = "/users/{id}/reservations/check",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID"),
        CheckQuery
    ),
    responses(
        (status = 200, description = "Active reservation probe", body = ActiveReservationCheck)
    )
)]
pub async fn check_active_reservation(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<CheckQuery>,
) -> AppResult<Json<ActiveReservationCheck>> {
    let has_active_reservation = state
        .services
        .reservations
        .has_active(user_id, query.document_id)
        .await?;

    Ok(Json(ActiveReservationCheck { has_active_reservation }))
}
