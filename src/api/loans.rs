//! Digital loan endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::{CreateLoan, Loan, TopBorrowedEntry},
    },
    services::loans::DocumentAccess,
};

use super::validate_payload;

/// Count query; omitting the status counts active loans
#[derive(Debug, Deserialize, IntoParams)]
pub struct LoanCountQuery {
    pub status: Option<LoanStatus>,
}

/// Top-borrowed query
#[derive(Debug, Deserialize, IntoParams)]
pub struct TopBorrowedQuery {
    /// Number of documents to return (1..=20, default 5)
    pub limit: Option<i64>,
}

/// Count response
#[derive(Serialize, ToSchema)]
pub struct CountResponse {
    pub count: i64,
}

/// Access-check response; `file_path` is present on a grant, `reason` on a
/// denial
#[derive(Serialize, ToSchema)]
pub struct AccessResponse {
    pub granted: bool,
    pub loan: Loan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Create a digital loan
#[utoipa::path(
    post,
    path = "/loans/digital",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 409, description = "An active loan already exists for this user and document"),
        (status = 422, description = "User is not a member or document is not digital"),
        (status = 503, description = "A sibling service is unreachable")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    validate_payload(&request)?;

    let loan = state.services.loans.create_loan(&request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a digital loan
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan returned", body = Loan),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan is already returned or expired")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.return_loan(loan_id).await?;
    Ok(Json(loan))
}

/// Check access to the digital asset behind a loan.
///
/// Expiry is evaluated here: an overdue active loan transitions to expired
/// and the request is denied. On a grant the response carries the
/// catalog-owned asset reference; the asset itself is served by the document
/// service.
#[utoipa::path(
    get,
    path = "/loans/{id}/access",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Access granted", body = AccessResponse),
        (status = 403, description = "Access denied (loan not active or period over)", body = AccessResponse),
        (status = 404, description = "Loan or document not found"),
        (status = 503, description = "Document service is unreachable")
    )
)]
pub async fn access_document(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Response> {
    let access = state.services.loans.access_document(loan_id).await?;

    let response = match access {
        DocumentAccess::Granted { loan, file_path } => (
            StatusCode::OK,
            Json(AccessResponse {
                granted: true,
                loan,
                file_path,
                reason: None,
            }),
        ),
        DocumentAccess::Denied { loan, reason } => (
            StatusCode::FORBIDDEN,
            Json(AccessResponse {
                granted: false,
                loan,
                file_path: None,
                reason: Some(reason),
            }),
        ),
    };

    Ok(response.into_response())
}

/// Count loans by status
#[utoipa::path(
    get,
    path = "/loans/count",
    tag = "loans",
    params(LoanCountQuery),
    responses(
        (status = 200, description = "Loan count", body = CountResponse)
    )
)]
pub async fn count_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanCountQuery>,
) -> AppResult<Json<CountResponse>> {
    let status = query.status.unwrap_or(LoanStatus::Active);
    let count = state.services.loans.count(Some(status)).await?;
    Ok(Json(CountResponse { count }))
}

/// Most-borrowed documents by active loan count
#[utoipa::path(
    get,
    path = "/loans/top_digital",
    tag = "loans",
    params(TopBorrowedQuery),
    responses(
        (status = 200, description = "Ranked document list", body = Vec<TopBorrowedEntry>),
        (status = 400, description = "Limit out of range")
    )
)]
pub async fn top_borrowed(
    State(state): State<crate::AppState>,
    Query(query): Query<TopBorrowedQuery>,
) -> AppResult<Json<Vec<TopBorrowedEntry>>> {
    let limit = query.limit.unwrap_or(5);
    if !(1..=20).contains(&limit) {
        return Err(AppError::BadRequest(
            "limit must be between 1 and 20".to_string(),
        ));
    }

    let entries = state.services.loans.top_borrowed(limit).await?;
    Ok(Json(entries))
}
