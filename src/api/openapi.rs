//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, loans, reservations, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Circulation API",
        version = "0.1.0",
        description = "Loan and reservation service for the library platform",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "Circulation API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Loans
        loans::create_loan,
        loans::return_loan,
        loans::access_document,
        loans::count_loans,
        loans::top_borrowed,
        // Reservations
        reservations::create_reservation,
        reservations::cancel_reservation,
        reservations::honor_reservation,
        reservations::sync_document_reservations,
        reservations::count_reservations,
        // Per-user queries
        users::get_user_loans,
        users::get_user_reservations,
        users::check_active_loan,
        users::check_active_reservation,
    ),
    components(
        schemas(
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::CreateLoan,
            crate::models::loan::TopBorrowedEntry,
            crate::models::enums::LoanStatus,
            loans::CountResponse,
            loans::AccessResponse,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservation,
            crate::models::enums::ReservationStatus,
            reservations::SyncResponse,
            // Per-user queries
            users::ActiveLoanCheck,
            users::ActiveReservationCheck,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "loans", description = "Digital loan ledger"),
        (name = "reservations", description = "Physical reservation ledger"),
        (name = "users", description = "Per-user circulation queries")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
