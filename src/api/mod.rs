//! API handlers for the circulation REST endpoints
//!
//! The service runs behind the platform gateway, which owns request
//! authentication; handlers here only translate between HTTP and the
//! ledger services.

pub mod health;
pub mod loans;
pub mod openapi;
pub mod reservations;
pub mod users;

use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run validator rules on a request payload, mapping failures to a 400
pub(crate) fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}
