//! Repository layer for database operations

pub mod loans;
pub mod reservations;

use sqlx::{Pool, Postgres};

use crate::error::AppError;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub loans: loans::LoansRepository,
    pub reservations: reservations::ReservationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            loans: loans::LoansRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Map a unique violation on a partial "one active per pair" index to a
/// Conflict; every other database error passes through.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}
