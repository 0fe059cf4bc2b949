//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::{due_date_for, Loan, TopBorrowedEntry},
    },
    repository::conflict_on_unique,
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Create a new active loan. The partial unique index on
    /// (user_id, document_id) turns a concurrent duplicate into a Conflict
    /// without a check-then-act window.
    pub async fn create(
        &self,
        user_id: i32,
        document_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Loan> {
        let due_date = due_date_for(now);

        sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, document_id, loan_date, due_date, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(document_id)
        .bind(now)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                "An active loan already exists for this user and document",
            )
        })
    }

    /// Transition a loan out of `active`. The conditional update is the
    /// enforcement point: zero rows affected means the loan is either
    /// missing or already terminal.
    async fn transition(&self, id: i32, next: LoanStatus) -> AppResult<Loan> {
        let updated = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET status = $2 WHERE id = $1 AND status = 'active' RETURNING *",
        )
        .bind(id)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(loan) => Ok(loan),
            None => {
                let current = self.get_by_id(id).await?;
                Err(AppError::InvalidState(format!(
                    "Loan {} is already {} and cannot become {}",
                    id, current.status, next
                )))
            }
        }
    }

    /// Mark a loan returned
    pub async fn mark_returned(&self, id: i32) -> AppResult<Loan> {
        self.transition(id, LoanStatus::Returned).await
    }

    /// Mark a loan expired
    pub async fn mark_expired(&self, id: i32) -> AppResult<Loan> {
        self.transition(id, LoanStatus::Expired).await
    }

    /// Count loans, optionally filtered by status
    pub async fn count(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE ($1::loan_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Loans for a user ordered by due date (soonest first)
    pub async fn list_for_user(
        &self,
        user_id: i32,
        status: Option<LoanStatus>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE user_id = $1 AND ($2::loan_status IS NULL OR status = $2)
            ORDER BY due_date
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Whether the user currently holds an active loan for the document
    pub async fn has_active(&self, user_id: i32, document_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE user_id = $1 AND document_id = $2 AND status = 'active')",
        )
        .bind(user_id)
        .bind(document_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Documents ranked by active loan count, ties broken by document id
    pub async fn top_borrowed(&self, limit: i64) -> AppResult<Vec<TopBorrowedEntry>> {
        let entries = sqlx::query_as::<_, TopBorrowedEntry>(
            r#"
            SELECT document_id, COUNT(*) AS loan_count
            FROM loans
            WHERE status = 'active'
            GROUP BY document_id
            ORDER BY loan_count DESC, document_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
