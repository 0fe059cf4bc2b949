//! Loan (digital borrow) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::LoanStatus;

/// Fixed lending window for digital loans, in days
pub const DIGITAL_LOAN_DURATION_DAYS: i64 = 14;

/// Due date policy: a fixed window from the loan date
pub fn due_date_for(loan_date: DateTime<Utc>) -> DateTime<Utc> {
    loan_date + Duration::days(DIGITAL_LOAN_DURATION_DAYS)
}

/// Loan record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub document_id: i32,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: LoanStatus,
}

impl Loan {
    /// Past the due date. Overdue active loans expire lazily on the next
    /// access check; there is no background sweep.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }
}

/// Create loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    /// Borrowing user ID (owned by the user service)
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: i32,
    /// Digital document ID (owned by the document service)
    #[validate(range(min = 1, message = "document_id must be positive"))]
    pub document_id: i32,
}

/// Per-document active loan count, for the top-borrowed ranking
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TopBorrowedEntry {
    pub document_id: i32,
    pub loan_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_date_is_exactly_fourteen_days() {
        let loan_date = Utc::now();
        let due = due_date_for(loan_date);
        assert_eq!(due - loan_date, Duration::days(14));
    }

    #[test]
    fn test_overdue_boundary() {
        let loan_date = Utc::now();
        let loan = Loan {
            id: 1,
            user_id: 1,
            document_id: 1,
            loan_date,
            due_date: due_date_for(loan_date),
            status: LoanStatus::Active,
        };
        // Exactly at the due date is still allowed; strictly after is not.
        assert!(!loan.is_overdue(loan.due_date));
        assert!(loan.is_overdue(loan.due_date + Duration::seconds(1)));
    }
}
