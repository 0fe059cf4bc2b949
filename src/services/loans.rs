//! Loan ledger service
//!
//! Owns digital loan records, their status transitions, and lazy expiry
//! evaluation. External facts (borrower role, document format) are validated
//! through the consistency checker before any mutation.

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::LoanStatus,
        loan::{CreateLoan, Loan, TopBorrowedEntry},
    },
    repository::Repository,
    services::directory::ConsistencyChecker,
};

/// Outcome of an access check on a digital loan
#[derive(Debug)]
pub enum DocumentAccess {
    Granted {
        loan: Loan,
        /// Catalog-owned asset reference to delegate to
        file_path: Option<String>,
    },
    Denied {
        loan: Loan,
        reason: String,
    },
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    checker: ConsistencyChecker,
}

impl LoansService {
    pub fn new(repository: Repository, checker: ConsistencyChecker) -> Self {
        Self { repository, checker }
    }

    /// Create a digital loan after live user and document validation
    pub async fn create_loan(&self, request: &CreateLoan) -> AppResult<Loan> {
        self.checker.borrowing_member(request.user_id).await?;
        self.checker.digital_document(request.document_id).await?;

        let loan = self
            .repository
            .loans
            .create(request.user_id, request.document_id, Utc::now())
            .await?;

        tracing::info!(
            loan_id = loan.id,
            user_id = loan.user_id,
            document_id = loan.document_id,
            "Digital loan created, due {}",
            loan.due_date
        );

        Ok(loan)
    }

    /// Return a loan (active -> returned)
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let loan = self.repository.loans.mark_returned(loan_id).await?;
        tracing::info!(loan_id, "Loan returned");
        Ok(loan)
    }

    /// Evaluate expiry lazily and decide whether the asset may be served.
    /// This is the only place a loan moves to `expired`.
    pub async fn check_access(
        &self,
        loan_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<(Loan, Option<String>)> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;

        if loan.status != LoanStatus::Active {
            return Ok((loan, Some("Loan is not active".to_string())));
        }

        if loan.is_overdue(now) {
            let expired = match self.repository.loans.mark_expired(loan_id).await {
                Ok(loan) => loan,
                // A concurrent access check expired it first; the denial stands.
                Err(AppError::InvalidState(_)) => self.repository.loans.get_by_id(loan_id).await?,
                Err(e) => return Err(e),
            };
            tracing::info!(loan_id, "Loan period over, marked expired");
            return Ok((expired, Some("Loan period is over".to_string())));
        }

        Ok((loan, None))
    }

    /// Full access decision for the API layer: check the loan, then resolve
    /// the asset reference from the catalog on a grant.
    pub async fn access_document(&self, loan_id: i32) -> AppResult<DocumentAccess> {
        let (loan, denial) = self.check_access(loan_id, Utc::now()).await?;

        match denial {
            Some(reason) => Ok(DocumentAccess::Denied { loan, reason }),
            None => {
                let document = self.checker.catalog_document(loan.document_id).await?;
                Ok(DocumentAccess::Granted {
                    loan,
                    file_path: document.file_path,
                })
            }
        }
    }

    /// Count loans, optionally filtered by status
    pub async fn count(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        self.repository.loans.count(status).await
    }

    /// Loans for a user ordered by due date
    pub async fn list_for_user(
        &self,
        user_id: i32,
        status: Option<LoanStatus>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Loan>> {
        self.repository.loans.list_for_user(user_id, status, skip, limit).await
    }

    /// Whether the user holds an active loan for the document
    pub async fn has_active(&self, user_id: i32, document_id: i32) -> AppResult<bool> {
        self.repository.loans.has_active(user_id, document_id).await
    }

    /// Most-borrowed documents by active loan count
    pub async fn top_borrowed(&self, limit: i64) -> AppResult<Vec<TopBorrowedEntry>> {
        self.repository.loans.top_borrowed(limit).await
    }
}
