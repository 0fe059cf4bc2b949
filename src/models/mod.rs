//! Data models for the circulation service

pub mod enums;
pub mod loan;
pub mod remote;
pub mod reservation;

// Re-export commonly used types
pub use enums::{DocumentStatus, LoanStatus, ReservationStatus, UserRole};
pub use loan::{Loan, TopBorrowedEntry};
pub use remote::{RemoteDocument, RemoteUser};
pub use reservation::Reservation;
