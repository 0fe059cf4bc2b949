//! Shared domain enums for circulation records and collaborator payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Digital loan status. `Active` is the sole non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
    Expired,
}

impl LoanStatus {
    pub fn is_active(self) -> bool {
        matches!(self, LoanStatus::Active)
    }

    /// Transitions are one-way: a loan leaves `Active` exactly once and
    /// never comes back.
    pub fn can_become(self, next: LoanStatus) -> bool {
        self == LoanStatus::Active && next != LoanStatus::Active
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
            LoanStatus::Expired => "expired",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Physical reservation status. `Active` is the sole non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    Honored,
}

impl ReservationStatus {
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::Active)
    }

    /// Same one-way shape as loans: `Active` to a terminal state, no
    /// resurrection.
    pub fn can_become(self, next: ReservationStatus) -> bool {
        self == ReservationStatus::Active && next != ReservationStatus::Active
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Honored => "honored",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role as served by the user directory. Wire values belong to that service;
/// anything unrecognized maps to `Unknown` and fails the member check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Membre,
    Bibliothecaire,
    Gerant,
    Unknown,
}

impl From<String> for UserRole {
    fn from(v: String) -> Self {
        match v.as_str() {
            "membre" => UserRole::Membre,
            "bibliothecaire" => UserRole::Bibliothecaire,
            "gerant" => UserRole::Gerant,
            _ => UserRole::Unknown,
        }
    }
}

impl From<UserRole> for String {
    fn from(r: UserRole) -> Self {
        r.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UserRole::Membre => "membre",
            UserRole::Bibliothecaire => "bibliothecaire",
            UserRole::Gerant => "gerant",
            UserRole::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// DocumentStatus
// ---------------------------------------------------------------------------

/// Physical-copy status as served by the document catalog. The catalog owns
/// the wire values (`disponible` / `emprunte`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    Available,
    CheckedOut,
    Unknown,
}

impl From<String> for DocumentStatus {
    fn from(v: String) -> Self {
        match v.as_str() {
            "disponible" => DocumentStatus::Available,
            "emprunte" => DocumentStatus::CheckedOut,
            _ => DocumentStatus::Unknown,
        }
    }
}

impl From<DocumentStatus> for String {
    fn from(s: DocumentStatus) -> Self {
        s.to_string()
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DocumentStatus::Available => "disponible",
            DocumentStatus::CheckedOut => "emprunte",
            DocumentStatus::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_transitions_one_way() {
        assert!(LoanStatus::Active.can_become(LoanStatus::Returned));
        assert!(LoanStatus::Active.can_become(LoanStatus::Expired));
        assert!(!LoanStatus::Returned.can_become(LoanStatus::Returned));
        assert!(!LoanStatus::Returned.can_become(LoanStatus::Active));
        assert!(!LoanStatus::Expired.can_become(LoanStatus::Returned));
    }

    #[test]
    fn test_reservation_transitions_one_way() {
        assert!(ReservationStatus::Active.can_become(ReservationStatus::Cancelled));
        assert!(ReservationStatus::Active.can_become(ReservationStatus::Honored));
        assert!(!ReservationStatus::Cancelled.can_become(ReservationStatus::Cancelled));
        assert!(!ReservationStatus::Honored.can_become(ReservationStatus::Active));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&LoanStatus::Active).unwrap(), "\"active\"");
        assert_eq!(
            serde_json::from_str::<ReservationStatus>("\"honored\"").unwrap(),
            ReservationStatus::Honored
        );
    }

    #[test]
    fn test_collaborator_wire_values() {
        assert_eq!(
            serde_json::from_str::<DocumentStatus>("\"emprunte\"").unwrap(),
            DocumentStatus::CheckedOut
        );
        assert_eq!(
            serde_json::from_str::<DocumentStatus>("\"en reparation\"").unwrap(),
            DocumentStatus::Unknown
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"membre\"").unwrap(),
            UserRole::Membre
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"admin\"").unwrap(),
            UserRole::Unknown
        );
    }
}
