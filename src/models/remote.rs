//! Records owned by the sibling user and document services
//!
//! These mirror the collaborator wire formats. Only the fields the
//! circulation rules read are kept; anything else the services add is
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

use super::enums::{DocumentStatus, UserRole};

/// User as served by the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: i32,
    pub role: UserRole,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub subscription_status: Option<String>,
}

/// Document as served by the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub id: i32,
    #[serde(default)]
    pub title: Option<String>,
    /// Physical-copy status; meaningless when the document is digital-only
    pub status: DocumentStatus,
    pub is_physical: bool,
    pub is_digital: bool,
    /// Catalog-owned reference to the digital asset
    #[serde(default)]
    pub file_path: Option<String>,
}
