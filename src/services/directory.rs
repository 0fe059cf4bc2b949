//! Cross-service consistency checks against the user and document services
//!
//! Collaborator state is never cached: every decision is a live fetch, and a
//! collaborator that cannot be reached declines the operation. Calls carry a
//! fixed short timeout and are not retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    config::CollaboratorsConfig,
    error::{AppError, AppResult},
    models::{
        enums::{DocumentStatus, UserRole},
        remote::{RemoteDocument, RemoteUser},
    },
};

/// Read access to the user directory service.
/// `Ok(None)` means the user does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, user_id: i32) -> AppResult<Option<RemoteUser>>;
}

/// Read access to the document catalog service.
/// `Ok(None)` means the document does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    async fn get_document(&self, document_id: i32) -> AppResult<Option<RemoteDocument>>;
}

/// HTTP client for the user service
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(config: &CollaboratorsConfig) -> AppResult<Self> {
        Ok(Self {
            client: collaborator_client(config)?,
            base_url: config.user_service_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user(&self, user_id: i32) -> AppResult<Option<RemoteUser>> {
        let url = format!("{}/api/users/{}", self.base_url, user_id);
        fetch_optional(&self.client, &url, "User service").await
    }
}

/// HTTP client for the document service
pub struct HttpDocumentCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentCatalog {
    pub fn new(config: &CollaboratorsConfig) -> AppResult<Self> {
        Ok(Self {
            client: collaborator_client(config)?,
            base_url: config.document_service_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DocumentCatalog for HttpDocumentCatalog {
    async fn get_document(&self, document_id: i32) -> AppResult<Option<RemoteDocument>> {
        let url = format!("{}/api/documents/{}", self.base_url, document_id);
        fetch_optional(&self.client, &url, "Document service").await
    }
}

fn collaborator_client(config: &CollaboratorsConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// GET a collaborator resource. 404 means the resource does not exist;
/// any transport failure, timeout, or other non-2xx status is a decline.
async fn fetch_optional<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    service: &str,
) -> AppResult<Option<T>> {
    let unavailable = |err: &dyn std::fmt::Display| {
        tracing::warn!("{} call failed ({}): {}", service, url, err);
        AppError::ServiceUnavailable(format!("{} is unreachable", service))
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(&e))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let response = response.error_for_status().map_err(|e| unavailable(&e))?;
    let value = response.json::<T>().await.map_err(|e| unavailable(&e))?;
    Ok(Some(value))
}

/// Validates externally-owned facts (user role, document format and physical
/// status) before a ledger mutation.
#[derive(Clone)]
pub struct ConsistencyChecker {
    users: Arc<dyn UserDirectory>,
    documents: Arc<dyn DocumentCatalog>,
}

impl ConsistencyChecker {
    pub fn new(users: Arc<dyn UserDirectory>, documents: Arc<dyn DocumentCatalog>) -> Self {
        Self { users, documents }
    }

    /// The borrower must exist and hold the member role
    pub async fn borrowing_member(&self, user_id: i32) -> AppResult<RemoteUser> {
        let user = self.users.get_user(user_id).await?.ok_or_else(|| {
            AppError::Validation(format!("User {} not found in the user directory", user_id))
        })?;

        if user.role != UserRole::Membre {
            return Err(AppError::Validation(format!(
                "User {} is not a member (role: {})",
                user_id, user.role
            )));
        }

        Ok(user)
    }

    /// The document must exist and carry a digital asset
    pub async fn digital_document(&self, document_id: i32) -> AppResult<RemoteDocument> {
        let document = self.documents.get_document(document_id).await?.ok_or_else(|| {
            AppError::Validation(format!("Document {} not found in the catalog", document_id))
        })?;

        if !document.is_digital {
            return Err(AppError::Validation(format!(
                "Document {} has no digital version",
                document_id
            )));
        }

        Ok(document)
    }

    /// The document must exist as a physical copy that is currently checked
    /// out; holds cannot be placed on copies sitting on the shelf.
    pub async fn reservable_document(&self, document_id: i32) -> AppResult<RemoteDocument> {
        let document = self.documents.get_document(document_id).await?.ok_or_else(|| {
            AppError::Validation(format!("Document {} not found in the catalog", document_id))
        })?;

        if !document.is_physical {
            return Err(AppError::Validation(format!(
                "Document {} has no physical copy to reserve",
                document_id
            )));
        }

        if document.status != DocumentStatus::CheckedOut {
            return Err(AppError::Validation(format!(
                "Document {} is '{}'; only checked-out copies can be reserved",
                document_id, document.status
            )));
        }

        Ok(document)
    }

    /// Plain catalog lookup, for asset delegation after an access grant
    pub async fn catalog_document(&self, document_id: i32) -> AppResult<RemoteDocument> {
        self.documents.get_document(document_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Document {} is no longer in the catalog", document_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i32) -> RemoteUser {
        RemoteUser {
            id,
            role: UserRole::Membre,
            username: None,
            subscription_status: None,
        }
    }

    fn document(id: i32, physical: bool, digital: bool, status: DocumentStatus) -> RemoteDocument {
        RemoteDocument {
            id,
            title: Some("Le Petit Prince".to_string()),
            status,
            is_physical: physical,
            is_digital: digital,
            file_path: digital.then(|| format!("{}.pdf", id)),
        }
    }

    fn checker(
        users: MockUserDirectory,
        documents: MockDocumentCatalog,
    ) -> ConsistencyChecker {
        ConsistencyChecker::new(Arc::new(users), Arc::new(documents))
    }

    #[tokio::test]
    async fn test_borrowing_member_accepts_member() {
        let mut users = MockUserDirectory::new();
        users
            .expect_get_user()
            .returning(|id| Ok(Some(member(id))));

        let checker = checker(users, MockDocumentCatalog::new());
        let user = checker.borrowing_member(7).await.unwrap();
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn test_borrowing_member_rejects_staff_role() {
        let mut users = MockUserDirectory::new();
        users.expect_get_user().returning(|id| {
            Ok(Some(RemoteUser {
                role: UserRole::Bibliothecaire,
                ..member(id)
            }))
        });

        let checker = checker(users, MockDocumentCatalog::new());
        let err = checker.borrowing_member(7).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_borrowing_member_rejects_missing_user() {
        let mut users = MockUserDirectory::new();
        users.expect_get_user().returning(|_| Ok(None));

        let checker = checker(users, MockDocumentCatalog::new());
        let err = checker.borrowing_member(7).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unreachable_directory_declines_without_fallback() {
        let mut users = MockUserDirectory::new();
        users.expect_get_user().returning(|_| {
            Err(AppError::ServiceUnavailable("User service is unreachable".to_string()))
        });

        let checker = checker(users, MockDocumentCatalog::new());
        let err = checker.borrowing_member(7).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_digital_document_rejects_physical_only() {
        let mut documents = MockDocumentCatalog::new();
        documents
            .expect_get_document()
            .returning(|id| Ok(Some(document(id, true, false, DocumentStatus::Available))));

        let checker = checker(MockUserDirectory::new(), documents);
        let err = checker.digital_document(3).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reservable_document_rejects_available_copy() {
        let mut documents = MockDocumentCatalog::new();
        documents
            .expect_get_document()
            .returning(|id| Ok(Some(document(id, true, false, DocumentStatus::Available))));

        let checker = checker(MockUserDirectory::new(), documents);
        let err = checker.reservable_document(3).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reservable_document_accepts_checked_out_copy() {
        let mut documents = MockDocumentCatalog::new();
        documents
            .expect_get_document()
            .returning(|id| Ok(Some(document(id, true, false, DocumentStatus::CheckedOut))));

        let checker = checker(MockUserDirectory::new(), documents);
        let doc = checker.reservable_document(3).await.unwrap();
        assert_eq!(doc.id, 3);
    }

    #[tokio::test]
    async fn test_reservable_document_rejects_digital_only() {
        let mut documents = MockDocumentCatalog::new();
        documents
            .expect_get_document()
            .returning(|id| Ok(Some(document(id, false, true, DocumentStatus::Unknown))));

        let checker = checker(MockUserDirectory::new(), documents);
        let err = checker.reservable_document(3).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
