//! Business logic services

pub mod directory;
pub mod loans;
pub mod reservations;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

use directory::{
    ConsistencyChecker, DocumentCatalog, HttpDocumentCatalog, HttpUserDirectory, UserDirectory,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
}

impl Services {
    /// Create all services with the given repository and HTTP collaborators
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let users: Arc<dyn UserDirectory> =
            Arc::new(HttpUserDirectory::new(&config.collaborators)?);
        let documents: Arc<dyn DocumentCatalog> =
            Arc::new(HttpDocumentCatalog::new(&config.collaborators)?);
        let checker = ConsistencyChecker::new(users, documents);

        Ok(Self {
            loans: loans::LoansService::new(repository.clone(), checker.clone()),
            reservations: reservations::ReservationsService::new(repository, checker),
        })
    }
}
