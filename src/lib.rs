//! Circulation - library loan and reservation service
//!
//! One of the three services behind the library platform gateway: it owns the
//! digital loan and physical reservation ledgers, validating user and
//! document facts against the sibling services before every mutation.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
