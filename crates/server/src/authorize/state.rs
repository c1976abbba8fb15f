//! Shared state for the authorization endpoint handlers.

use crate::config::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthorizeState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

impl AuthorizeState {
    pub fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// The symmetric key used to sign and verify authorization codes.
    pub fn code_secret(&self) -> &[u8] {
        self.config.code_signing_secret.as_bytes()
    }
}
