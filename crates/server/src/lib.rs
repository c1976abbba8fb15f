//! The authorization leg of a multi-tenant OAuth2/OIDC identity provider.
//!
//! Accepts `GET|POST /authorize` requests, validates them against the client
//! registry, authenticates or registers the resource owner, and redirects
//! back to the client with a short-lived signed authorization code.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

pub mod api;
pub mod authorize;
pub mod config;
pub mod entity;
pub mod error;

#[derive(Clone)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}
