//! Error taxonomy for the authorization endpoint.

use thiserror::Error;

/// Everything that can go wrong while handling an authorization request.
///
/// The first two variants reject the request before any side effect; the
/// credential variants re-render the form; the remaining variants are
/// internal and must never leak their detail to the form.
#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error("'client_id' is invalid")]
    InvalidClient,
    #[error("'redirect_uri' is invalid")]
    InvalidRedirect,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Password required")]
    PasswordRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("'email' is required")]
    EmailRequired,
    #[error("Password hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),
    #[error("Code signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AuthorizeError {
    /// True for request-level failures that reject with a 400 instead of
    /// re-rendering the form.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            AuthorizeError::InvalidClient | AuthorizeError::InvalidRedirect
        )
    }

    /// OAuth2 error code for request-level failures.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthorizeError::InvalidClient => "invalid_client",
            AuthorizeError::InvalidRedirect => "invalid_request",
            _ => "server_error",
        }
    }

    /// The message shown on the sign-in/sign-up form. Internal failures all
    /// collapse to the same generic sentence so raw errors never reach the
    /// user.
    pub fn user_message(&self) -> String {
        match self {
            AuthorizeError::InvalidCredentials
            | AuthorizeError::PasswordRequired
            | AuthorizeError::PasswordMismatch
            | AuthorizeError::EmailRequired
            | AuthorizeError::InvalidClient
            | AuthorizeError::InvalidRedirect => self.to_string(),
            AuthorizeError::Hashing(_)
            | AuthorizeError::Signing(_)
            | AuthorizeError::Database(_) => "An error occurred. Please try again.".to_string(),
        }
    }
}
