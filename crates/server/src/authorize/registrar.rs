//! Client registry lookup and request validation.
//!
//! Validation runs before any transaction is opened and is strictly
//! read-only.

use crate::authorize::params::AuthorizeParams;
use crate::entity::client;
use crate::error::AuthorizeError;
use sea_orm::{DatabaseConnection, EntityTrait};

/// Look up a registered client by its identifier.
///
/// A missing or unknown id maps to `InvalidClient`; database failures stay
/// distinguishable so they are not misreported as a bad client.
pub async fn find_client(
    db: &DatabaseConnection,
    client_id: &str,
) -> Result<client::Model, AuthorizeError> {
    if client_id.is_empty() {
        return Err(AuthorizeError::InvalidClient);
    }
    client::Entity::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(AuthorizeError::InvalidClient)
}

/// Validate an authorization request against the client registry.
///
/// The client must exist and `redirect_uri` must be a byte-exact member of
/// its authorized set. A request rejected here has caused no side effect.
pub async fn validate(
    db: &DatabaseConnection,
    params: &AuthorizeParams,
) -> Result<client::Model, AuthorizeError> {
    let client = find_client(db, &params.client_id).await?;

    let redirect_uri = params
        .redirect_uri
        .as_deref()
        .ok_or(AuthorizeError::InvalidRedirect)?;
    if !client.is_redirect_allowed(redirect_uri) {
        return Err(AuthorizeError::InvalidRedirect);
    }

    Ok(client)
}
