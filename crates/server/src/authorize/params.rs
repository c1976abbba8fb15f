//! Transient authorization request parameters.

use serde::Deserialize;

/// Query parameters of an authorization request.
///
/// Bound from the query string on both reads and submissions; never
/// persisted. Only `client_id` and `redirect_uri` are validated here, the
/// remaining parameters are carried through for the token-exchange leg.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeParams {
    pub client_id: String,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
    pub scope: Option<String>,
    /// Echoed back verbatim on the final redirect when present.
    pub state: Option<String>,
    pub nonce: Option<String>,
    /// Selects the sign-up flow and permits registration of unknown emails.
    #[serde(default)]
    pub sign_up: bool,
}
