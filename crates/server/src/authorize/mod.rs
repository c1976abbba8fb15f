//! OAuth2 authorization endpoint.
//!
//! Implements the authorization-code leg of the provider:
//! - Request validation against the client registry
//! - Resource-owner sign-in and sign-up
//! - Signed authorization code issuance and redirect
//!
//! ## Endpoint
//! - `GET|POST /authorize` (any non-POST method renders the form)

pub mod code;
pub mod endpoints;
pub mod params;
pub mod password;
mod registrar;
mod state;
mod user_store;

pub use endpoints::router;
pub use password::{hash_password, verify_password};
pub use state::AuthorizeState;
