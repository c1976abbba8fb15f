//! Database entities for the identity store.

pub mod client;
pub mod user;
