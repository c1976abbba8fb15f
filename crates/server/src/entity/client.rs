//! Client entity - registered OAuth2 clients.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// JSON array of redirect URIs the client may use.
    pub authorized_domains: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse the authorized redirect URIs from the stored JSON string.
    pub fn authorized_domains_list(&self) -> Vec<String> {
        serde_json::from_str(&self.authorized_domains).unwrap_or_default()
    }

    /// Check whether a redirect URI is allowed for this client.
    ///
    /// Byte-exact comparison; no prefix or wildcard matching.
    pub fn is_redirect_allowed(&self, uri: &str) -> bool {
        self.authorized_domains_list()
            .iter()
            .any(|allowed| allowed == uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn client_with_domains(domains: &str) -> Model {
        Model {
            id: "test-client".to_string(),
            authorized_domains: domains.to_string(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn exact_match_is_allowed() {
        let client =
            client_with_domains(r#"["https://app.example.com/cb","https://other.example.com/cb"]"#);
        assert!(client.is_redirect_allowed("https://app.example.com/cb"));
        assert!(client.is_redirect_allowed("https://other.example.com/cb"));
    }

    #[test]
    fn near_matches_are_rejected() {
        let client = client_with_domains(r#"["https://app.example.com/cb"]"#);
        // Prefix, suffix, and substring variants must all fail.
        assert!(!client.is_redirect_allowed("https://app.example.com/cb/extra"));
        assert!(!client.is_redirect_allowed("https://app.example.com"));
        assert!(!client.is_redirect_allowed("app.example.com/cb"));
        assert!(!client.is_redirect_allowed("https://evil.example.com/cb"));
    }

    #[test]
    fn malformed_json_allows_nothing() {
        let client = client_with_domains("not json");
        assert!(client.authorized_domains_list().is_empty());
        assert!(!client.is_redirect_allowed("https://app.example.com/cb"));
    }

    #[test]
    fn empty_list_allows_nothing() {
        let client = client_with_domains("[]");
        assert!(!client.is_redirect_allowed(""));
        assert!(!client.is_redirect_allowed("https://app.example.com/cb"));
    }
}
