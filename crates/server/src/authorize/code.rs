//! Signed authorization codes.
//!
//! Codes are compact HS256 JWTs rather than database rows: the token
//! exchange verifies signature and expiry on its own, without a shared
//! store. The short lifetime bounds the window in which a leaked code is
//! useful.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifetime of an issued authorization code, in seconds.
pub const CODE_LIFETIME_SECS: i64 = 30;

/// Claims carried by an authorization code.
#[derive(Debug, Serialize, Deserialize)]
pub struct CodeClaims {
    /// Unique token identifier.
    pub jti: String,
    pub client_id: String,
    pub redirect_uri: String,
    /// The resource owner the code was issued for.
    pub sub: String,
    pub exp: usize,
}

/// Issue a signed authorization code binding the client, redirect URI, and
/// user together.
pub fn issue(
    secret: &[u8],
    client_id: &str,
    redirect_uri: &str,
    user_id: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (OffsetDateTime::now_utc() + time::Duration::seconds(CODE_LIFETIME_SECS))
        .unix_timestamp() as usize;
    let claims = CodeClaims {
        jti: uuid::Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        redirect_uri: redirect_uri.to_string(),
        sub: user_id.to_string(),
        exp,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

/// Verify a code's signature and expiry and return its claims.
pub fn decode(secret: &[u8], token: &str) -> Result<CodeClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Codes live for 30 seconds; the default decoding leeway would keep
    // them valid well past that.
    validation.leeway = 0;
    let data =
        jsonwebtoken::decode::<CodeClaims>(token, &DecodingKey::from_secret(secret), &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_code_decodes_to_issuance_claims() {
        let code = issue(SECRET, "client-1", "https://app.example.com/cb", "user-1")
            .expect("Failed to issue code");
        let claims = decode(SECRET, &code).expect("Failed to decode code");

        assert_eq!(claims.client_id, "client-1");
        assert_eq!(claims.redirect_uri, "https://app.example.com/cb");
        assert_eq!(claims.sub, "user-1");
        assert!(!claims.jti.is_empty());

        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        assert!(claims.exp > now);
        assert!(claims.exp <= now + CODE_LIFETIME_SECS as usize + 1);
    }

    #[test]
    fn each_code_gets_a_fresh_jti() {
        let code1 = issue(SECRET, "client-1", "https://app.example.com/cb", "user-1").unwrap();
        let code2 = issue(SECRET, "client-1", "https://app.example.com/cb", "user-1").unwrap();
        let claims1 = decode(SECRET, &code1).unwrap();
        let claims2 = decode(SECRET, &code2).unwrap();
        assert_ne!(claims1.jti, claims2.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let code = issue(SECRET, "client-1", "https://app.example.com/cb", "user-1").unwrap();
        let err = decode(b"another-secret-another-secret-00", &code).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn expired_code_is_rejected() {
        let claims = CodeClaims {
            jti: "jti-1".to_string(),
            client_id: "client-1".to_string(),
            redirect_uri: "https://app.example.com/cb".to_string(),
            sub: "user-1".to_string(),
            exp: (OffsetDateTime::now_utc() - time::Duration::seconds(5)).unix_timestamp() as usize,
        };
        let code = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = decode(SECRET, &code).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }
}
