//! Register-or-authenticate inside the submission transaction.

use crate::authorize::params::AuthorizeParams;
use crate::authorize::password::{hash_password, verify_password};
use crate::entity::user;
use crate::error::AuthorizeError;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
};
use time::OffsetDateTime;

/// Credentials submitted with the form.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Generate a 40-character URL-safe random user identifier.
fn generate_user_id() -> String {
    use base64::Engine;
    let mut bytes = [0u8; 30];
    getrandom::fill(&mut bytes).expect("Failed to generate random bytes");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Resolve the submitted credentials to a user row, registering a new user
/// when the sign-up flow was selected.
///
/// Runs entirely inside the caller's transaction; the caller commits on
/// success and rolls back on any error. Email matching is a case-sensitive
/// exact match scoped to the tenant.
pub async fn resolve_user(
    txn: &DatabaseTransaction,
    tenant_id: &str,
    params: &AuthorizeParams,
    creds: &Credentials,
) -> Result<user::Model, AuthorizeError> {
    let existing = user::Entity::find()
        .filter(user::Column::TenantId.eq(tenant_id))
        .filter(user::Column::Email.eq(&creds.email))
        .one(txn)
        .await?;

    match existing {
        Some(user) => authenticate(&user, creds).map(|()| user),
        None if params.sign_up => register(txn, tenant_id, creds).await,
        // Unknown email on sign-in gets the same message as a wrong
        // password, so account existence never leaks.
        None => Err(AuthorizeError::InvalidCredentials),
    }
}

/// Check submitted credentials against an existing user row.
fn authenticate(user: &user::Model, creds: &Credentials) -> Result<(), AuthorizeError> {
    match (&user.password_hash, creds.password.as_deref()) {
        (Some(hash), Some(password)) if !password.is_empty() => {
            match verify_password(password, hash) {
                Ok(true) => Ok(()),
                Ok(false) => Err(AuthorizeError::InvalidCredentials),
                Err(e) => Err(AuthorizeError::Hashing(e)),
            }
        }
        (Some(_), _) => Err(AuthorizeError::PasswordRequired),
        // No stored hash means the account has not finished verification;
        // reject with the generic message.
        (None, _) => Err(AuthorizeError::InvalidCredentials),
    }
}

/// Insert a new user row for the sign-up flow.
///
/// A concurrent sign-up for the same (tenant, email) loses on the unique
/// index; that loss is surfaced as the generic credentials failure.
async fn register(
    txn: &DatabaseTransaction,
    tenant_id: &str,
    creds: &Credentials,
) -> Result<user::Model, AuthorizeError> {
    if let (Some(password), Some(confirm)) = (&creds.password, &creds.confirm_password)
        && password != confirm
    {
        return Err(AuthorizeError::PasswordMismatch);
    }

    let password_hash = match creds.password.as_deref() {
        Some(password) if !password.is_empty() => {
            Some(hash_password(password).map_err(AuthorizeError::Hashing)?)
        }
        // No password yet: the row is created pending verification.
        _ => None,
    };

    let now = OffsetDateTime::now_utc();
    let user = user::ActiveModel {
        id: Set(generate_user_id()),
        tenant_id: Set(tenant_id.to_string()),
        email: Set(creds.email.clone()),
        email_verified: Set(false),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match user.insert(txn).await {
        Ok(model) => Ok(model),
        Err(e) => {
            tracing::warn!(error = %e, "User registration insert failed");
            Err(AuthorizeError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_hash(hash: Option<String>) -> user::Model {
        let now = OffsetDateTime::now_utc();
        user::Model {
            id: "user-1".to_string(),
            tenant_id: "tenant-1".to_string(),
            email: "a@example.com".to_string(),
            email_verified: true,
            password_hash: hash,
            created_at: now,
            updated_at: now,
        }
    }

    fn creds(password: Option<&str>) -> Credentials {
        Credentials {
            email: "a@example.com".to_string(),
            password: password.map(String::from),
            confirm_password: None,
        }
    }

    #[test]
    fn generated_ids_are_40_chars_and_unique() {
        let id1 = generate_user_id();
        let id2 = generate_user_id();
        assert_eq!(id1.len(), 40);
        assert_ne!(id1, id2);
        assert!(!id1.contains('+'));
        assert!(!id1.contains('/'));
        assert!(!id1.contains('='));
    }

    #[test]
    fn correct_password_authenticates() {
        let hash = hash_password("hunter22").unwrap();
        let user = user_with_hash(Some(hash));
        assert!(authenticate(&user, &creds(Some("hunter22"))).is_ok());
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let hash = hash_password("hunter22").unwrap();
        let user = user_with_hash(Some(hash));
        assert!(matches!(
            authenticate(&user, &creds(Some("wrong"))),
            Err(AuthorizeError::InvalidCredentials)
        ));
    }

    #[test]
    fn missing_password_is_password_required() {
        let hash = hash_password("hunter22").unwrap();
        let user = user_with_hash(Some(hash));
        assert!(matches!(
            authenticate(&user, &creds(None)),
            Err(AuthorizeError::PasswordRequired)
        ));
        assert!(matches!(
            authenticate(&user, &creds(Some(""))),
            Err(AuthorizeError::PasswordRequired)
        ));
    }

    #[test]
    fn pending_verification_account_is_rejected_generically() {
        let user = user_with_hash(None);
        assert!(matches!(
            authenticate(&user, &creds(Some("anything"))),
            Err(AuthorizeError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn duplicate_signup_insert_surfaces_generic_failure() {
        use sea_orm::{ConnectionTrait, Database, DbBackend, Statement, TransactionTrait};

        let db = Database::connect("sqlite::memory:").await.expect("connect");
        db.execute(Statement::from_string(
            DbBackend::Sqlite,
            r#"CREATE TABLE users (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                email TEXT NOT NULL,
                email_verified INTEGER NOT NULL DEFAULT 0,
                password_hash TEXT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (tenant_id, email)
            );"#,
        ))
        .await
        .expect("create users table");

        let credentials = creds(Some("hunter22"));

        // The first sign-up wins and commits.
        let txn = db.begin().await.expect("begin");
        register(&txn, "tenant-1", &credentials)
            .await
            .expect("first registration");
        txn.commit().await.expect("commit");

        // A concurrent sign-up for the same (tenant, email) has passed the
        // lookup before the winner committed; its insert loses on the
        // unique index and must surface only the generic failure.
        let txn = db.begin().await.expect("begin");
        let err = register(&txn, "tenant-1", &credentials).await.unwrap_err();
        txn.rollback().await.expect("rollback");
        assert!(matches!(err, AuthorizeError::InvalidCredentials));
    }
}
