//! User entity - resource owners, scoped to a tenant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// 40-character URL-safe random identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tenant_id: String,
    /// Unique together with `tenant_id`. Matched case-sensitively.
    pub email: String,
    pub email_verified: bool,
    /// PHC-formatted Argon2 hash. None while the account is pending
    /// verification.
    pub password_hash: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True while the account has no credential set.
    pub fn is_pending_verification(&self) -> bool {
        self.password_hash.is_none()
    }
}
