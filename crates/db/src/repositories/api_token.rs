//! API token repository for resolving callers to a company.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::api_tokens;

/// API token repository.
#[derive(Debug, Clone)]
pub struct ApiTokenRepository {
    db: DatabaseConnection,
}

impl ApiTokenRepository {
    /// Creates a new API token repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a token for storage and lookup.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Resolves a bearer token to the owning company.
    ///
    /// Returns `None` for unknown or revoked tokens; the caller turns that
    /// into an authentication failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn resolve_company(&self, token: &str) -> Result<Option<Uuid>, DbErr> {
        let token_hash = Self::hash_token(token);

        let found = api_tokens::Entity::find()
            .filter(api_tokens::Column::TokenHash.eq(token_hash))
            .filter(api_tokens::Column::RevokedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(found.map(|t| t.company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = ApiTokenRepository::hash_token("secret-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(
            ApiTokenRepository::hash_token("abc"),
            ApiTokenRepository::hash_token("abc")
        );
        assert_ne!(
            ApiTokenRepository::hash_token("abc"),
            ApiTokenRepository::hash_token("abd")
        );
    }
}
