//! Stateless bearer-token issuance and verification.
//!
//! The bearer token is a signed HS256 token carrying the same identity claims
//! as the session record, verifiable without a store lookup. Both credentials
//! are minted together and re-issued whenever the user's own permission set
//! changes, so the next request reflects new grants without re-login.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fieldstock_core::UserId;

use crate::identity::CredentialTag;
use crate::permissions::PermissionSet;
use crate::roles::Role;
use crate::session::SessionRecord;
use crate::user::UserRecord;

/// Both credentials share a fixed 7-day lifetime.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Claims embedded in the bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearerClaims {
    pub sub: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub credential_tag: CredentialTag,
    pub permissions: PermissionSet,
    pub iat: i64,
    pub exp: i64,
}

impl BearerClaims {
    /// Fallback view of the claims as a session record, used when the
    /// credential store is unreachable during resolution.
    pub fn to_session(&self) -> SessionRecord {
        SessionRecord {
            user_id: self.sub,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            credential_tag: self.credential_tag.clone(),
            permissions: self.permissions.clone(),
            issued_at: Utc
                .timestamp_opt(self.iat, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token verification failed: {0}")]
    Verify(#[source] jsonwebtoken::errors::Error),
}

/// Mints and verifies the paired session/bearer credentials.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue the session record and its stateless bearer twin for a user.
    ///
    /// Idempotent: re-issuing for an unchanged record yields equivalent
    /// credentials (timestamps aside).
    pub fn issue(&self, user: &UserRecord) -> Result<(SessionRecord, String), TokenError> {
        let now = Utc::now();
        let record = SessionRecord {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            credential_tag: user.credential_tag.clone(),
            permissions: user.permissions.clone(),
            issued_at: now,
        };

        let claims = BearerClaims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            credential_tag: user.credential_tag.clone(),
            permissions: user.permissions.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)?;

        Ok((record, token))
    }

    /// Verify a bearer token and return its claims.
    pub fn verify(&self, token: &str) -> Result<BearerClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<BearerClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Verify)
    }
}

/// Expiry of a session record, derived from its issue time.
pub fn session_expires_at(record: &SessionRecord) -> DateTime<Utc> {
    record.issued_at + Duration::days(SESSION_TTL_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret")
    }

    fn user() -> UserRecord {
        UserRecord::new("agent@example.com", "Agent X", "digest", Role::Agent)
    }

    #[test]
    fn issue_then_verify_preserves_claims() {
        let user = user();
        let (record, token) = issuer().issue(&user).unwrap();
        let claims = issuer().verify(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Agent);
        assert_eq!(claims.permissions, user.permissions);
        assert_eq!(record.permissions, user.permissions);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let (_, token) = issuer().issue(&user()).unwrap();
        let other = TokenIssuer::new(b"different-secret");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_fails_verification() {
        let (_, token) = issuer().issue(&user()).unwrap();
        let tampered = format!("{}x", token);
        assert!(issuer().verify(&tampered).is_err());
    }

    #[test]
    fn claims_fall_back_to_an_equivalent_session() {
        let user = user();
        let (record, token) = issuer().issue(&user).unwrap();
        let session = issuer().verify(&token).unwrap().to_session();
        assert_eq!(session.user_id, record.user_id);
        assert_eq!(session.role, record.role);
        assert_eq!(session.permissions, record.permissions);
    }
}
