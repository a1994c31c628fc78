//! The stored user record backing the credential store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldstock_core::UserId;

use crate::identity::CredentialTag;
use crate::permissions::{default_permissions, PermissionSet};
use crate::roles::Role;

/// A user record as persisted by the credential store.
///
/// `password` is always a pre-hashed digest, never plaintext. `permissions`
/// starts from the role's default table and may carry per-user overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// Argon2 digest.
    pub password: String,
    pub role: Role,
    pub credential_tag: CredentialTag,
    pub permissions: PermissionSet,
    /// Optional opaque API token; resolvable via the credential store when a
    /// bearer string is not a verifiable signed token.
    pub api_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a record with the role's default grants and a role-derived
    /// credential tag. `password_digest` must already be hashed.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password_digest: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            name: name.into(),
            password: password_digest.into(),
            role,
            credential_tag: CredentialTag::for_role(role),
            permissions: default_permissions(role),
            api_token: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Module, Operation};

    #[test]
    fn new_record_gets_role_defaults() {
        let user = UserRecord::new("x@example.com", "X", "digest", Role::Agent);
        assert!(user.credential_tag.is_agent_class());
        assert!(user.permissions.has(Module::Sales, Operation::Create));
        assert!(!user.permissions.has(Module::Users, Operation::Read));
    }

    #[test]
    fn staff_roles_get_staff_tag() {
        for role in [Role::Superadmin, Role::Admin] {
            let user = UserRecord::new("x@example.com", "X", "digest", role);
            assert!(!user.credential_tag.is_agent_class());
        }
    }
}
