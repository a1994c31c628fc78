//! The resolved, request-scoped identity.

use serde::{Deserialize, Serialize};

use fieldstock_core::UserId;

use crate::permissions::{Module, Operation, PermissionSet};
use crate::roles::Role;
use crate::user::UserRecord;

/// A role-correlated opaque credential tag.
///
/// Distinguishes agent-class (field) credentials from staff credentials as a
/// coarse capability switch, checked independently of [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialTag(String);

impl CredentialTag {
    pub const AGENT: &'static str = "agent-key";
    pub const STAFF: &'static str = "staff-key";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Tag assigned at registration, derived from the role.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Agent => Self::new(Self::AGENT),
            Role::Superadmin | Role::Admin => Self::new(Self::STAFF),
        }
    }

    pub fn is_agent_class(&self) -> bool {
        self.0 == Self::AGENT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An authenticated request's resolved identity.
///
/// Derived per request and never persisted as-is. `role` and `permissions`
/// come from the authoritative store whenever reachable; transport-embedded
/// claims are a fallback only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub credential_tag: CredentialTag,
    pub permissions: PermissionSet,
}

impl Identity {
    /// Derive an identity from a fresh user record (the preferred source).
    pub fn from_record(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            credential_tag: user.credential_tag.clone(),
            permissions: user.permissions.clone(),
        }
    }

    /// Derive an identity from transport-embedded claims.
    ///
    /// Fallback path only, for when the credential store is unreachable.
    pub fn from_session(record: crate::session::SessionRecord) -> Self {
        Self {
            user_id: record.user_id,
            email: record.email,
            name: record.name,
            role: record.role,
            credential_tag: record.credential_tag,
            permissions: record.permissions,
        }
    }

    /// True when this is a field-agent credential: role `agent` carrying an
    /// agent-class tag. Row scoping applies only to these identities.
    pub fn is_field_agent(&self) -> bool {
        self.role == Role::Agent && self.credential_tag.is_agent_class()
    }

    /// Authorization test for a `(module, operation)` pair.
    ///
    /// Membership in the resolved permission set, plus one documented
    /// exception: field-agent credentials get an implicit read/create
    /// allowance on products and inventory. The exception must not be
    /// extended to other modules or operations.
    pub fn allows(&self, module: Module, operation: Operation) -> bool {
        if self.permissions.has(module, operation) {
            return true;
        }

        self.is_field_agent()
            && matches!(module, Module::Products | Module::Inventory)
            && matches!(operation, Operation::Read | Operation::Create)
    }
}
