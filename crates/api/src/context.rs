//! Explicit request context: the resolved identity travels with the request.
//!
//! There is no ambient/global session state; the resolution middleware
//! inserts this extension on every request (anonymous included) and handlers
//! read it explicitly.

use fieldstock_auth::Identity;

use crate::app::errors::ApiError;

/// The identity resolved for the current request, if any.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(Option<Identity>);

impl CurrentIdentity {
    pub fn new(identity: Option<Identity>) -> Self {
        Self(identity)
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    /// The sole authentication gate for protected handlers.
    pub fn require(&self) -> Result<&Identity, ApiError> {
        self.0.as_ref().ok_or(ApiError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use fieldstock_auth::{default_permissions, CredentialTag, Role};
    use fieldstock_core::UserId;

    use super::*;

    #[test]
    fn anonymous_context_refuses_require() {
        let ctx = CurrentIdentity::anonymous();
        assert!(ctx.get().is_none());
        assert!(matches!(ctx.require(), Err(ApiError::Unauthenticated)));
    }

    #[test]
    fn resolved_context_yields_the_identity() {
        let identity = Identity {
            user_id: UserId::new(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            role: Role::Admin,
            credential_tag: CredentialTag::for_role(Role::Admin),
            permissions: default_permissions(Role::Admin),
        };
        let ctx = CurrentIdentity::new(Some(identity.clone()));
        assert_eq!(ctx.require().unwrap(), &identity);
    }
}
