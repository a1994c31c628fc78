//! Session codec: serializes a session record to/from its transport token.
//!
//! The transport form is base64url-encoded JSON, bounded at [`MAX_SESSION_BYTES`]
//! **before** any structural parsing. Decoding never raises into a caller's
//! happy path: every failure mode collapses to `None`, which callers treat
//! identically to "no session".

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldstock_core::UserId;

use crate::identity::CredentialTag;
use crate::permissions::PermissionSet;
use crate::roles::Role;

/// Upper bound on an inbound session token, checked before parsing.
pub const MAX_SESSION_BYTES: usize = 10 * 1024;

/// The serialized session carried by the transport token.
///
/// Created at login/registration, replaced wholesale when the user's own
/// permissions change, and discarded at logout by clearing the transport
/// cookie. There is no server-side revocation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub credential_tag: CredentialTag,
    pub permissions: PermissionSet,
    pub issued_at: DateTime<Utc>,
}

/// Lenient wire shape used for sanitizing decode.
///
/// Unknown fields are dropped by serde; `role` is kept as a raw string so an
/// unrecognized value fails the whole decode, while malformed `permissions`
/// degrade to the empty set instead.
#[derive(Deserialize)]
struct RawSession {
    user_id: UserId,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    role: String,
    #[serde(default)]
    credential_tag: String,
    #[serde(default)]
    permissions: serde_json::Value,
    issued_at: DateTime<Utc>,
}

/// Encode a session record to its transport token.
pub fn encode(record: &SessionRecord) -> String {
    // Serialization of a well-formed record cannot fail; the fallback keeps
    // the codec total.
    let json = serde_json::to_vec(record).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a transport token back into a sanitized session record.
///
/// The size bound is enforced on the raw input first, independent of content
/// validity, so parsing cost stays bounded.
pub fn decode(raw: &str, max_size: usize) -> Option<SessionRecord> {
    if raw.len() > max_size {
        tracing::debug!(len = raw.len(), "session token exceeds size bound");
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
    let raw: RawSession = serde_json::from_slice(&bytes).ok()?;
    let role: Role = raw.role.parse().ok()?;

    // A session whose permissions snapshot is unreadable is still a valid
    // session; it simply authorizes nothing.
    let permissions =
        serde_json::from_value::<PermissionSet>(raw.permissions).unwrap_or_default();

    Some(SessionRecord {
        user_id: raw.user_id,
        email: raw.email,
        name: raw.name,
        role,
        credential_tag: CredentialTag::new(raw.credential_tag),
        permissions,
        issued_at: raw.issued_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::default_permissions;

    fn record() -> SessionRecord {
        SessionRecord {
            user_id: UserId::new(),
            email: "agent@example.com".to_string(),
            name: "Agent X".to_string(),
            role: Role::Agent,
            credential_tag: CredentialTag::for_role(Role::Agent),
            permissions: default_permissions(Role::Agent),
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn round_trip() {
        let original = record();
        let decoded = decode(&encode(&original), MAX_SESSION_BYTES).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn oversize_rejected_before_parsing() {
        // Not even valid base64; size must short-circuit first.
        let huge = "!".repeat(MAX_SESSION_BYTES + 1);
        assert!(decode(&huge, MAX_SESSION_BYTES).is_none());
    }

    #[test]
    fn garbage_decodes_to_none() {
        assert!(decode("not base64 at all!!", MAX_SESSION_BYTES).is_none());
        let junk = URL_SAFE_NO_PAD.encode(b"{\"half\": ");
        assert!(decode(&junk, MAX_SESSION_BYTES).is_none());
    }

    #[test]
    fn unknown_role_fails_decode() {
        let mut value = serde_json::to_value(record()).unwrap();
        value["role"] = serde_json::json!("root");
        let token = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&value).unwrap());
        assert!(decode(&token, MAX_SESSION_BYTES).is_none());
    }

    #[test]
    fn malformed_permissions_degrade_to_empty_set() {
        let mut value = serde_json::to_value(record()).unwrap();
        value["permissions"] = serde_json::json!({"module": 42});
        let token = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&value).unwrap());
        let decoded = decode(&token, MAX_SESSION_BYTES).unwrap();
        assert!(decoded.permissions.is_empty());
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let mut value = serde_json::to_value(record()).unwrap();
        value["injected"] = serde_json::json!("payload");
        let token = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&value).unwrap());
        assert!(decode(&token, MAX_SESSION_BYTES).is_some());
    }

    #[test]
    fn missing_user_id_fails_decode() {
        let mut value = serde_json::to_value(record()).unwrap();
        value.as_object_mut().unwrap().remove("user_id");
        let token = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&value).unwrap());
        assert!(decode(&token, MAX_SESSION_BYTES).is_none());
    }
}
