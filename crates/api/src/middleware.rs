//! Session resolution: turns inbound request credentials into an [`Identity`].
//!
//! This is the sole authentication gate; every protected capability check and
//! data read downstream depends on its output. Credential sources in order:
//! `Authorization: Bearer` header, `token` query parameter, session cookie.
//! Whichever source yields a user id, the authoritative store is consulted
//! for fresh role/permissions; embedded claims are used only when the store
//! is unreachable. Structural failures of any kind resolve to "no identity",
//! never to an error on the caller's path.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use cookie::Cookie;

use fieldstock_auth::{session, token, Identity, TokenIssuer, MAX_SESSION_BYTES};
use fieldstock_infra::CredentialStore;

use crate::app::cookies::SESSION_COOKIE;
use crate::context::CurrentIdentity;

#[derive(Clone)]
pub struct AuthState {
    pub issuer: Arc<TokenIssuer>,
    pub users: Arc<dyn CredentialStore>,
}

/// Resolve and attach the request identity (anonymous requests included).
pub async fn resolve_identity(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let query = req.uri().query().map(str::to_string);
    let identity = resolve(&state, req.headers(), query.as_deref()).await;

    if let Some(identity) = &identity {
        tracing::debug!(user_id = %identity.user_id, role = %identity.role, "identity resolved");
    }

    req.extensions_mut().insert(CurrentIdentity::new(identity));
    next.run(req).await
}

/// The resolution algorithm, separated from the middleware plumbing.
///
/// Idempotent: identical request state yields an identical identity (modulo
/// concurrent permission changes in the store).
pub async fn resolve(
    state: &AuthState,
    headers: &HeaderMap,
    query: Option<&str>,
) -> Option<Identity> {
    let bearer = extract_bearer(headers)
        .map(str::to_string)
        .or_else(|| query.and_then(token_param));

    if let Some(bearer) = bearer {
        if let Ok(claims) = state.issuer.verify(&bearer) {
            return freshen(state, claims.sub, Some(claims.to_session())).await;
        }

        // Not a verifiable signed token; try it as an opaque per-user
        // API token before treating the request as cookie-only.
        match state.users.find_by_token(&bearer).await {
            Ok(Some(user)) => return Some(Identity::from_record(&user)),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "credential store failed during token lookup"),
        }
    }

    if let Some(raw) = session_cookie(headers) {
        if let Some(record) = session::decode(&raw, MAX_SESSION_BYTES) {
            // The transport enforces Max-Age, but a replayed cookie must
            // still expire server-side.
            if token::session_expires_at(&record) <= chrono::Utc::now() {
                return None;
            }
            let user_id = record.user_id;
            return freshen(state, user_id, Some(record)).await;
        }
    }

    None
}

/// Prefer the authoritative store; fall back to embedded claims only on
/// store failure. A user the store positively does not know stays anonymous,
/// so stale claims cannot resurrect a deleted account.
async fn freshen(
    state: &AuthState,
    user_id: fieldstock_core::UserId,
    fallback: Option<fieldstock_auth::SessionRecord>,
) -> Option<Identity> {
    match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => Some(Identity::from_record(&user)),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, %user_id, "credential store unavailable; using embedded claims");
            fallback.map(Identity::from_session)
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn token_param(query: &str) -> Option<String> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for cookie in Cookie::split_parse(raw.to_string()).flatten() {
            if cookie.name() == SESSION_COOKIE {
                return Some(cookie.value().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use fieldstock_auth::{
        default_permissions, Module, Operation, PermissionSet, Role, UserRecord,
    };
    use fieldstock_infra::InMemoryCredentialStore;

    use super::*;

    fn state() -> AuthState {
        AuthState {
            issuer: Arc::new(TokenIssuer::new(b"test-secret")),
            users: Arc::new(InMemoryCredentialStore::new()),
        }
    }

    async fn seeded_user(state: &AuthState, role: Role) -> UserRecord {
        state
            .users
            .create(UserRecord::new("u@example.com", "U", "digest", role))
            .await
            .unwrap()
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    fn cookie_headers(session_value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={session_value}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn anonymous_without_credentials() {
        let state = state();
        assert!(resolve(&state, &HeaderMap::new(), None).await.is_none());
    }

    #[tokio::test]
    async fn bearer_token_resolves_identity() {
        let state = state();
        let user = seeded_user(&state, Role::Admin).await;
        let (_, token) = state.issuer.issue(&user).unwrap();

        let identity = resolve(&state, &bearer_headers(&token), None).await.unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn session_cookie_resolves_identity() {
        let state = state();
        let user = seeded_user(&state, Role::Agent).await;
        let (record, _) = state.issuer.issue(&user).unwrap();

        let headers = cookie_headers(&session::encode(&record));
        let identity = resolve(&state, &headers, None).await.unwrap();
        assert_eq!(identity.user_id, user.id);
    }

    #[tokio::test]
    async fn token_query_parameter_resolves_identity() {
        let state = state();
        let user = seeded_user(&state, Role::Agent).await;
        let (_, token) = state.issuer.issue(&user).unwrap();

        let query = format!("page=1&token={token}");
        let identity = resolve(&state, &HeaderMap::new(), Some(&query)).await.unwrap();
        assert_eq!(identity.user_id, user.id);
    }

    #[tokio::test]
    async fn fresh_store_permissions_win_over_stale_claims() {
        let state = state();
        let mut user = seeded_user(&state, Role::Agent).await;
        let (_, token) = state.issuer.issue(&user).unwrap();

        // Grants change after the token was minted.
        user.permissions = PermissionSet::empty();
        state.users.update(user.clone()).await.unwrap();

        let identity = resolve(&state, &bearer_headers(&token), None).await.unwrap();
        assert!(identity.permissions.is_empty());
        assert!(!identity.permissions.has(Module::Sales, Operation::Read));
    }

    #[tokio::test]
    async fn deleted_user_is_anonymous_despite_valid_token() {
        let state = state();
        let user = seeded_user(&state, Role::Admin).await;
        let (_, token) = state.issuer.issue(&user).unwrap();
        state.users.delete(user.id).await.unwrap();

        assert!(resolve(&state, &bearer_headers(&token), None).await.is_none());
    }

    #[tokio::test]
    async fn invalid_bearer_falls_through_to_cookie() {
        let state = state();
        let user = seeded_user(&state, Role::Agent).await;
        let (record, _) = state.issuer.issue(&user).unwrap();

        let mut headers = cookie_headers(&session::encode(&record));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-a-real-token"),
        );

        let identity = resolve(&state, &headers, None).await.unwrap();
        assert_eq!(identity.user_id, user.id);
    }

    #[tokio::test]
    async fn opaque_api_token_resolves_via_store() {
        let state = state();
        let mut user = seeded_user(&state, Role::Agent).await;
        user.api_token = Some("svc-token-123".to_string());
        state.users.update(user.clone()).await.unwrap();

        let identity = resolve(&state, &bearer_headers("svc-token-123"), None)
            .await
            .unwrap();
        assert_eq!(identity.user_id, user.id);
    }

    #[tokio::test]
    async fn expired_session_cookie_is_anonymous() {
        let state = state();
        let user = seeded_user(&state, Role::Agent).await;
        let (mut record, _) = state.issuer.issue(&user).unwrap();
        record.issued_at = chrono::Utc::now() - chrono::Duration::days(8);

        let headers = cookie_headers(&session::encode(&record));
        assert!(resolve(&state, &headers, None).await.is_none());
    }

    #[tokio::test]
    async fn garbage_cookie_is_anonymous() {
        let state = state();
        seeded_user(&state, Role::Agent).await;
        let headers = cookie_headers("definitely!!not@@a##session");
        assert!(resolve(&state, &headers, None).await.is_none());
    }

    #[tokio::test]
    async fn resolution_is_idempotent_for_identical_request_state() {
        let state = state();
        let user = seeded_user(&state, Role::Agent).await;
        let (_, token) = state.issuer.issue(&user).unwrap();
        let headers = bearer_headers(&token);

        let first = resolve(&state, &headers, None).await.unwrap();
        let second = resolve(&state, &headers, None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.permissions, default_permissions(Role::Agent));
    }
}
