//! Authentication surface: login, register, logout, me.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use fieldstock_auth::{Role, UserRecord};

use crate::app::services::AppServices;
use crate::app::{cookies, dto, errors, errors::ApiError};
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Result<axum::response::Response, ApiError> {
    let email = required_field(body.email, "email")?;
    let password = required_field(body.password, "password")?;

    let Some(user) = services.users.find_by_email(&email).await? else {
        return Ok(invalid_credentials());
    };

    let ok = services
        .hasher
        .verify(&password, &user.password)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !ok {
        // No cookies, no token: an unverified caller gets nothing to replay.
        return Ok(invalid_credentials());
    }

    Ok(issue_response(&services, &user, StatusCode::OK))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Json(body): Json<dto::RegisterRequest>,
) -> Result<axum::response::Response, ApiError> {
    let email = required_field(body.email, "email")?;
    let password = required_field(body.password, "password")?;
    let name = required_field(body.name, "name")?;

    if !email.contains('@') {
        return Err(ApiError::malformed("invalid email format"));
    }
    if password.len() < 8 {
        return Err(ApiError::malformed("password must be at least 8 characters"));
    }

    let role = match body.role.as_deref() {
        None => Role::Agent,
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|_| ApiError::malformed(format!("unknown role: {raw}")))?,
    };

    match role {
        // Superadmin accounts are seeded, never registered.
        Role::Superadmin => {
            return Ok(errors::json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "superadmin accounts cannot be registered",
            ));
        }
        Role::Admin => {
            let caller_is_superadmin =
                identity.get().is_some_and(|i| i.role == Role::Superadmin);
            if !caller_is_superadmin {
                return Ok(errors::json_error(
                    StatusCode::FORBIDDEN,
                    "forbidden",
                    "admin registration requires a superadmin caller",
                ));
            }
        }
        Role::Agent => {}
    }

    let digest = services
        .hasher
        .hash(&password)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let user = services
        .users
        .create(UserRecord::new(email, name, digest, role))
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");
    Ok(issue_response(&services, &user, StatusCode::CREATED))
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let mut res = (StatusCode::OK, Json(json!({ "ok": true }))).into_response();
    cookies::clear_transport_cookies(res.headers_mut(), services.secure_cookies);
    res
}

pub async fn me(
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    Ok((
        StatusCode::OK,
        Json(json!({ "user": dto::identity_view(identity) })),
    )
        .into_response())
}

/// Mint the paired credentials and attach them as body + cookies.
fn issue_response(
    services: &AppServices,
    user: &UserRecord,
    status: StatusCode,
) -> axum::response::Response {
    let (record, token) = match services.issuer.issue(user) {
        Ok(pair) => pair,
        Err(e) => return ApiError::internal(e.to_string()).into_response(),
    };

    let mut res = (
        status,
        Json(json!({ "user": dto::user_view(user), "token": token })),
    )
        .into_response();
    cookies::set_transport_cookies(res.headers_mut(), &record, &token, services.secure_cookies);
    res
}

fn invalid_credentials() -> axum::response::Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "invalid email or password",
    )
}

fn required_field(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::malformed(format!("{field} is required")))
}
