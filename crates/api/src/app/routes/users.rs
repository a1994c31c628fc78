//! User administration: list, create, update, delete.
//!
//! Updating your **own** permissions invalidates the session you presented,
//! so that path answers with a freshly issued session/token pair.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use serde_json::json;

use fieldstock_auth::{Module, Operation, Role, UserRecord};
use fieldstock_core::UserId;

use crate::app::services::AppServices;
use crate::app::{cookies, dto, errors, errors::ApiError};
use crate::authz;
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", put(update_user).delete(delete_user))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Users, Operation::Read)?;

    let users = services.users.find_all().await?;
    let items: Vec<_> = users.iter().map(dto::user_view).collect();
    Ok((StatusCode::OK, Json(json!({ "items": items }))).into_response())
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Json(body): Json<dto::RegisterRequest>,
) -> Result<axum::response::Response, ApiError> {
    let caller = identity.require()?;
    authz::require(caller, Module::Users, Operation::Create)?;

    let email = body
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::malformed("email is required"))?;
    let password = body
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::malformed("password is required"))?;
    let name = body
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::malformed("name is required"))?;

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

    // Same ladder as self-registration: superadmins are seeded only, and
    // minting an admin takes a superadmin caller.
    match role {
        Role::Superadmin => {
            return Ok(errors::json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "superadmin accounts cannot be created",
            ));
        }
        Role::Admin if caller.role != Role::Superadmin => {
            return Ok(errors::json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "creating an admin requires a superadmin caller",
            ));
        }
        _ => {}
    }

    let digest = services
        .hasher
        .hash(&password)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let user = services
        .users
        .create(UserRecord::new(email.trim().to_string(), name.trim().to_string(), digest, role))
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, created_by = %caller.user_id, "user created");
    Ok((StatusCode::CREATED, Json(json!({ "user": dto::user_view(&user) }))).into_response())
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Path(id): Path<UserId>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> Result<axum::response::Response, ApiError> {
    let caller = identity.require()?;
    authz::require(caller, Module::Users, Operation::Update)?;

    let Some(mut user) = services.users.find_by_id(id).await? else {
        return Err(ApiError::NotFound("user"));
    };

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::malformed("name cannot be empty"));
        }
        user.name = name;
    }
    let permissions_changed = if let Some(permissions) = body.permissions {
        user.permissions = permissions;
        true
    } else {
        false
    };
    if let Some(api_token) = body.api_token {
        user.api_token = if api_token.is_empty() { None } else { Some(api_token) };
    }

    let user = services.users.update(user).await?;
    tracing::info!(user_id = %user.id, updated_by = %caller.user_id, "user updated");

    // A permission change on the caller's own record makes their presented
    // credentials stale; hand back a fresh pair so the client keeps working.
    if permissions_changed && user.id == caller.user_id {
        let (record, token) = services
            .issuer
            .issue(&user)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        let mut res = (
            StatusCode::OK,
            Json(json!({ "user": dto::user_view(&user), "token": token })),
        )
            .into_response();
        cookies::set_transport_cookies(res.headers_mut(), &record, &token, services.secure_cookies);
        return Ok(res);
    }

    Ok((StatusCode::OK, Json(json!({ "user": dto::user_view(&user) }))).into_response())
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Path(id): Path<UserId>,
) -> Result<axum::response::Response, ApiError> {
    let caller = identity.require()?;
    authz::require(caller, Module::Users, Operation::Delete)?;

    match services.users.delete(id).await {
        Ok(()) => {}
        Err(fieldstock_infra::StoreError::NotFound) => return Err(ApiError::NotFound("user")),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %id, deleted_by = %caller.user_id, "user deleted");
    Ok((StatusCode::OK, Json(json!({ "ok": true }))).into_response())
}
