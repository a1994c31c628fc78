//! Request DTOs and response mapping helpers.

use serde::Deserialize;
use serde_json::json;

use fieldstock_auth::{Identity, PermissionSet, UserRecord};

// -------------------------
// Request DTOs
// -------------------------

/// Login fields are optional so a missing field maps to a 400 with a precise
/// message instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub supplier: String,
    pub price: u64,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_name: String,
    pub customer_mobile: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateInventoryItemRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub permissions: Option<PermissionSet>,
    pub api_token: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

/// Public view of a stored user (never exposes the password digest).
pub fn user_view(user: &UserRecord) -> serde_json::Value {
    json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "role": user.role,
        "credential_tag": user.credential_tag.as_str(),
        "permissions": user.permissions,
        "created_at": user.created_at,
    })
}

/// View of a resolved identity (`/auth/me`).
pub fn identity_view(identity: &Identity) -> serde_json::Value {
    json!({
        "id": identity.user_id,
        "email": identity.email,
        "name": identity.name,
        "role": identity.role,
        "credential_tag": identity.credential_tag.as_str(),
        "permissions": identity.permissions,
    })
}
