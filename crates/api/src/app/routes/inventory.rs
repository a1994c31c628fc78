use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use fieldstock_auth::{scope, Module, Operation};
use fieldstock_core::InventoryItem;

use crate::app::services::AppServices;
use crate::app::{dto, errors::ApiError};
use crate::authz;
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new().route("/", post(create_item).get(list_items))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Inventory, Operation::Read)?;

    let rows = services.inventory.find_all().await?;
    let items = scope::scope_inventory(identity, rows);
    Ok((StatusCode::OK, Json(json!({ "items": items }))).into_response())
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Json(body): Json<dto::CreateInventoryItemRequest>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Inventory, Operation::Create)?;

    let item = InventoryItem::new(identity.user_id, body.name, body.quantity)?;
    let item = services.inventory.create(item).await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": item }))).into_response())
}
