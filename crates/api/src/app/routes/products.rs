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
use fieldstock_core::Product;

use crate::app::services::AppServices;
use crate::app::{dto, errors::ApiError};
use crate::authz;
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new().route("/", post(create_product).get(list_products))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Products, Operation::Read)?;

    let rows = services.products.find_all().await?;
    let items = scope::scope_products(identity, rows);

    Ok((StatusCode::OK, Json(json!({ "items": items }))).into_response())
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Json(body): Json<dto::CreateProductRequest>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Products, Operation::Create)?;

    let product = Product::new(body.name, body.sku, body.supplier, body.price, body.quantity)?;
    let product = services.products.create(product).await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": product }))).into_response())
}
