use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use fieldstock_auth::{scope, Module, Operation};
use fieldstock_core::Sale;

use crate::app::services::AppServices;
use crate::app::{dto, errors::ApiError};
use crate::authz;
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_sale).get(list_sales))
        .route("/summary", get(sales_summary))
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Sales, Operation::Read)?;

    let rows = services.sales.find_all().await?;
    let items = scope::scope_sales(identity, rows);
    Ok((StatusCode::OK, Json(json!({ "items": items }))).into_response())
}

/// Aggregates run over the scoped set, so an agent's summary covers only
/// their own sales.
pub async fn sales_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Sales, Operation::Read)?;

    let rows = services.sales.find_all().await?;
    let scoped = scope::scope_sales(identity, rows);

    let count = scoped.len();
    let total_amount: u64 = scoped.iter().map(|s| s.amount).sum();

    Ok((
        StatusCode::OK,
        Json(json!({ "count": count, "total_amount": total_amount })),
    )
        .into_response())
}

pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Json(body): Json<dto::CreateSaleRequest>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Sales, Operation::Create)?;

    let sale = Sale::new(
        identity.user_id,
        body.customer_name,
        body.customer_mobile,
        body.amount,
    )?;
    let sale = services.sales.create(sale).await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": sale }))).into_response())
}
