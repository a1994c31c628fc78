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
use fieldstock_core::{Customer, Sale};

use crate::app::services::AppServices;
use crate::app::{dto, errors::ApiError};
use crate::authz;
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new().route("/", post(create_customer).get(list_customers))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Customers, Operation::Read)?;

    let rows = services.customers.find_all().await?;

    // The match keys come from this agent's own sales. If that lookup fails
    // the engine receives no sales and scopes the agent down to nothing
    // (fail-closed), rather than the request failing open or erroring.
    let own_sales: Vec<Sale> = if identity.is_field_agent() {
        match services.sales.find_by_user_id(identity.user_id).await {
            Ok(sales) => sales,
            Err(e) => {
                tracing::warn!(error = %e, user_id = %identity.user_id, "sales lookup failed during customer scoping");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let items = scope::scope_customers(identity, &own_sales, rows);
    Ok((StatusCode::OK, Json(json!({ "items": items }))).into_response())
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<CurrentIdentity>,
    Json(body): Json<dto::CreateCustomerRequest>,
) -> Result<axum::response::Response, ApiError> {
    let identity = identity.require()?;
    authz::require(identity, Module::Customers, Operation::Create)?;

    let customer = Customer::new(body.name, body.phone, body.email, body.address)?;
    let customer = services.customers.create(customer).await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": customer }))).into_response())
}
