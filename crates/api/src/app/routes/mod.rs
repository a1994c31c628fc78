//! Routing tree: one module per domain area.

use axum::Router;

pub mod auth;
pub mod customers;
pub mod inventory;
pub mod products;
pub mod sales;
pub mod system;
pub mod users;

pub fn router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/customers", customers::router())
        .nest("/inventory", inventory::router())
        .nest("/sales", sales::router())
        .nest("/users", users::router())
}
