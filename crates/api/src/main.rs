use std::sync::Arc;

use fieldstock_api::app::{build_app, services::AppServices};
use fieldstock_api::config::ApiConfig;

#[tokio::main]
async fn main() {
    fieldstock_observability::init();

    let config = ApiConfig::from_env();
    let services = Arc::new(AppServices::in_memory(&config));

    // Superadmins can only be seeded, never registered.
    if let (Ok(email), Ok(password)) =
        (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
    {
        let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Superadmin".to_string());
        match services.seed_superadmin(&email, &name, &password).await {
            Ok(user) => tracing::info!(user_id = %user.id, "superadmin ready"),
            Err(e) => {
                tracing::error!(error = %e, "failed to seed superadmin");
                std::process::exit(1);
            }
        }
    } else {
        tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; no superadmin seeded");
    }

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
