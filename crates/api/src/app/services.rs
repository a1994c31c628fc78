//! Service wiring: store adapters, password hasher and token issuer.

use std::sync::Arc;

use fieldstock_auth::{Argon2Hasher, PasswordHasher, Role, TokenIssuer, UserRecord};
use fieldstock_infra::{
    CredentialStore, CustomerStore, InMemoryCredentialStore, InMemoryCustomerStore,
    InMemoryInventoryStore, InMemoryProductStore, InMemorySaleStore, InventoryStore,
    ProductStore, SaleStore,
};

use crate::config::ApiConfig;

/// Everything the handlers need, behind trait objects so the storage backend
/// stays an external concern.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn CredentialStore>,
    pub products: Arc<dyn ProductStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub sales: Arc<dyn SaleStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub issuer: Arc<TokenIssuer>,
    pub secure_cookies: bool,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory(config: &ApiConfig) -> Self {
        Self {
            users: Arc::new(InMemoryCredentialStore::new()),
            products: Arc::new(InMemoryProductStore::new()),
            customers: Arc::new(InMemoryCustomerStore::new()),
            sales: Arc::new(InMemorySaleStore::new()),
            inventory: Arc::new(InMemoryInventoryStore::new()),
            hasher: Arc::new(Argon2Hasher::new()),
            issuer: Arc::new(TokenIssuer::new(config.jwt_secret.as_bytes())),
            secure_cookies: config.secure_cookies,
        }
    }

    /// Seed (or fetch) the bootstrap superadmin account.
    ///
    /// Superadmin accounts cannot be registered over HTTP, so the first one
    /// has to come from here: env-driven in `main`, direct in tests.
    pub async fn seed_superadmin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> anyhow::Result<UserRecord> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            return Ok(existing);
        }
        let digest = self.hasher.hash(password)?;
        let user = UserRecord::new(email, name, digest, Role::Superadmin);
        Ok(self.users.create(user).await?)
    }
}
