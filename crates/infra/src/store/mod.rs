//! Store interfaces consumed by the request layer.
//!
//! All lookups are awaited sequentially within a request; no adapter spawns
//! background work or takes an explicit timeout.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use fieldstock_auth::UserRecord;
use fieldstock_core::{
    Customer, CustomerId, InventoryItem, InventoryItemId, Product, ProductId, Sale, SaleId, UserId,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Lookup and lifecycle of user records.
///
/// `password` on stored records is always a pre-hashed digest.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;
    /// Resolve an opaque per-user API token.
    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn find_all(&self) -> Result<Vec<UserRecord>, StoreError>;
    async fn create(&self, user: UserRecord) -> Result<UserRecord, StoreError>;
    async fn update(&self, user: UserRecord) -> Result<UserRecord, StoreError>;
    async fn delete(&self, id: UserId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    async fn create(&self, product: Product) -> Result<Product, StoreError>;
    async fn update(&self, product: Product) -> Result<Product, StoreError>;
    async fn delete(&self, id: ProductId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError>;
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;
    async fn create(&self, customer: Customer) -> Result<Customer, StoreError>;
    async fn update(&self, customer: Customer) -> Result<Customer, StoreError>;
    async fn delete(&self, id: CustomerId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Sale>, StoreError>;
    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>, StoreError>;
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Sale>, StoreError>;
    async fn create(&self, sale: Sale) -> Result<Sale, StoreError>;
    async fn update(&self, sale: Sale) -> Result<Sale, StoreError>;
    async fn delete(&self, id: SaleId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<InventoryItem>, StoreError>;
    async fn find_by_id(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, StoreError>;
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<InventoryItem>, StoreError>;
    async fn create(&self, item: InventoryItem) -> Result<InventoryItem, StoreError>;
    async fn update(&self, item: InventoryItem) -> Result<InventoryItem, StoreError>;
    async fn delete(&self, id: InventoryItemId) -> Result<(), StoreError>;
}
