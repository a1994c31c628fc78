//! In-memory store adapters for dev/test.
//!
//! These mirror the external document store's contract over a
//! `RwLock<HashMap>`; a poisoned lock surfaces as `Unavailable` rather than
//! panicking through the request path.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use async_trait::async_trait;

use fieldstock_auth::UserRecord;
use fieldstock_core::{
    Customer, CustomerId, InventoryItem, InventoryItemId, Product, ProductId, Sale, SaleId, UserId,
};

use super::{
    CredentialStore, CustomerStore, InventoryStore, ProductStore, SaleStore, StoreError,
};

/// Shared keyed table used by every in-memory adapter.
#[derive(Debug)]
struct Table<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Table<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn list(&self) -> Result<Vec<V>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn find<F: Fn(&V) -> bool>(&self, pred: F) -> Result<Option<V>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().find(|v| pred(v)).cloned())
    }

    fn filter<F: Fn(&V) -> bool>(&self, pred: F) -> Result<Vec<V>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().filter(|v| pred(v)).cloned().collect())
    }

    fn insert(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(key, value);
        Ok(())
    }

    fn replace(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if !map.contains_key(&key) {
            return Err(StoreError::NotFound);
        }
        map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(key).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Credential store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InMemoryCredentialStore {
    users: Table<UserId, UserRecord>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Table::new(),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.users.find(|u| u.email.eq_ignore_ascii_case(email))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        self.users.get(&id)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError> {
        self.users
            .find(|u| u.api_token.as_deref() == Some(token))
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.users.list()
    }

    async fn create(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        if self
            .users
            .find(|u| u.email.eq_ignore_ascii_case(&user.email))?
            .is_some()
        {
            return Err(StoreError::Duplicate(user.email));
        }
        self.users.insert(user.id, user.clone())?;
        Ok(user)
    }

    async fn update(&self, user: UserRecord) -> Result<UserRecord, StoreError> {
        self.users.replace(user.id, user.clone())?;
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.users.remove(&id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain stores
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! in_memory_store {
    ($name:ident, $trait:ident, $id:ty, $entity:ty) => {
        #[derive(Debug)]
        pub struct $name {
            rows: Table<$id, $entity>,
        }

        impl $name {
            pub fn new() -> Self {
                Self { rows: Table::new() }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        #[async_trait]
        impl $trait for $name {
            async fn find_all(&self) -> Result<Vec<$entity>, StoreError> {
                self.rows.list()
            }

            async fn find_by_id(&self, id: $id) -> Result<Option<$entity>, StoreError> {
                self.rows.get(&id)
            }

            async fn create(&self, row: $entity) -> Result<$entity, StoreError> {
                self.rows.insert(row.id, row.clone())?;
                Ok(row)
            }

            async fn update(&self, row: $entity) -> Result<$entity, StoreError> {
                self.rows.replace(row.id, row.clone())?;
                Ok(row)
            }

            async fn delete(&self, id: $id) -> Result<(), StoreError> {
                self.rows.remove(&id)
            }
        }
    };
}

in_memory_store!(InMemoryProductStore, ProductStore, ProductId, Product);
in_memory_store!(InMemoryCustomerStore, CustomerStore, CustomerId, Customer);

#[derive(Debug)]
pub struct InMemorySaleStore {
    rows: Table<SaleId, Sale>,
}

impl InMemorySaleStore {
    pub fn new() -> Self {
        Self { rows: Table::new() }
    }
}

impl Default for InMemorySaleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SaleStore for InMemorySaleStore {
    async fn find_all(&self) -> Result<Vec<Sale>, StoreError> {
        self.rows.list()
    }

    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>, StoreError> {
        self.rows.get(&id)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Sale>, StoreError> {
        self.rows.filter(|s| s.user_id == user_id)
    }

    async fn create(&self, sale: Sale) -> Result<Sale, StoreError> {
        self.rows.insert(sale.id, sale.clone())?;
        Ok(sale)
    }

    async fn update(&self, sale: Sale) -> Result<Sale, StoreError> {
        self.rows.replace(sale.id, sale.clone())?;
        Ok(sale)
    }

    async fn delete(&self, id: SaleId) -> Result<(), StoreError> {
        self.rows.remove(&id)
    }
}

#[derive(Debug)]
pub struct InMemoryInventoryStore {
    rows: Table<InventoryItemId, InventoryItem>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self { rows: Table::new() }
    }
}

impl Default for InMemoryInventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn find_all(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.rows.list()
    }

    async fn find_by_id(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, StoreError> {
        self.rows.get(&id)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<InventoryItem>, StoreError> {
        self.rows.filter(|i| i.user_id == user_id)
    }

    async fn create(&self, item: InventoryItem) -> Result<InventoryItem, StoreError> {
        self.rows.insert(item.id, item.clone())?;
        Ok(item)
    }

    async fn update(&self, item: InventoryItem) -> Result<InventoryItem, StoreError> {
        self.rows.replace(item.id, item.clone())?;
        Ok(item)
    }

    async fn delete(&self, id: InventoryItemId) -> Result<(), StoreError> {
        self.rows.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use fieldstock_auth::Role;

    use super::*;

    #[tokio::test]
    async fn credential_store_lifecycle() {
        let store = InMemoryCredentialStore::new();
        let user = UserRecord::new("a@example.com", "A", "digest", Role::Admin);
        let created = store.create(user.clone()).await.unwrap();

        assert_eq!(
            store.find_by_id(created.id).await.unwrap().unwrap().email,
            "a@example.com"
        );
        assert!(store.find_by_email("A@EXAMPLE.COM").await.unwrap().is_some());

        store.delete(created.id).await.unwrap();
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
        assert_eq!(store.delete(created.id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store
            .create(UserRecord::new("a@example.com", "A", "d", Role::Agent))
            .await
            .unwrap();
        let err = store
            .create(UserRecord::new("A@example.com", "B", "d", Role::Agent))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn api_token_lookup() {
        let store = InMemoryCredentialStore::new();
        let mut user = UserRecord::new("a@example.com", "A", "d", Role::Agent);
        user.api_token = Some("opaque-token".to_string());
        store.create(user.clone()).await.unwrap();

        let found = store.find_by_token("opaque-token").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.find_by_token("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sales_filter_by_user() {
        use chrono::Utc;
        use fieldstock_core::{Sale, SaleId};

        let store = InMemorySaleStore::new();
        let mine = UserId::new();
        for (user_id, name) in [(mine, "a"), (mine, "b"), (UserId::new(), "c")] {
            store
                .create(Sale {
                    id: SaleId::new(),
                    user_id,
                    customer_name: name.to_string(),
                    customer_mobile: "1".to_string(),
                    amount: 10,
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.find_by_user_id(mine).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let store = InMemoryProductStore::new();
        use chrono::Utc;
        use fieldstock_core::{Product, ProductId};
        let row = Product {
            id: ProductId::new(),
            name: "W".to_string(),
            sku: "W-1".to_string(),
            supplier: "S".to_string(),
            price: 1,
            quantity: 1,
            created_at: Utc::now(),
        };
        assert_eq!(store.update(row).await.unwrap_err(), StoreError::NotFound);
    }
}
