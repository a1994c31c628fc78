//! Domain read models owned by the external document store.
//!
//! The core never creates or destroys these; it only filters views of them.
//! Matching between them is indirect: sales reference customers by recorded
//! name/phone strings, and products reference an agent profile through the
//! `supplier` name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{CustomerId, InventoryItemId, ProductId, SaleId, UserId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    /// Supplier display name; matched case-insensitively against an
    /// agent identity's name when scoping.
    pub supplier: String,
    /// Unit price in minor currency units.
    pub price: u64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        supplier: impl Into<String>,
        price: u64,
        quantity: i64,
    ) -> DomainResult<Self> {
        let name = trimmed(name, "product name")?;
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(Self {
            id: ProductId::new(),
            name,
            sku: sku.into().trim().to_string(),
            supplier: supplier.into().trim().to_string(),
            price,
            quantity,
            created_at: Utc::now(),
        })
    }
}

/// A customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Free-form phone string as entered; formatting varies.
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: Option<String>,
        address: Option<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: CustomerId::new(),
            name: trimmed(name, "customer name")?,
            phone: phone.into().trim().to_string(),
            email,
            address,
            created_at: Utc::now(),
        })
    }
}

/// A recorded sale.
///
/// The customer is referenced by the name/phone strings captured at the
/// point of sale, not by a foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// The agent who recorded the sale.
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_mobile: String,
    /// Sale total in minor currency units.
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    pub fn new(
        user_id: UserId,
        customer_name: impl Into<String>,
        customer_mobile: impl Into<String>,
        amount: u64,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: SaleId::new(),
            user_id,
            customer_name: trimmed(customer_name, "customer name")?,
            customer_mobile: customer_mobile.into().trim().to_string(),
            amount,
            created_at: Utc::now(),
        })
    }
}

/// An inventory item owned by a specific user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub user_id: UserId,
    pub name: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(user_id: UserId, name: impl Into<String>, quantity: i64) -> DomainResult<Self> {
        let name = trimmed(name, "item name")?;
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(Self {
            id: InventoryItemId::new(),
            user_id,
            name,
            quantity,
            created_at: Utc::now(),
        })
    }
}

fn trimmed(value: impl Into<String>, field: &str) -> DomainResult<String> {
    let value = value.into().trim().to_string();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}
