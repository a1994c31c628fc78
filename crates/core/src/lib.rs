//! `fieldstock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entities;
pub mod error;
pub mod id;

pub use entities::{Customer, InventoryItem, Product, Sale};
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, InventoryItemId, ProductId, SaleId, UserId};
