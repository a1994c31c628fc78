//! `fieldstock-infra` — external-collaborator adapters.
//!
//! The document store itself is an external concern; this crate holds the
//! narrow async interfaces the core consumes, plus in-memory implementations
//! for dev and tests.

pub mod store;

pub use store::{
    CredentialStore, CustomerStore, InventoryStore, ProductStore, SaleStore, StoreError,
};
pub use store::memory::{
    InMemoryCredentialStore, InMemoryCustomerStore, InMemoryInventoryStore,
    InMemoryProductStore, InMemorySaleStore,
};
