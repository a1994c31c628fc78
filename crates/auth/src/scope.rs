//! Row-scoping engine: filters domain rows down to what an identity may see.
//!
//! Scoping is distinct from authorization: authorization decides whether an
//! operation is allowed at all, scoping decides which rows a permitted read
//! returns. Filtering applies only to field-agent credentials (role `agent`
//! with an agent-class tag); superadmin and admin see unfiltered sets.
//!
//! Every function here is pure over its inputs:
//! - No IO
//! - No panics
//! - Errors on the caller's lookups must resolve to an **empty** input, never
//!   to the unfiltered set (under-disclosure over over-disclosure).

use std::collections::HashSet;

use fieldstock_core::{Customer, InventoryItem, Product, Sale};

use crate::identity::Identity;
use crate::roles::Role;

/// Strip everything but ASCII digits from a phone string.
///
/// Sales data entry is inconsistent ("+91 98765-43210" vs "9876543210"), so
/// customer matching compares both the verbatim string and this normal form.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Products an identity may see: for a field agent, rows whose `supplier`
/// equals the agent's name case-insensitively (exact match, no substrings).
/// An empty agent name yields nothing.
pub fn scope_products(identity: &Identity, products: Vec<Product>) -> Vec<Product> {
    match identity.role {
        Role::Superadmin | Role::Admin => products,
        Role::Agent => agent_products(identity, products),
    }
}

fn agent_products(identity: &Identity, products: Vec<Product>) -> Vec<Product> {
    if !identity.credential_tag.is_agent_class() {
        return products;
    }

    let name = identity.name.trim();
    if name.is_empty() {
        return Vec::new();
    }

    products
        .into_iter()
        .filter(|p| p.supplier.trim().eq_ignore_ascii_case(name))
        .collect()
}

/// Customers an identity may see.
///
/// A field agent sees customers reachable from their **own** sales through
/// any of three representations: normalized-or-verbatim phone, lowercased
/// name, or the composite `name|phone` key. The OR-match is deliberately
/// permissive; point-of-sale data entry varies in casing and phone format.
pub fn scope_customers(
    identity: &Identity,
    own_sales: &[Sale],
    customers: Vec<Customer>,
) -> Vec<Customer> {
    match identity.role {
        Role::Superadmin | Role::Admin => customers,
        Role::Agent => agent_customers(identity, own_sales, customers),
    }
}

fn agent_customers(identity: &Identity, own_sales: &[Sale], customers: Vec<Customer>) -> Vec<Customer> {
    if !identity.credential_tag.is_agent_class() {
        return customers;
    }

    let mut phones: HashSet<String> = HashSet::new();
    let mut names: HashSet<String> = HashSet::new();
    let mut composites: HashSet<String> = HashSet::new();

    for sale in own_sales {
        // Only this agent's own recorded sales contribute match keys.
        if sale.user_id != identity.user_id {
            continue;
        }
        let name = sale.customer_name.trim().to_lowercase();
        let verbatim = sale.customer_mobile.trim().to_string();
        let normalized = normalize_phone(&verbatim);

        if !verbatim.is_empty() {
            phones.insert(verbatim.clone());
        }
        if !normalized.is_empty() {
            phones.insert(normalized.clone());
        }
        if !name.is_empty() {
            names.insert(name.clone());
        }
        composites.insert(format!("{name}|{normalized}"));
        composites.insert(format!("{name}|{verbatim}"));
    }

    if phones.is_empty() && names.is_empty() {
        return Vec::new();
    }

    customers
        .into_iter()
        .filter(|customer| {
            let name = customer.name.trim().to_lowercase();
            let verbatim = customer.phone.trim().to_string();
            let normalized = normalize_phone(&verbatim);

            (!normalized.is_empty() && phones.contains(&normalized))
                || (!verbatim.is_empty() && phones.contains(&verbatim))
                || (!name.is_empty() && names.contains(&name))
                || composites.contains(&format!("{name}|{normalized}"))
                || composites.contains(&format!("{name}|{verbatim}"))
        })
        .collect()
}

/// Inventory an identity may see: direct ownership match for field agents.
pub fn scope_inventory(identity: &Identity, items: Vec<InventoryItem>) -> Vec<InventoryItem> {
    match identity.role {
        Role::Superadmin | Role::Admin => items,
        Role::Agent => {
            if !identity.credential_tag.is_agent_class() {
                return items;
            }
            items
                .into_iter()
                .filter(|item| item.user_id == identity.user_id)
                .collect()
        }
    }
}

/// Sales an identity may see (applied before any aggregation).
pub fn scope_sales(identity: &Identity, sales: Vec<Sale>) -> Vec<Sale> {
    match identity.role {
        Role::Superadmin | Role::Admin => sales,
        Role::Agent => {
            if !identity.credential_tag.is_agent_class() {
                return sales;
            }
            sales
                .into_iter()
                .filter(|sale| sale.user_id == identity.user_id)
                .collect()
        }
    }
}
