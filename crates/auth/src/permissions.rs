//! Permission model: `(module, operation)` grants with a fixed default table.
//!
//! Presence of a pair in a [`PermissionSet`] is a grant, absence is a deny.
//! There is no wildcard and no hierarchy; an explicit pair is required.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Protected application module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Products,
    Customers,
    Inventory,
    Sales,
    Users,
}

impl Module {
    pub const ALL: [Module; 5] = [
        Module::Products,
        Module::Customers,
        Module::Inventory,
        Module::Sales,
        Module::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Products => "products",
            Module::Customers => "customers",
            Module::Inventory => "inventory",
            Module::Sales => "sales",
            Module::Users => "users",
        }
    }
}

/// Operation on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// A single `(module, operation)` grant, e.g. `products:read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    pub module: Module,
    pub operation: Operation,
}

impl Permission {
    pub fn new(module: Module, operation: Operation) -> Self {
        Self { module, operation }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.module.as_str(), self.operation.as_str())
    }
}

/// An ordered set of grants keyed by `(module, operation)`.
///
/// A pair appears at most once; membership is the whole contract
/// (default-deny).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: Module, operation: Operation) {
        self.0.insert(Permission::new(module, operation));
    }

    pub fn remove(&mut self, module: Module, operation: Operation) {
        self.0.remove(&Permission::new(module, operation));
    }

    /// Pure membership test: true iff the exact pair is present.
    pub fn has(&self, module: Module, operation: Operation) -> bool {
        self.0.contains(&Permission::new(module, operation))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Default grant table per role.
///
/// This is configuration, not an algorithm:
/// - superadmin: every pair.
/// - admin: every pair except destructive user management
///   (`users:update`, `users:delete`).
/// - agent: read/create on the operational modules, nothing on users.
pub fn default_permissions(role: Role) -> PermissionSet {
    let mut set = PermissionSet::empty();
    match role {
        Role::Superadmin => {
            for module in Module::ALL {
                for operation in Operation::ALL {
                    set.insert(module, operation);
                }
            }
        }
        Role::Admin => {
            for module in Module::ALL {
                for operation in Operation::ALL {
                    set.insert(module, operation);
                }
            }
            set.remove(Module::Users, Operation::Update);
            set.remove(Module::Users, Operation::Delete);
        }
        Role::Agent => {
            for module in [
                Module::Products,
                Module::Customers,
                Module::Inventory,
                Module::Sales,
            ] {
                set.insert(module, Operation::Read);
                set.insert(module, Operation::Create);
            }
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superadmin_has_every_pair() {
        let set = default_permissions(Role::Superadmin);
        assert_eq!(set.len(), Module::ALL.len() * Operation::ALL.len());
        for module in Module::ALL {
            for operation in Operation::ALL {
                assert!(set.has(module, operation), "{module:?}:{operation:?}");
            }
        }
    }

    #[test]
    fn admin_lacks_only_destructive_user_management() {
        let set = default_permissions(Role::Admin);
        assert!(!set.has(Module::Users, Operation::Update));
        assert!(!set.has(Module::Users, Operation::Delete));
        assert!(set.has(Module::Users, Operation::Read));
        assert!(set.has(Module::Users, Operation::Create));
        for module in [Module::Products, Module::Customers, Module::Inventory, Module::Sales] {
            for operation in Operation::ALL {
                assert!(set.has(module, operation));
            }
        }
    }

    #[test]
    fn agent_is_read_create_on_operational_modules() {
        let set = default_permissions(Role::Agent);
        for module in [Module::Products, Module::Customers, Module::Inventory, Module::Sales] {
            assert!(set.has(module, Operation::Read));
            assert!(set.has(module, Operation::Create));
            assert!(!set.has(module, Operation::Update));
            assert!(!set.has(module, Operation::Delete));
        }
        for operation in Operation::ALL {
            assert!(!set.has(Module::Users, operation));
        }
    }

    #[test]
    fn default_table_is_deterministic() {
        for role in Role::ALL {
            assert_eq!(default_permissions(role), default_permissions(role));
        }
    }

    #[test]
    fn empty_set_denies_everything() {
        let set = PermissionSet::empty();
        for module in Module::ALL {
            for operation in Operation::ALL {
                assert!(!set.has(module, operation));
            }
        }
    }

    #[test]
    fn permission_displays_as_module_colon_operation() {
        let p = Permission::new(Module::Products, Operation::Read);
        assert_eq!(p.to_string(), "products:read");
    }
}
