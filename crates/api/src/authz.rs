//! Request-side authorization gate.
//!
//! Checked at the handler boundary, after session resolution and before any
//! store read. Row scoping is a separate, later data gate.

use fieldstock_auth::{Identity, Module, Operation, Permission};

use crate::app::errors::ApiError;

/// Require a `(module, operation)` grant on the resolved identity.
///
/// Delegates to [`Identity::allows`], which includes the documented
/// field-agent read/create exception for products/inventory.
pub fn require(identity: &Identity, module: Module, operation: Operation) -> Result<(), ApiError> {
    if identity.allows(module, operation) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            Permission::new(module, operation).to_string(),
        ))
    }
}
