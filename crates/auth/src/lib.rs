//! `fieldstock-auth` — session, permission-resolution and row-scoping core.
//!
//! This crate is intentionally decoupled from HTTP and storage. The API layer
//! feeds it request credentials and store records; it hands back a resolved
//! [`Identity`] and filtered views of domain rows.

pub mod identity;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod scope;
pub mod session;
pub mod token;
pub mod user;

pub use identity::{CredentialTag, Identity};
pub use password::{Argon2Hasher, PasswordError, PasswordHasher};
pub use permissions::{default_permissions, Module, Operation, Permission, PermissionSet};
pub use roles::Role;
pub use session::{SessionRecord, MAX_SESSION_BYTES};
pub use token::{BearerClaims, TokenError, TokenIssuer, SESSION_TTL_DAYS};
pub use user::UserRecord;
