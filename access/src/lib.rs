//! Role-based access control.
//!
//! A capability table keyed by `(role, identity)`. Restricted operations in
//! the other crates call [`AccessRegistry::check_role`] before touching any
//! state. Each role is administered by another role (by default
//! [`Role::Admin`], which administers itself).

pub mod error;
pub mod registry;

pub use error::AccessError;
pub use registry::AccessRegistry;

pub use agora_types::Role;
