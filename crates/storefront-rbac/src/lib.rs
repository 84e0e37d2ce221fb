//! # Storefront RBAC (Role-Based Access Control)
//!
//! The permission vocabulary and the mutable role registry shared by every
//! storefront service.
//!
//! ## Overview
//!
//! The storefront-rbac crate handles:
//! - **Permissions**: Atomic named capabilities such as `view_products`
//! - **Permission Sets**: Flat sets of permissions held by a role
//! - **Registry**: The concurrency-safe role → permission-set mapping
//! - **Roles**: The standard role presets and the senior promotion roles
//!
//! ## Model
//!
//! ```text
//! Role name ──→ PermissionSet { Permission, Permission, ... }
//!
//! Examples:
//!   "customer"       → { view_products, view_own_orders, place_order, vector_search_basic }
//!   "data_scientist" → { view_products, vector_search_*, vector_create, ... }
//! ```
//!
//! There is no role inheritance and no permission implication. Roles whose
//! sets overlap are unrelated as far as the registry is concerned.
//!
//! ## Usage
//!
//! ```rust
//! use storefront_rbac::{PermissionRegistry, PermissionSet};
//! use storefront_rbac::permissions::{VECTOR_CREATE, VIEW_OWN_ORDERS};
//!
//! let registry = PermissionRegistry::with_standard_roles();
//! assert!(!registry.has("customer", &VECTOR_CREATE));
//!
//! registry.define("data_scientist", PermissionSet::from_strs(&["vector_create", "vector_search_basic"]));
//! assert!(registry.has("data_scientist", &VECTOR_CREATE));
//! assert!(!registry.has("data_scientist", &VIEW_OWN_ORDERS));
//! ```

pub mod permissions;
pub mod registry;
pub mod roles;

// Re-export main types for convenience
pub use permissions::{Permission, PermissionSet};
pub use registry::PermissionRegistry;
