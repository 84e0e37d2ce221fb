//! # Storefront Services
//!
//! Permission-gated facades over the storefront's resources.
//!
//! ## Overview
//!
//! Every facade method follows the same protocol:
//!
//! 1. Look up the operation's requirement, a static table built when the
//!    facade is constructed.
//! 2. Ask the [`AuthorizationChecker`] whether the caller's *current* role
//!    holds any sufficient permission.
//! 3. On denial, return [`Outcome::Denied`] without touching any store or
//!    collaborator.
//! 4. Otherwise perform the operation, applying ownership rules where the
//!    resource has an owner.
//!
//! | Facade | Resource |
//! |---|---|
//! | [`CatalogService`] | Product listing and lookup |
//! | [`OrderService`] | Order visibility, placement and status |
//! | [`InventoryService`] | Stock levels |
//! | [`VectorSearchService`] | Similarity search |
//! | [`VectorAdminService`] | Vector writes and index maintenance |
//! | [`UserAdminService`] | Role assignment and role definition |
//!
//! ## Results
//!
//! Denials and missing resources are values, not errors. Methods that only
//! touch in-memory state return [`Outcome<T>`]; methods that call the
//! encoder or the vector store return `Result<Outcome<T>, ServiceError>`,
//! where the error side is reserved for collaborator failures.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_org::{Principal, PrincipalDirectory, PrincipalId};
//! use storefront_rbac::{roles, PermissionRegistry};
//! use storefront_services::{AuthorizationChecker, OrderId, OrderService, OrderStore, ProductStore};
//!
//! let directory = PrincipalDirectory::with_principals([
//!     Principal::new(PrincipalId(1), "alice", roles::CUSTOMER),
//!     Principal::new(PrincipalId(2), "erin", roles::CUSTOMER),
//! ]);
//! let checker = AuthorizationChecker::new(
//!     Arc::new(PermissionRegistry::with_standard_roles()),
//!     Arc::new(directory),
//! );
//! let orders = OrderService::new(checker, OrderStore::new(), ProductStore::new());
//!
//! assert!(orders.get_order(PrincipalId(1), OrderId(7)).is_not_found());
//! ```

pub mod authz;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod models;
pub mod orders;
pub mod outcome;
pub mod search;
pub mod store;
pub mod storefront;
pub mod users;
pub mod vector_admin;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use authz::{AuthorizationChecker, Requirement};
pub use catalog::CatalogService;
pub use error::{ServiceError, ServiceResult};
pub use inventory::InventoryService;
pub use models::{Order, OrderId, OrderStatus, OrderView, Product, ProductId, ProductSummary};
pub use orders::OrderService;
pub use outcome::{Denial, NotFound, Outcome, ResourceKind};
pub use search::{SearchHit, VectorSearchService};
pub use store::{OrderStore, ProductStore};
pub use storefront::Storefront;
pub use users::UserAdminService;
pub use vector_admin::VectorAdminService;
