//! # Storefront Principal Directory
//!
//! Identities known to the storefront and the role each one currently holds.
//!
//! ## Overview
//!
//! The storefront-org crate handles:
//! - **Principals**: Identified callers with exactly one current role
//! - **Directory**: The concurrency-safe principal store, including role promotion
//!
//! ## Architecture
//!
//! ```text
//! PrincipalDirectory
//!   └─ Principal { id, username, role } ──(role name)──→ storefront-rbac registry
//! ```
//!
//! The directory only stores role *names*. Resolving a name to permissions
//! is the registry's job, and happens again on every authorization check.
//!
//! ## Usage
//!
//! ```rust
//! use storefront_org::{Principal, PrincipalDirectory, PrincipalId};
//!
//! let directory = PrincipalDirectory::new();
//! directory.register(Principal::new(PrincipalId(2), "bob", "sales_rep"));
//! directory.set_role(PrincipalId(2), "senior_sales_rep").unwrap();
//! ```

pub mod directory;
pub mod error;
pub mod principal;

// Re-export main types for convenience
pub use directory::PrincipalDirectory;
pub use error::{OrgError, OrgResult};
pub use principal::{Principal, PrincipalId};
