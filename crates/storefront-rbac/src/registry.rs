//! # Permission Registry
//!
//! The process-wide mapping from role name to permission set.
//!
//! All mutation goes through [`PermissionRegistry::define`] and
//! [`PermissionRegistry::grant`]. Reads take a shared lock and never block
//! each other; a write is observed atomically by every read that follows it.
//!
//! Every operation is total. Asking about a role that was never defined is
//! not an error: the role simply holds no permissions.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::permissions::{Permission, PermissionSet};
use crate::roles;

/// Role name to permission-set mapping.
///
/// # Example
///
/// ```
/// use storefront_rbac::{PermissionRegistry, PermissionSet};
/// use storefront_rbac::permissions::{VECTOR_CREATE, VIEW_PRODUCTS};
///
/// let registry = PermissionRegistry::new();
/// registry.define("curator", PermissionSet::from_strs(&["view_products"]));
/// registry.grant("curator", VECTOR_CREATE);
///
/// assert!(registry.has("curator", &VIEW_PRODUCTS));
/// assert!(registry.has("curator", &VECTOR_CREATE));
/// assert!(registry.permissions_of("nobody").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct PermissionRegistry {
    roles: RwLock<HashMap<String, PermissionSet>>,
}

impl PermissionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding the standard `customer`, `sales_rep`,
    /// `data_scientist` and `admin` roles.
    pub fn with_standard_roles() -> Self {
        let registry = Self::new();
        for (role, set) in roles::standard_roles() {
            registry.define(role, set);
        }
        registry
    }

    /// Insert or wholesale-replace the permission set of `role`.
    ///
    /// Returns the set the role held before, if any. Nothing is merged: to
    /// extend a role, union the sets before calling this, or use
    /// [`grant`](Self::grant).
    pub fn define(&self, role: impl Into<String>, permissions: PermissionSet) -> Option<PermissionSet> {
        let role = role.into();
        info!(role = %role, permissions = permissions.len(), "Defining role");
        self.roles.write().insert(role, permissions)
    }

    /// Add one permission to `role`, creating the role if needed.
    ///
    /// Returns `true` if the permission was newly added.
    pub fn grant(&self, role: impl Into<String>, permission: Permission) -> bool {
        let role = role.into();
        let added = self
            .roles
            .write()
            .entry(role.clone())
            .or_default()
            .add(permission.clone());
        if added {
            info!(role = %role, permission = %permission, "Granted permission");
        } else {
            debug!(role = %role, permission = %permission, "Permission already granted");
        }
        added
    }

    /// Snapshot of the permissions held by `role`; empty if the role is unknown.
    pub fn permissions_of(&self, role: &str) -> PermissionSet {
        self.roles.read().get(role).cloned().unwrap_or_default()
    }

    /// Whether `role` holds `permission`.
    pub fn has(&self, role: &str, permission: &Permission) -> bool {
        self.roles
            .read()
            .get(role)
            .map(|set| set.has(permission))
            .unwrap_or(false)
    }

    /// Whether `role` holds at least one of `permissions`, evaluated against
    /// a single consistent view of the role.
    pub fn has_any(&self, role: &str, permissions: &[Permission]) -> bool {
        self.roles
            .read()
            .get(role)
            .map(|set| set.contains_any(permissions))
            .unwrap_or(false)
    }

    /// Whether `role` has ever been defined or granted to.
    pub fn contains_role(&self, role: &str) -> bool {
        self.roles.read().contains_key(role)
    }

    /// Defined role names in lexical order.
    pub fn roles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roles.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_unknown_role_has_nothing() {
        let registry = PermissionRegistry::with_standard_roles();
        assert!(registry.permissions_of("ghost").is_empty());
        assert!(!registry.has("ghost", &VIEW_PRODUCTS));
        assert!(!registry.has_any("ghost", &vocabulary()));
        assert!(!registry.contains_role("ghost"));
    }

    #[test]
    fn test_define_replaces_wholesale() {
        let registry = PermissionRegistry::new();
        registry.define("r", PermissionSet::from_strs(&["a", "b"]));

        let previous = registry.define("r", PermissionSet::from_strs(&["a"]));
        assert_eq!(previous, Some(PermissionSet::from_strs(&["a", "b"])));
        assert_eq!(registry.permissions_of("r"), PermissionSet::from_strs(&["a"]));
        assert!(!registry.has("r", &Permission::new("b")));
    }

    #[test]
    fn test_define_same_set_is_idempotent() {
        let registry = PermissionRegistry::new();
        registry.define("r", roles::customer());
        registry.define("r", roles::customer());
        assert_eq!(registry.permissions_of("r"), roles::customer());
    }

    #[test]
    fn test_grant_is_idempotent() {
        let registry = PermissionRegistry::new();
        assert!(registry.grant("r", VECTOR_CREATE));
        let once = registry.permissions_of("r");

        assert!(!registry.grant("r", VECTOR_CREATE));
        assert_eq!(registry.permissions_of("r"), once);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_grant_creates_role() {
        let registry = PermissionRegistry::new();
        registry.grant("auditor", VIEW_ALL_ORDERS);
        assert!(registry.contains_role("auditor"));
        assert!(registry.has("auditor", &VIEW_ALL_ORDERS));
    }

    #[test]
    fn test_grant_extends_existing_role() {
        let registry = PermissionRegistry::with_standard_roles();
        registry.grant(roles::CUSTOMER, VECTOR_SEARCH_ADVANCED);
        let set = registry.permissions_of(roles::CUSTOMER);
        assert_eq!(set.len(), 5);
        assert!(set.has(&VIEW_OWN_ORDERS));
    }

    #[test]
    fn test_has_any() {
        let registry = PermissionRegistry::with_standard_roles();
        assert!(registry.has_any(roles::CUSTOMER, &[VECTOR_SEARCH_BASIC, VECTOR_SEARCH_ADVANCED]));
        assert!(!registry.has_any(roles::CUSTOMER, &[VECTOR_CREATE, VECTOR_MANAGE_INDEX]));
    }

    #[test]
    fn test_standard_roles_listed() {
        let registry = PermissionRegistry::with_standard_roles();
        assert_eq!(
            registry.roles(),
            vec!["admin", "customer", "data_scientist", "sales_rep"]
        );
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = PermissionRegistry::with_standard_roles();
        let snapshot = registry.permissions_of(roles::CUSTOMER);
        registry.define(roles::CUSTOMER, PermissionSet::new());
        assert_eq!(snapshot.len(), 4);
        assert!(registry.permissions_of(roles::CUSTOMER).is_empty());
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let registry = Arc::new(PermissionRegistry::new());
        let full = PermissionSet::from_strs(&["a", "b", "c"]);
        registry.define("r", full.clone());

        let writer = {
            let registry = registry.clone();
            let full = full.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    if i % 2 == 0 {
                        registry.define("r", PermissionSet::from_strs(&["x"]));
                    } else {
                        registry.define("r", full.clone());
                    }
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                let full = full.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let seen = registry.permissions_of("r");
                        // Never a partially written set.
                        assert!(seen == full || seen == PermissionSet::from_strs(&["x"]));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
