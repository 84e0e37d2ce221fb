//! # Permissions
//!
//! Atomic permission tokens and the set type roles are made of.
//! A permission is an opaque name such as `view_products`; it is never
//! composed from, or implied by, another permission.

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::collections::HashSet;
use std::fmt;

/// A single named capability.
///
/// Well-known permissions are available as constants (see [`VIEW_PRODUCTS`]
/// and friends) but any string is accepted, so new capabilities can be
/// introduced at runtime without touching this crate.
///
/// # Example
///
/// ```
/// use storefront_rbac::permissions::{Permission, VIEW_PRODUCTS};
///
/// let perm = Permission::new("view_products");
/// assert_eq!(perm, VIEW_PRODUCTS);
/// assert_eq!(perm.to_string(), "view_products");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Create a permission from any string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Create a permission from a static string, usable in `const` items.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Permission {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Permission {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// Catalog
/// Browse the product catalog.
pub const VIEW_PRODUCTS: Permission = Permission::from_static("view_products");
/// Change a product's stock level.
pub const UPDATE_PRODUCT_STOCK: Permission = Permission::from_static("update_product_stock");

// Orders
/// See orders owned by the caller.
pub const VIEW_OWN_ORDERS: Permission = Permission::from_static("view_own_orders");
/// See every order regardless of owner.
pub const VIEW_ALL_ORDERS: Permission = Permission::from_static("view_all_orders");
/// Place a new order.
pub const PLACE_ORDER: Permission = Permission::from_static("place_order");
/// Move an order to another status.
pub const UPDATE_ORDER_STATUS: Permission = Permission::from_static("update_order_status");

// Users
/// Read another principal's profile.
pub const VIEW_CUSTOMER_INFO: Permission = Permission::from_static("view_customer_info");
/// Reassign roles and edit role definitions.
pub const MANAGE_USERS: Permission = Permission::from_static("manage_users");

// Vector index
/// Plain similarity search.
pub const VECTOR_SEARCH_BASIC: Permission = Permission::from_static("vector_search_basic");
/// Advanced similarity search.
pub const VECTOR_SEARCH_ADVANCED: Permission = Permission::from_static("vector_search_advanced");
/// Insert new vectors.
pub const VECTOR_CREATE: Permission = Permission::from_static("vector_create");
/// Replace an existing vector.
pub const VECTOR_UPDATE: Permission = Permission::from_static("vector_update");
/// Remove a vector.
pub const VECTOR_DELETE: Permission = Permission::from_static("vector_delete");
/// Inspect, clear or reconfigure the index itself.
pub const VECTOR_MANAGE_INDEX: Permission = Permission::from_static("vector_manage_index");

/// Every permission the storefront services check for.
pub fn vocabulary() -> Vec<Permission> {
    vec![
        VIEW_PRODUCTS,
        UPDATE_PRODUCT_STOCK,
        VIEW_OWN_ORDERS,
        VIEW_ALL_ORDERS,
        PLACE_ORDER,
        UPDATE_ORDER_STATUS,
        VIEW_CUSTOMER_INFO,
        MANAGE_USERS,
        VECTOR_SEARCH_BASIC,
        VECTOR_SEARCH_ADVANCED,
        VECTOR_CREATE,
        VECTOR_UPDATE,
        VECTOR_DELETE,
        VECTOR_MANAGE_INDEX,
    ]
}

/// A flat set of permissions held by a role.
///
/// Set semantics: no duplicates and no ordering between members. Use
/// [`PermissionSet::sorted`] when a stable order is needed.
///
/// # Example
///
/// ```
/// use storefront_rbac::permissions::{PermissionSet, VIEW_PRODUCTS, PLACE_ORDER};
///
/// let mut set = PermissionSet::new();
/// set.add(VIEW_PRODUCTS);
/// set.add(PLACE_ORDER);
/// set.add(VIEW_PRODUCTS);
///
/// assert!(set.has(&VIEW_PRODUCTS));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Add a permission. Returns `false` if it was already present.
    pub fn add(&mut self, permission: Permission) -> bool {
        self.permissions.insert(permission)
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        self.permissions.extend(permissions);
    }

    /// Membership test.
    pub fn has(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission.as_str())
    }

    /// Membership test by token name.
    pub fn has_str(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// `true` if at least one of `permissions` is in the set.
    pub fn contains_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has(p))
    }

    /// `true` if every permission of `other` is also in this set.
    pub fn contains_all(&self, other: &PermissionSet) -> bool {
        other.permissions.is_subset(&self.permissions)
    }

    /// Union another set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().cloned());
    }

    /// Iterate over the permissions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Permissions in lexical order.
    pub fn sorted(&self) -> Vec<&Permission> {
        let mut perms: Vec<&Permission> = self.permissions.iter().collect();
        perms.sort();
        perms
    }

    /// Build a set from token names.
    ///
    /// ```
    /// use storefront_rbac::permissions::PermissionSet;
    ///
    /// let set = PermissionSet::from_strs(&["vector_create", "vector_search_basic"]);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn from_strs(perms: &[&str]) -> Self {
        perms.iter().map(|p| Permission::new(*p)).collect()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<T: IntoIterator<Item = Permission>>(&mut self, iter: T) {
        self.permissions.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::hash_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_and_owned_permissions_are_equal() {
        let owned = Permission::new(String::from("vector_create"));
        assert_eq!(owned, VECTOR_CREATE);

        let mut set = PermissionSet::new();
        set.add(owned);
        assert!(set.has(&VECTOR_CREATE));
        assert!(set.has_str("vector_create"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut once = PermissionSet::new();
        once.add(VIEW_PRODUCTS);

        let mut twice = PermissionSet::new();
        assert!(twice.add(VIEW_PRODUCTS));
        assert!(!twice.add(VIEW_PRODUCTS));

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_contains_any() {
        let set = PermissionSet::from_strs(&["vector_search_basic"]);
        assert!(set.contains_any(&[VECTOR_SEARCH_BASIC, VECTOR_SEARCH_ADVANCED]));
        assert!(!set.contains_any(&[VECTOR_CREATE, VECTOR_DELETE]));
        assert!(!set.contains_any(&[]));
    }

    #[test]
    fn test_contains_all_and_merge() {
        let mut base = PermissionSet::from_strs(&["view_products", "place_order"]);
        let extra = PermissionSet::from_strs(&["vector_create"]);
        assert!(!base.contains_all(&extra));

        base.merge(&extra);
        assert!(base.contains_all(&extra));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn test_sorted_order() {
        let set = PermissionSet::from_strs(&["vector_create", "manage_users", "place_order"]);
        let names: Vec<&str> = set.sorted().into_iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["manage_users", "place_order", "vector_create"]);
    }

    #[test]
    fn test_serializes_as_plain_strings() {
        let set = PermissionSet::from_strs(&["view_products"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["view_products"]"#);

        let back: PermissionSet = serde_json::from_str(r#"["a","b","a"]"#).unwrap();
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn test_vocabulary_is_unique() {
        let all = vocabulary();
        let set: PermissionSet = all.iter().cloned().collect();
        assert_eq!(set.len(), all.len());
    }
}
