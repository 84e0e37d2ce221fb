//! Standard role definitions
//!
//! The four roles every storefront starts with, plus the senior roles that
//! are typically added later when staff are promoted. Role sets are flat and
//! independent: a "senior" role is not derived from its junior counterpart,
//! it simply lists an overlapping set of permissions.

use crate::permissions::{self, Permission, PermissionSet};

/// Role for shoppers.
pub const CUSTOMER: &str = "customer";
/// Role for customer-facing sales staff.
pub const SALES_REP: &str = "sales_rep";
/// Role for staff who maintain product embeddings.
pub const DATA_SCIENTIST: &str = "data_scientist";
/// Role with every permission.
pub const ADMIN: &str = "admin";
/// Promotion target for sales staff.
pub const SENIOR_SALES_REP: &str = "senior_sales_rep";
/// Promotion target for data scientists.
pub const SENIOR_DATA_SCIENTIST: &str = "senior_data_scientist";

fn set_of(perms: &[Permission]) -> PermissionSet {
    perms.iter().cloned().collect()
}

/// Permissions of the `customer` role.
pub fn customer() -> PermissionSet {
    set_of(&[
        permissions::VIEW_PRODUCTS,
        permissions::VIEW_OWN_ORDERS,
        permissions::PLACE_ORDER,
        permissions::VECTOR_SEARCH_BASIC,
    ])
}

/// Permissions of the `sales_rep` role.
pub fn sales_rep() -> PermissionSet {
    set_of(&[
        permissions::VIEW_PRODUCTS,
        permissions::VIEW_ALL_ORDERS,
        permissions::UPDATE_ORDER_STATUS,
        permissions::VIEW_CUSTOMER_INFO,
        permissions::VECTOR_SEARCH_BASIC,
        permissions::VECTOR_SEARCH_ADVANCED,
    ])
}

/// Permissions of the `data_scientist` role.
pub fn data_scientist() -> PermissionSet {
    set_of(&[
        permissions::VIEW_PRODUCTS,
        permissions::VECTOR_SEARCH_BASIC,
        permissions::VECTOR_SEARCH_ADVANCED,
        permissions::VECTOR_CREATE,
        permissions::VECTOR_DELETE,
        permissions::VECTOR_UPDATE,
    ])
}

/// Permissions of the `admin` role: the whole vocabulary.
pub fn admin() -> PermissionSet {
    permissions::vocabulary().into_iter().collect()
}

/// Permissions of the `senior_sales_rep` promotion role.
///
/// Note that this set does not include vector search, unlike `sales_rep`.
pub fn senior_sales_rep() -> PermissionSet {
    set_of(&[
        permissions::VIEW_PRODUCTS,
        permissions::VIEW_ALL_ORDERS,
        permissions::UPDATE_ORDER_STATUS,
        permissions::VIEW_CUSTOMER_INFO,
        permissions::UPDATE_PRODUCT_STOCK,
    ])
}

/// Permissions of the `senior_data_scientist` promotion role.
pub fn senior_data_scientist() -> PermissionSet {
    set_of(&[
        permissions::VIEW_PRODUCTS,
        permissions::VECTOR_SEARCH_BASIC,
        permissions::VECTOR_SEARCH_ADVANCED,
        permissions::VECTOR_CREATE,
        permissions::VECTOR_DELETE,
        permissions::VECTOR_UPDATE,
        permissions::VECTOR_MANAGE_INDEX,
        permissions::VIEW_ALL_ORDERS,
    ])
}

/// The roles installed by [`crate::PermissionRegistry::with_standard_roles`].
pub fn standard_roles() -> Vec<(&'static str, PermissionSet)> {
    vec![
        (CUSTOMER, customer()),
        (SALES_REP, sales_rep()),
        (DATA_SCIENTIST, data_scientist()),
        (ADMIN, admin()),
    ]
}

/// Senior roles that are defined on demand when someone is promoted.
pub fn promotion_roles() -> Vec<(&'static str, PermissionSet)> {
    vec![
        (SENIOR_SALES_REP, senior_sales_rep()),
        (SENIOR_DATA_SCIENTIST, senior_data_scientist()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::*;

    #[test]
    fn test_customer_permissions() {
        let set = customer();
        assert_eq!(set.len(), 4);
        assert!(set.has(&VIEW_OWN_ORDERS));
        assert!(!set.has(&VIEW_ALL_ORDERS));
        assert!(!set.has(&VECTOR_CREATE));
    }

    #[test]
    fn test_admin_holds_everything() {
        let set = admin();
        for perm in vocabulary() {
            assert!(set.has(&perm), "admin missing {perm}");
        }
    }

    #[test]
    fn test_senior_roles_are_not_supersets() {
        // Promotion is a reassignment, not an extension.
        assert!(!senior_sales_rep().contains_all(&sales_rep()));
        assert!(senior_data_scientist().contains_all(&data_scientist()));
        assert!(senior_sales_rep().has(&UPDATE_PRODUCT_STOCK));
    }

    #[test]
    fn test_role_name_lists() {
        let names: Vec<&str> = standard_roles().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![CUSTOMER, SALES_REP, DATA_SCIENTIST, ADMIN]);
        assert_eq!(promotion_roles().len(), 2);
    }
}
