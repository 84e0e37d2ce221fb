//! Principal directory
//!
//! Holds every known principal and its current role. Role promotion is an
//! in-place mutation here, never a change to the permission registry, and it
//! is visible to the very next lookup.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{OrgError, OrgResult};
use crate::principal::{Principal, PrincipalId};

/// Concurrency-safe set of known principals.
///
/// # Examples
///
/// ```
/// use storefront_org::{Principal, PrincipalDirectory, PrincipalId};
///
/// let directory = PrincipalDirectory::new();
/// directory.register(Principal::new(PrincipalId(1), "alice", "customer"));
///
/// assert_eq!(directory.role_of(PrincipalId(1)).as_deref(), Some("customer"));
/// directory.set_role(PrincipalId(1), "admin").unwrap();
/// assert_eq!(directory.role_of(PrincipalId(1)).as_deref(), Some("admin"));
/// assert_eq!(directory.role_of(PrincipalId(9)), None);
/// ```
#[derive(Debug, Default)]
pub struct PrincipalDirectory {
    principals: RwLock<BTreeMap<PrincipalId, Principal>>,
}

impl PrincipalDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            principals: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a directory pre-populated with `principals`.
    pub fn with_principals(principals: impl IntoIterator<Item = Principal>) -> Self {
        let directory = Self::new();
        for principal in principals {
            directory.register(principal);
        }
        directory
    }

    /// Add a principal, replacing any previous entry with the same id.
    ///
    /// Returns the replaced entry, if any.
    pub fn register(&self, principal: Principal) -> Option<Principal> {
        debug!(principal = %principal.id, username = %principal.username, role = %principal.role, "Registering principal");
        self.principals.write().insert(principal.id, principal)
    }

    /// Look up a principal by id.
    pub fn get(&self, id: PrincipalId) -> Option<Principal> {
        self.principals.read().get(&id).cloned()
    }

    /// Look up a principal by username.
    pub fn find_by_username(&self, username: &str) -> Option<Principal> {
        self.principals
            .read()
            .values()
            .find(|p| p.username == username)
            .cloned()
    }

    /// The current role of `id`, or `None` if the principal is unknown.
    pub fn role_of(&self, id: PrincipalId) -> Option<String> {
        self.principals.read().get(&id).map(|p| p.role.clone())
    }

    /// Reassign the role of `id`, returning the previous role.
    ///
    /// The role name is not checked against any registry: assigning a role
    /// that holds no permissions is allowed and simply denies everything.
    pub fn set_role(&self, id: PrincipalId, role: impl Into<String>) -> OrgResult<String> {
        let role = role.into();
        let mut principals = self.principals.write();
        let principal = principals.get_mut(&id).ok_or(OrgError::UnknownPrincipal(id))?;
        let previous = principal.assign_role(role);
        info!(principal = %id, from = %previous, to = %principal.role, "Role reassigned");
        Ok(previous)
    }

    /// Whether a principal with this id is registered.
    pub fn contains(&self, id: PrincipalId) -> bool {
        self.principals.read().contains_key(&id)
    }

    /// All principals ordered by id.
    pub fn list(&self) -> Vec<Principal> {
        self.principals.read().values().cloned().collect()
    }

    /// Number of registered principals.
    pub fn len(&self) -> usize {
        self.principals.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.principals.read().is_empty()
    }
}
