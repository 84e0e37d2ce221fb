//! Authorization checker
//!
//! Answers "does this principal, in its current role, hold this
//! permission?" by resolving the role from the directory and asking the
//! registry. Nothing is cached: every call resolves the role again, so a
//! promotion or a role redefinition is visible on the very next check.

use std::sync::Arc;
use tracing::{debug, warn};

use storefront_org::{OrgResult, PrincipalDirectory, PrincipalId};
use storefront_rbac::{Permission, PermissionRegistry, PermissionSet};

use crate::outcome::Denial;

/// Permissions required for one facade operation.
///
/// Holding any one of `any_of` is sufficient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Operation name, used in denials and logs.
    pub operation: &'static str,

    /// Sufficient permissions.
    pub any_of: Vec<Permission>,

    /// Reason reported when the check fails.
    pub reason: &'static str,
}

impl Requirement {
    /// Operation gated by a single permission.
    pub fn one(operation: &'static str, permission: Permission, reason: &'static str) -> Self {
        Self::any(operation, vec![permission], reason)
    }

    /// Operation reachable through any of several permissions.
    pub fn any(operation: &'static str, any_of: Vec<Permission>, reason: &'static str) -> Self {
        Self {
            operation,
            any_of,
            reason,
        }
    }
}

/// Evaluates permissions for principals.
///
/// Cheap to clone; clones share the same registry and directory.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use storefront_org::{Principal, PrincipalDirectory, PrincipalId};
/// use storefront_rbac::PermissionRegistry;
/// use storefront_rbac::permissions::{VECTOR_CREATE, VIEW_PRODUCTS};
/// use storefront_services::AuthorizationChecker;
///
/// let directory = PrincipalDirectory::new();
/// directory.register(Principal::new(PrincipalId(1), "alice", "customer"));
/// let checker = AuthorizationChecker::new(
///     Arc::new(PermissionRegistry::with_standard_roles()),
///     Arc::new(directory),
/// );
///
/// let alice = PrincipalId(1);
/// assert!(checker.authorize(alice, &VIEW_PRODUCTS));
/// assert!(!checker.authorize(alice, &VECTOR_CREATE));
///
/// checker.set_role(alice, "admin").unwrap();
/// assert!(checker.authorize(alice, &VECTOR_CREATE));
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationChecker {
    registry: Arc<PermissionRegistry>,
    directory: Arc<PrincipalDirectory>,
}

impl AuthorizationChecker {
    /// Create a checker over a registry and a directory.
    pub fn new(registry: Arc<PermissionRegistry>, directory: Arc<PrincipalDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<PermissionRegistry> {
        &self.registry
    }

    /// The underlying directory.
    pub fn directory(&self) -> &Arc<PrincipalDirectory> {
        &self.directory
    }

    /// Whether `principal` currently holds `permission`.
    ///
    /// Unknown principals, and principals whose role is not defined, hold
    /// nothing.
    pub fn authorize(&self, principal: PrincipalId, permission: &Permission) -> bool {
        let allowed = match self.directory.role_of(principal) {
            Some(role) => self.registry.has(&role, permission),
            None => false,
        };
        debug!(principal = %principal, permission = %permission, allowed, "Authorization check");
        allowed
    }

    /// Whether `principal` currently holds at least one of `permissions`.
    pub fn authorize_any(&self, principal: PrincipalId, permissions: &[Permission]) -> bool {
        let allowed = match self.directory.role_of(principal) {
            Some(role) => self.registry.has_any(&role, permissions),
            None => false,
        };
        debug!(principal = %principal, permissions = ?permissions, allowed, "Authorization check (any)");
        allowed
    }

    /// Check a facade requirement, producing a [`Denial`] on failure.
    pub fn check(&self, principal: PrincipalId, requirement: &Requirement) -> Result<(), Denial> {
        if self.authorize_any(principal, &requirement.any_of) {
            return Ok(());
        }
        warn!(principal = %principal, operation = requirement.operation, "Access denied");
        Err(self.deny(principal, requirement.operation, requirement.any_of.clone(), requirement.reason))
    }

    /// Build a denial for `principal`.
    pub fn deny(
        &self,
        principal: PrincipalId,
        operation: &str,
        required: Vec<Permission>,
        reason: &str,
    ) -> Denial {
        Denial {
            principal,
            operation: operation.to_string(),
            required,
            reason: reason.to_string(),
        }
    }

    /// Everything `principal` currently holds; empty for unknown principals.
    pub fn principal_permissions(&self, principal: PrincipalId) -> PermissionSet {
        self.directory
            .role_of(principal)
            .map(|role| self.registry.permissions_of(&role))
            .unwrap_or_default()
    }

    /// Permissions held by `role`; empty if the role is unknown.
    pub fn permissions_of(&self, role: &str) -> PermissionSet {
        self.registry.permissions_of(role)
    }

    /// Insert or replace a role definition.
    pub fn define(&self, role: impl Into<String>, permissions: PermissionSet) -> Option<PermissionSet> {
        self.registry.define(role, permissions)
    }

    /// Add a permission to a role.
    pub fn grant(&self, role: impl Into<String>, permission: Permission) -> bool {
        self.registry.grant(role, permission)
    }

    /// Reassign a principal's role, returning the previous one.
    pub fn set_role(&self, principal: PrincipalId, role: impl Into<String>) -> OrgResult<String> {
        self.directory.set_role(principal, role)
    }
}
