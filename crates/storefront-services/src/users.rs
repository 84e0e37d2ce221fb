//! Principal and role administration.

use tracing::info;

use storefront_org::{OrgError, Principal, PrincipalId};
use storefront_rbac::permissions::{MANAGE_USERS, VIEW_CUSTOMER_INFO};
use storefront_rbac::{Permission, PermissionSet};

use crate::authz::{AuthorizationChecker, Requirement};
use crate::outcome::{Outcome, ResourceKind};

/// Role assignment and role definition, gated by `manage_users`.
#[derive(Debug, Clone)]
pub struct UserAdminService {
    checker: AuthorizationChecker,
    manage: Requirement,
    view_customer: Requirement,
}

impl UserAdminService {
    pub fn new(checker: AuthorizationChecker) -> Self {
        Self {
            checker,
            manage: Requirement::one("manage_users", MANAGE_USERS, "No permission to manage users"),
            view_customer: Requirement::one(
                "view_customer_info",
                VIEW_CUSTOMER_INFO,
                "No permission to view customer information",
            ),
        }
    }

    /// Move `target` to `role`, returning the role it held before.
    ///
    /// The new role does not need to be defined yet; until it is, the
    /// target holds no permissions.
    pub fn change_role(
        &self,
        actor: PrincipalId,
        target: PrincipalId,
        role: impl Into<String>,
    ) -> Outcome<String> {
        if let Err(denial) = self.checker.check(actor, &self.manage) {
            return denial.into();
        }
        match self.checker.set_role(target, role) {
            Ok(previous) => {
                info!(actor = %actor, target = %target, previous = %previous, "Role changed by administrator");
                Outcome::Granted(previous)
            }
            Err(OrgError::UnknownPrincipal(id)) => Outcome::not_found(ResourceKind::Principal, id),
        }
    }

    /// Create or wholesale replace a role, returning the replaced set.
    pub fn define_role(
        &self,
        actor: PrincipalId,
        role: impl Into<String>,
        permissions: PermissionSet,
    ) -> Outcome<Option<PermissionSet>> {
        if let Err(denial) = self.checker.check(actor, &self.manage) {
            return denial.into();
        }
        Outcome::Granted(self.checker.define(role, permissions))
    }

    /// Add one permission to a role; `false` if it was already held.
    pub fn grant_permission(
        &self,
        actor: PrincipalId,
        role: impl Into<String>,
        permission: Permission,
    ) -> Outcome<bool> {
        if let Err(denial) = self.checker.check(actor, &self.manage) {
            return denial.into();
        }
        Outcome::Granted(self.checker.grant(role, permission))
    }

    /// Look up a registered principal's profile.
    pub fn view_customer(&self, actor: PrincipalId, target: PrincipalId) -> Outcome<Principal> {
        if let Err(denial) = self.checker.check(actor, &self.view_customer) {
            return denial.into();
        }
        match self.checker.directory().get(target) {
            Some(principal) => Outcome::Granted(principal),
            None => Outcome::not_found(ResourceKind::Principal, target),
        }
    }
}
