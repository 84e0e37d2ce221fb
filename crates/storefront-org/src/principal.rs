//! Principal domain model
//!
//! A principal is an identified caller with exactly one current role.
//! Proving that a caller really is a given principal is outside this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric principal identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PrincipalId(pub u64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PrincipalId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// An identified caller and its current role assignment.
///
/// # Examples
///
/// ```
/// use storefront_org::{Principal, PrincipalId};
///
/// let mut alice = Principal::new(PrincipalId(1), "alice", "customer");
/// assert_eq!(alice.id, PrincipalId(1));
///
/// let previous = alice.assign_role("data_scientist");
/// assert_eq!(previous, "customer");
/// assert_eq!(alice.role, "data_scientist");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique identifier
    pub id: PrincipalId,

    /// Login name
    pub username: String,

    /// Name of the role currently assigned
    pub role: String,

    /// When the principal was registered
    pub created_at: DateTime<Utc>,

    /// When the role was last reassigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_changed_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// Creates a new principal with the given role.
    pub fn new(id: PrincipalId, username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            role: role.into(),
            created_at: Utc::now(),
            role_changed_at: None,
        }
    }

    /// Replace the current role, returning the previous one.
    pub fn assign_role(&mut self, role: impl Into<String>) -> String {
        self.role_changed_at = Some(Utc::now());
        std::mem::replace(&mut self.role, role.into())
    }

    /// Whether the role has ever been reassigned since registration.
    pub fn was_reassigned(&self) -> bool {
        self.role_changed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_creation() {
        let bob = Principal::new(PrincipalId(2), "bob", "sales_rep");
        assert_eq!(bob.id, PrincipalId(2));
        assert_eq!(bob.username, "bob");
        assert_eq!(bob.role, "sales_rep");
        assert!(!bob.was_reassigned());
    }

    #[test]
    fn test_assign_role() {
        let mut carol = Principal::new(PrincipalId(3), "carol", "data_scientist");
        let previous = carol.assign_role("senior_data_scientist");
        assert_eq!(previous, "data_scientist");
        assert_eq!(carol.role, "senior_data_scientist");
        assert!(carol.was_reassigned());
    }

    #[test]
    fn test_principal_id_serialization() {
        let json = serde_json::to_string(&PrincipalId(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(PrincipalId(42).to_string(), "42");
    }
}
