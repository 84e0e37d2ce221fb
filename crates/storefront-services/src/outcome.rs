//! Tagged results of a gated operation.
//!
//! A service call either produces its payload, is denied, or refers to
//! something that does not exist. Denial and absence are ordinary values,
//! not errors, and they are never conflated with each other.

use serde::{Deserialize, Serialize};
use std::fmt;

use storefront_org::PrincipalId;
use storefront_rbac::Permission;

/// Result of a permission-gated operation.
///
/// # Example
///
/// ```
/// use storefront_services::{Outcome, ResourceKind};
///
/// let found: Outcome<u32> = Outcome::Granted(7);
/// assert_eq!(found.granted(), Some(7));
///
/// let missing: Outcome<u32> = Outcome::not_found(ResourceKind::Order, 42);
/// assert!(missing.is_not_found());
/// assert!(!missing.is_denied());
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The operation was authorized and performed.
    Granted(T),
    /// The caller lacks the required permission.
    Denied(Denial),
    /// The referenced resource does not exist.
    NotFound(NotFound),
}

impl<T> Outcome<T> {
    /// Shorthand for a [`NotFound`] outcome.
    pub fn not_found(resource: ResourceKind, id: impl ToString) -> Self {
        Outcome::NotFound(NotFound {
            resource,
            id: id.to_string(),
        })
    }

    /// Whether the operation was performed.
    pub fn is_granted(&self) -> bool {
        matches!(self, Outcome::Granted(_))
    }

    /// Whether the caller was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied(_))
    }

    /// Whether the resource was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound(_))
    }

    /// The payload, if granted.
    pub fn granted(self) -> Option<T> {
        match self {
            Outcome::Granted(value) => Some(value),
            _ => None,
        }
    }

    /// The denial, if denied.
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Outcome::Denied(denial) => Some(denial),
            _ => None,
        }
    }

    /// Transform the payload, keeping denials and absences as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Granted(value) => Outcome::Granted(f(value)),
            Outcome::Denied(denial) => Outcome::Denied(denial),
            Outcome::NotFound(missing) => Outcome::NotFound(missing),
        }
    }
}

impl<T> From<Denial> for Outcome<T> {
    fn from(denial: Denial) -> Self {
        Outcome::Denied(denial)
    }
}

impl<T> From<NotFound> for Outcome<T> {
    fn from(missing: NotFound) -> Self {
        Outcome::NotFound(missing)
    }
}

/// Why a caller was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    /// The caller.
    pub principal: PrincipalId,

    /// Name of the attempted operation.
    pub operation: String,

    /// Permissions any one of which would have sufficed.
    pub required: Vec<Permission>,

    /// Human-readable reason.
    pub reason: String,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Access Denied: {}", self.reason)
    }
}

/// Kind of resource a [`NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Catalog product.
    Product,
    /// Customer order.
    Order,
    /// Stored vector.
    Vector,
    /// Registered principal.
    Principal,
}

impl ResourceKind {
    /// Get the string representation of the resource kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Product => "product",
            ResourceKind::Order => "order",
            ResourceKind::Vector => "vector",
            ResourceKind::Principal => "principal",
        }
    }
}

/// A referenced resource that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFound {
    /// What kind of resource was looked up.
    pub resource: ResourceKind,

    /// The id that was looked up.
    pub id: String,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} not found", self.resource.as_str(), self.id)
    }
}
