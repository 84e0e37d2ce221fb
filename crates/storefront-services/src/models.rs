//! Storefront domain models
//!
//! Products and orders as the facades store and return them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use storefront_org::PrincipalId;

/// Catalog product identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: f64,

    /// Units in stock
    pub stock: u32,

    /// Long description, the text that gets embedded
    pub description: String,

    /// Id of the product's vector in the similarity index, once indexed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_id: Option<String>,
}

impl Product {
    /// Creates a product that has not been indexed yet.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        stock: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock,
            description: description.into(),
            vector_id: None,
        }
    }

    /// The catalog listing view of this product.
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Catalog listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product id
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub stock: u32,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, not yet processed
    Pending,
    /// Being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Delivered
    Completed,
    /// Cancelled before completion
    Cancelled,
}

impl OrderStatus {
    /// Get the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse status from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "completed" | "complete" => Some(OrderStatus::Completed),
            "cancelled" | "canceled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Principal that placed the order
    pub owner: PrincipalId,

    /// Ordered products, one entry per unit
    pub items: Vec<ProductId>,

    /// Order total
    pub total: f64,

    /// Current status
    pub status: OrderStatus,

    /// When the order was placed
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order.
    pub fn new(id: OrderId, owner: PrincipalId, items: Vec<ProductId>, total: f64) -> Self {
        Self {
            id,
            owner,
            items,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Whether `principal` placed this order.
    pub fn is_owned_by(&self, principal: PrincipalId) -> bool {
        self.owner == principal
    }
}

/// An order as shown to a caller, with product names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    /// Order id
    pub id: OrderId,
    /// Principal that placed the order
    pub owner: PrincipalId,
    /// Order total
    pub total: f64,
    /// Current status
    pub status: OrderStatus,
    /// Product names, in order
    pub products: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parse() {
        assert_eq!(OrderStatus::parse("Shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("canceled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::parse("lost"), None);
        assert_eq!(OrderStatus::Completed.as_str(), "completed");
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_ownership() {
        let order = Order::new(OrderId(1), PrincipalId(1), vec![ProductId(1)], 10.0);
        assert!(order.is_owned_by(PrincipalId(1)));
        assert!(!order.is_owned_by(PrincipalId(2)));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_product_summary() {
        let product = Product::new(ProductId(3), "Wireless Headphones", 99.99, 200, "Noise cancelling");
        let summary = product.summary();
        assert_eq!(summary.name, "Wireless Headphones");
        assert_eq!(summary.stock, 200);
        assert!(product.vector_id.is_none());
    }
}
