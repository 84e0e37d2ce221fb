//! In-memory product and order stores.
//!
//! Stores are cheap handles: clones share the same underlying map, which is
//! how the catalog, inventory and order services see each other's writes.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use storefront_org::PrincipalId;

use crate::models::{Order, OrderId, OrderStatus, Product, ProductId};

/// Shared product map.
#[derive(Debug, Clone, Default)]
pub struct ProductStore {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl ProductStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        for product in products {
            store.insert(product);
        }
        store
    }

    /// Insert or replace a product.
    pub fn insert(&self, product: Product) -> Option<Product> {
        self.products.write().insert(product.id, product)
    }

    /// Look up a product.
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.products.read().get(&id).cloned()
    }

    /// All products ordered by id.
    pub fn list(&self) -> Vec<Product> {
        self.products.read().values().cloned().collect()
    }

    /// Apply `f` to a product in place and return the updated copy.
    pub fn update<F>(&self, id: ProductId, f: F) -> Option<Product>
    where
        F: FnOnce(&mut Product),
    {
        let mut products = self.products.write();
        let product = products.get_mut(&id)?;
        f(product);
        Some(product.clone())
    }

    /// Apply `f` to every product.
    pub fn update_all<F>(&self, mut f: F)
    where
        F: FnMut(&mut Product),
    {
        for product in self.products.write().values_mut() {
            f(product);
        }
    }

    /// Names for `ids`, falling back to the id for unknown products.
    pub fn names_for(&self, ids: &[ProductId]) -> Vec<String> {
        let products = self.products.read();
        ids.iter()
            .map(|id| {
                products
                    .get(id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

/// Shared order map with id allocation.
#[derive(Debug, Clone)]
pub struct OrderStore {
    orders: Arc<RwLock<BTreeMap<OrderId, Order>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore {
    /// Create an empty store; the first allocated id is 1.
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Create a store holding `orders`.
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let store = Self::new();
        for order in orders {
            store.insert(order);
        }
        store
    }

    /// Reserve a fresh order id, never below any inserted id.
    pub fn allocate_id(&self) -> OrderId {
        OrderId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Insert or replace an order.
    pub fn insert(&self, order: Order) -> Option<Order> {
        self.next_id.fetch_max(order.id.0.saturating_add(1), Ordering::SeqCst);
        self.orders.write().insert(order.id, order)
    }

    /// Look up an order.
    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.read().get(&id).cloned()
    }

    /// All orders ordered by id.
    pub fn list(&self) -> Vec<Order> {
        self.orders.read().values().cloned().collect()
    }

    /// Orders placed by `owner`, ordered by id.
    pub fn list_for(&self, owner: PrincipalId) -> Vec<Order> {
        self.orders
            .read()
            .values()
            .filter(|o| o.is_owned_by(owner))
            .cloned()
            .collect()
    }

    /// Set the status of an order and return the updated copy.
    pub fn set_status(&self, id: OrderId, status: OrderStatus) -> Option<Order> {
        let mut orders = self.orders.write();
        let order = orders.get_mut(&id)?;
        order.status = status;
        Some(order.clone())
    }
}
