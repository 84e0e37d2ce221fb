//! Shared fixture for unit tests.

use std::sync::Arc;

use storefront_org::{Principal, PrincipalDirectory, PrincipalId};
use storefront_rbac::{roles, PermissionRegistry};

use crate::authz::AuthorizationChecker;
use crate::models::{Order, OrderId, OrderStatus, Product, ProductId};
use crate::store::{OrderStore, ProductStore};

pub const ALICE: PrincipalId = PrincipalId(1);
pub const BOB: PrincipalId = PrincipalId(2);
pub const CAROL: PrincipalId = PrincipalId(3);
pub const DAVID: PrincipalId = PrincipalId(4);
pub const ERIN: PrincipalId = PrincipalId(5);
pub const INTERN: PrincipalId = PrincipalId(6);

pub struct Fixture {
    pub checker: AuthorizationChecker,
    pub products: ProductStore,
    pub orders: OrderStore,
}

pub fn products() -> Vec<Product> {
    vec![
        Product::new(
            ProductId(1),
            "Gaming Laptop",
            999.99,
            50,
            "High-performance gaming laptop with RTX graphics, 32GB RAM and a 1TB SSD",
        ),
        Product::new(
            ProductId(2),
            "Smartphone Pro",
            599.99,
            100,
            "Flagship smartphone with an OLED display, 108MP camera and 5G connectivity",
        ),
        Product::new(
            ProductId(3),
            "Wireless Headphones",
            99.99,
            200,
            "Premium wireless headphones with active noise cancellation and long battery life",
        ),
    ]
}

pub fn fixture() -> Fixture {
    let directory = PrincipalDirectory::with_principals([
        Principal::new(ALICE, "alice", roles::CUSTOMER),
        Principal::new(BOB, "bob", roles::SALES_REP),
        Principal::new(CAROL, "carol", roles::DATA_SCIENTIST),
        Principal::new(DAVID, "david", roles::ADMIN),
        Principal::new(ERIN, "erin", roles::CUSTOMER),
        Principal::new(INTERN, "ivan", "intern"),
    ]);

    let mut completed = Order::new(OrderId(2), ALICE, vec![ProductId(2)], 599.99);
    completed.status = OrderStatus::Completed;
    let orders = OrderStore::with_orders([
        Order::new(OrderId(1), ALICE, vec![ProductId(1), ProductId(3)], 1099.98),
        completed,
        Order::new(OrderId(3), ERIN, vec![ProductId(3)], 99.99),
    ]);

    Fixture {
        checker: AuthorizationChecker::new(
            Arc::new(PermissionRegistry::with_standard_roles()),
            Arc::new(directory),
        ),
        products: ProductStore::with_products(products()),
        orders,
    }
}
