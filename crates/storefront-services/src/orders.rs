//! Order visibility and lifecycle.
//!
//! Order reads are reachable through either `view_own_orders` or
//! `view_all_orders`. Holders of only the narrower permission see the orders
//! they placed; a lookup of somebody else's order is denied, which is
//! reported separately from a lookup of an order that does not exist.

use tracing::{debug, info, warn};

use storefront_org::PrincipalId;
use storefront_rbac::permissions::{PLACE_ORDER, UPDATE_ORDER_STATUS, VIEW_ALL_ORDERS, VIEW_OWN_ORDERS};

use crate::authz::{AuthorizationChecker, Requirement};
use crate::models::{Order, OrderId, OrderStatus, OrderView, ProductId};
use crate::outcome::{Outcome, ResourceKind};
use crate::store::{OrderStore, ProductStore};

/// Order access gated by role and ownership.
#[derive(Debug, Clone)]
pub struct OrderService {
    checker: AuthorizationChecker,
    orders: OrderStore,
    products: ProductStore,
    view: Requirement,
    view_others: Requirement,
    place: Requirement,
    update_status: Requirement,
}

impl OrderService {
    pub fn new(checker: AuthorizationChecker, orders: OrderStore, products: ProductStore) -> Self {
        Self {
            checker,
            orders,
            products,
            view: Requirement::any(
                "view_orders",
                vec![VIEW_OWN_ORDERS, VIEW_ALL_ORDERS],
                "No permission to view orders",
            ),
            view_others: Requirement::one("view_order", VIEW_ALL_ORDERS, "Can only view your own orders"),
            place: Requirement::one("place_order", PLACE_ORDER, "No permission to place orders"),
            update_status: Requirement::one(
                "update_order_status",
                UPDATE_ORDER_STATUS,
                "No permission to update order status",
            ),
        }
    }

    fn view_of(&self, order: &Order) -> OrderView {
        OrderView {
            id: order.id,
            owner: order.owner,
            total: order.total,
            status: order.status,
            products: self.products.names_for(&order.items),
        }
    }

    /// List every order for broad viewers, otherwise only the caller's own.
    pub fn list_orders(&self, principal: PrincipalId) -> Outcome<Vec<OrderView>> {
        if let Err(denial) = self.checker.check(principal, &self.view) {
            return denial.into();
        }
        let orders = if self.checker.authorize(principal, &VIEW_ALL_ORDERS) {
            self.orders.list()
        } else {
            self.orders.list_for(principal)
        };
        debug!(principal = %principal, count = orders.len(), "Listed orders");
        Outcome::Granted(orders.iter().map(|o| self.view_of(o)).collect())
    }

    /// Look up one order, applying the ownership rule.
    pub fn get_order(&self, principal: PrincipalId, id: OrderId) -> Outcome<OrderView> {
        if let Err(denial) = self.checker.check(principal, &self.view) {
            return denial.into();
        }
        let Some(order) = self.orders.get(id) else {
            return Outcome::not_found(ResourceKind::Order, id);
        };
        if !order.is_owned_by(principal) {
            if let Err(denial) = self.checker.check(principal, &self.view_others) {
                return denial.into();
            }
        }
        Outcome::Granted(self.view_of(&order))
    }

    /// Place an order for the caller. Stock levels are not reserved.
    pub fn place_order(&self, principal: PrincipalId, items: Vec<ProductId>) -> Outcome<OrderView> {
        if let Err(denial) = self.checker.check(principal, &self.place) {
            return denial.into();
        }

        let mut total = 0.0;
        for item in &items {
            match self.products.get(*item) {
                Some(product) => total += product.price,
                None => {
                    warn!(principal = %principal, product = %item, "Order references unknown product");
                    return Outcome::not_found(ResourceKind::Product, item);
                }
            }
        }

        let order = Order::new(self.orders.allocate_id(), principal, items, total);
        info!(principal = %principal, order = %order.id, total, "Order placed");
        let view = self.view_of(&order);
        self.orders.insert(order);
        Outcome::Granted(view)
    }

    /// Move an order to a new status.
    pub fn update_status(&self, principal: PrincipalId, id: OrderId, status: OrderStatus) -> Outcome<OrderView> {
        if let Err(denial) = self.checker.check(principal, &self.update_status) {
            return denial.into();
        }
        match self.orders.set_status(id, status) {
            Some(order) => {
                info!(principal = %principal, order = %id, status = status.as_str(), "Order status updated");
                Outcome::Granted(self.view_of(&order))
            }
            None => Outcome::not_found(ResourceKind::Order, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, ALICE, BOB, CAROL, ERIN};

    fn service() -> (OrderService, testing::Fixture) {
        let fixture = testing::fixture();
        let service = OrderService::new(
            fixture.checker.clone(),
            fixture.orders.clone(),
            fixture.products.clone(),
        );
        (service, fixture)
    }

    #[test]
    fn test_customer_sees_only_own_orders() {
        let (orders, _) = service();
        let ids: Vec<OrderId> = orders.list_orders(ALICE).granted().unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![OrderId(1), OrderId(2)]);

        let ids: Vec<OrderId> = orders.list_orders(ERIN).granted().unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![OrderId(3)]);
    }

    #[test]
    fn test_sales_rep_sees_all_orders() {
        let (orders, _) = service();
        assert_eq!(orders.list_orders(BOB).granted().unwrap().len(), 3);
    }

    #[test]
    fn test_no_order_permission_denied() {
        let (orders, _) = service();
        let outcome = orders.list_orders(CAROL);
        assert_eq!(outcome.denial().unwrap().reason, "No permission to view orders");
        assert!(orders.get_order(CAROL, OrderId(404)).is_denied());
    }

    #[test]
    fn test_ownership_rule() {
        let (orders, _) = service();

        let own = orders.get_order(ALICE, OrderId(1)).granted().unwrap();
        assert_eq!(own.products, vec!["Gaming Laptop", "Wireless Headphones"]);

        let foreign = orders.get_order(ERIN, OrderId(1));
        let denial = foreign.denial().unwrap();
        assert_eq!(denial.reason, "Can only view your own orders");
        assert_eq!(denial.required, vec![VIEW_ALL_ORDERS]);

        assert!(orders.get_order(BOB, OrderId(1)).is_granted());
    }

    #[test]
    fn test_missing_order_is_not_found_not_denied() {
        let (orders, _) = service();
        assert!(orders.get_order(ERIN, OrderId(404)).is_not_found());
        assert!(orders.get_order(BOB, OrderId(404)).is_not_found());
    }

    #[test]
    fn test_place_order() {
        let (orders, fixture) = service();

        let view = orders.place_order(ERIN, vec![ProductId(2), ProductId(3)]).granted().unwrap();
        assert_eq!(view.id, OrderId(4));
        assert_eq!(view.owner, ERIN);
        assert_eq!(view.status, OrderStatus::Pending);
        assert!((view.total - 699.98).abs() < 1e-9);
        assert_eq!(fixture.products.get(ProductId(2)).unwrap().stock, 100);

        assert!(orders.get_order(ERIN, OrderId(4)).is_granted());
        assert!(orders.get_order(ALICE, OrderId(4)).is_denied());
    }

    #[test]
    fn test_place_order_rejections() {
        let (orders, fixture) = service();
        assert!(orders.place_order(BOB, vec![ProductId(1)]).is_denied());
        assert!(orders.place_order(ALICE, vec![ProductId(1), ProductId(77)]).is_not_found());
        assert_eq!(fixture.orders.list().len(), 3);
    }

    #[test]
    fn test_update_status() {
        let (orders, _) = service();

        assert!(orders.update_status(ALICE, OrderId(1), OrderStatus::Shipped).is_denied());

        let view = orders.update_status(BOB, OrderId(1), OrderStatus::Shipped).granted().unwrap();
        assert_eq!(view.status, OrderStatus::Shipped);
        assert_eq!(
            orders.get_order(ALICE, OrderId(1)).granted().map(|o| o.status),
            Some(OrderStatus::Shipped)
        );
        assert!(orders.update_status(BOB, OrderId(99), OrderStatus::Shipped).is_not_found());
    }

    #[test]
    fn test_unknown_product_in_order_renders_as_id() {
        let (orders, fixture) = service();
        fixture.orders.insert(Order::new(OrderId(10), ALICE, vec![ProductId(1), ProductId(55)], 999.99));
        let view = orders.get_order(ALICE, OrderId(10)).granted().unwrap();
        assert_eq!(view.products, vec!["Gaming Laptop", "55"]);
    }
}
