//! Inventory mutation.

use tracing::info;

use storefront_org::PrincipalId;
use storefront_rbac::permissions::UPDATE_PRODUCT_STOCK;

use crate::authz::{AuthorizationChecker, Requirement};
use crate::models::{Product, ProductId};
use crate::outcome::{Outcome, ResourceKind};
use crate::store::ProductStore;

/// Stock level management over the shared product store.
#[derive(Debug, Clone)]
pub struct InventoryService {
    checker: AuthorizationChecker,
    products: ProductStore,
    update: Requirement,
}

impl InventoryService {
    pub fn new(checker: AuthorizationChecker, products: ProductStore) -> Self {
        Self {
            checker,
            products,
            update: Requirement::one("update_stock", UPDATE_PRODUCT_STOCK, "No permission to update stock"),
        }
    }

    /// Set the stock level of a product.
    pub fn update_stock(&self, principal: PrincipalId, id: ProductId, stock: u32) -> Outcome<Product> {
        if let Err(denial) = self.checker.check(principal, &self.update) {
            return denial.into();
        }
        match self.products.update(id, |product| product.stock = stock) {
            Some(product) => {
                info!(principal = %principal, product = %id, stock, "Stock updated");
                Outcome::Granted(product)
            }
            None => Outcome::not_found(ResourceKind::Product, id),
        }
    }
}
