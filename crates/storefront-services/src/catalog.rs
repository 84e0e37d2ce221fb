//! Catalog browsing.

use tracing::debug;

use storefront_org::PrincipalId;
use storefront_rbac::permissions::VIEW_PRODUCTS;

use crate::authz::{AuthorizationChecker, Requirement};
use crate::models::{Product, ProductId, ProductSummary};
use crate::outcome::{Outcome, ResourceKind};
use crate::store::ProductStore;

/// Read access to the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    checker: AuthorizationChecker,
    products: ProductStore,
    view: Requirement,
}

impl CatalogService {
    /// Create a catalog over a shared product store.
    pub fn new(checker: AuthorizationChecker, products: ProductStore) -> Self {
        Self {
            checker,
            products,
            view: Requirement::one("view_products", VIEW_PRODUCTS, "No permission to view products"),
        }
    }

    /// List every product.
    pub fn list_products(&self, principal: PrincipalId) -> Outcome<Vec<ProductSummary>> {
        if let Err(denial) = self.checker.check(principal, &self.view) {
            return denial.into();
        }
        let products: Vec<ProductSummary> = self.products.list().iter().map(Product::summary).collect();
        debug!(principal = %principal, count = products.len(), "Listed products");
        Outcome::Granted(products)
    }

    /// Fetch one product with its full description.
    pub fn get_product(&self, principal: PrincipalId, id: ProductId) -> Outcome<Product> {
        if let Err(denial) = self.checker.check(principal, &self.view) {
            return denial.into();
        }
        match self.products.get(id) {
            Some(product) => Outcome::Granted(product),
            None => Outcome::not_found(ResourceKind::Product, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_list_products_granted() {
        let fixture = testing::fixture();
        let catalog = CatalogService::new(fixture.checker.clone(), fixture.products.clone());

        let products = catalog.list_products(testing::ALICE).granted().unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].name, "Gaming Laptop");
    }

    #[test]
    fn test_list_products_denied_for_unknown_role() {
        let fixture = testing::fixture();
        let catalog = CatalogService::new(fixture.checker.clone(), fixture.products.clone());

        let outcome = catalog.list_products(testing::INTERN);
        assert_eq!(outcome.denial().unwrap().reason, "No permission to view products");
    }

    #[test]
    fn test_get_product_not_found() {
        let fixture = testing::fixture();
        let catalog = CatalogService::new(fixture.checker.clone(), fixture.products.clone());

        assert!(catalog.get_product(testing::ALICE, ProductId(99)).is_not_found());
        assert!(catalog.get_product(testing::INTERN, ProductId(99)).is_denied());
        assert_eq!(
            catalog.get_product(testing::ALICE, ProductId(2)).granted().map(|p| p.name),
            Some("Smartphone Pro".to_string())
        );
    }
}
