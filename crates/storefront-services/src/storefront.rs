//! All storefront facades wired over one registry, directory and set of stores.

use std::sync::Arc;
use tracing::info;

use storefront_org::PrincipalDirectory;
use storefront_rbac::PermissionRegistry;
use storefront_vector::{
    EmbeddingEncoder, HashingEncoder, MemoryVectorStore, PineconeClient, VectorConfig, VectorStore,
};

use crate::authz::AuthorizationChecker;
use crate::catalog::CatalogService;
use crate::error::ServiceResult;
use crate::inventory::InventoryService;
use crate::orders::OrderService;
use crate::search::VectorSearchService;
use crate::store::{OrderStore, ProductStore};
use crate::users::UserAdminService;
use crate::vector_admin::VectorAdminService;

/// The storefront's facades, sharing one authorization checker.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use storefront_org::{Principal, PrincipalDirectory, PrincipalId};
/// use storefront_rbac::PermissionRegistry;
/// use storefront_services::{Product, ProductId, ProductStore, OrderStore, Storefront};
/// use storefront_vector::VectorConfig;
///
/// let directory = PrincipalDirectory::with_principals([Principal::new(PrincipalId(1), "alice", "customer")]);
/// let products = ProductStore::with_products([Product::new(ProductId(1), "Gaming Laptop", 999.99, 50, "Fast")]);
///
/// let storefront = Storefront::in_memory(
///     Arc::new(PermissionRegistry::with_standard_roles()),
///     Arc::new(directory),
///     products,
///     OrderStore::new(),
///     &VectorConfig::default(),
/// );
///
/// assert!(storefront.catalog.list_products(PrincipalId(1)).is_granted());
/// assert!(storefront.inventory.update_stock(PrincipalId(1), ProductId(1), 0).is_denied());
/// ```
#[derive(Debug, Clone)]
pub struct Storefront {
    checker: AuthorizationChecker,
    /// Product browsing
    pub catalog: CatalogService,
    /// Order visibility and lifecycle
    pub orders: OrderService,
    /// Stock levels
    pub inventory: InventoryService,
    /// Similarity search
    pub search: VectorSearchService,
    /// Vector index writes and maintenance
    pub vector_admin: VectorAdminService,
    /// Role assignment and definition
    pub users: UserAdminService,
}

impl Storefront {
    /// Wire every facade over the given collaborators.
    pub fn new(
        checker: AuthorizationChecker,
        products: ProductStore,
        orders: OrderStore,
        encoder: Arc<dyn EmbeddingEncoder>,
        store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            catalog: CatalogService::new(checker.clone(), products.clone()),
            orders: OrderService::new(checker.clone(), orders, products.clone()),
            inventory: InventoryService::new(checker.clone(), products.clone()),
            search: VectorSearchService::new(checker.clone(), encoder.clone(), store.clone())
                .with_default_top_k(default_top_k),
            vector_admin: VectorAdminService::new(checker.clone(), encoder, store, products),
            users: UserAdminService::new(checker.clone()),
            checker,
        }
    }

    /// Storefront backed by the hashing encoder and an in-process index.
    pub fn in_memory(
        registry: Arc<PermissionRegistry>,
        directory: Arc<PrincipalDirectory>,
        products: ProductStore,
        orders: OrderStore,
        config: &VectorConfig,
    ) -> Self {
        Self::new(
            AuthorizationChecker::new(registry, directory),
            products,
            orders,
            Arc::new(HashingEncoder::new(config.dimension)),
            Arc::new(MemoryVectorStore::new(config.dimension)),
            config.default_top_k,
        )
        .with_index_name(&config.index.index_name)
    }

    /// Storefront backed by the hashing encoder and a hosted index.
    pub fn with_hosted_index(
        registry: Arc<PermissionRegistry>,
        directory: Arc<PrincipalDirectory>,
        products: ProductStore,
        orders: OrderStore,
        config: &VectorConfig,
    ) -> ServiceResult<Self> {
        config.validate_for_production().map_err(storefront_vector::VectorError::from)?;
        let client = PineconeClient::from_config(config)?;
        info!(index = %config.index.index_name, dimension = config.dimension, "Using hosted vector index");

        Ok(Self::new(
            AuthorizationChecker::new(registry, directory),
            products,
            orders,
            Arc::new(HashingEncoder::new(config.dimension)),
            Arc::new(client),
            config.default_top_k,
        )
        .with_index_name(&config.index.index_name))
    }

    fn with_index_name(mut self, name: &str) -> Self {
        self.vector_admin = self.vector_admin.with_index_name(name);
        self
    }

    /// The checker all facades share.
    pub fn checker(&self) -> &AuthorizationChecker {
        &self.checker
    }
}
