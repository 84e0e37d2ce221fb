//! Vector index administration.
//!
//! Writes go to the vector store only after the caller's permission check
//! has passed. Vectors created from catalog products carry the product's
//! fields as metadata so that search hits can be shown without a catalog
//! lookup.
//!
//! Index lifecycle operations (ensure, reconfigure, drop, stats, clear) all
//! require `vector_manage_index`.

use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use storefront_org::PrincipalId;
use storefront_rbac::permissions::{VECTOR_CREATE, VECTOR_DELETE, VECTOR_MANAGE_INDEX, VECTOR_UPDATE};
use storefront_vector::{
    EmbeddingEncoder, IndexDescription, IndexSpec, IndexStats, Metadata, Metric, VectorError, VectorRecord,
    VectorStore,
};

use crate::authz::{AuthorizationChecker, Requirement};
use crate::error::ServiceResult;
use crate::models::{Product, ProductId};
use crate::outcome::{Outcome, ResourceKind};
use crate::store::ProductStore;

/// Index name used until [`VectorAdminService::with_index_name`] sets one.
pub const DEFAULT_INDEX_NAME: &str = "products";

/// Metadata stored with a product's vector.
pub fn product_metadata(product: &Product) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("product_id".into(), product.id.0.into());
    metadata.insert("name".into(), product.name.clone().into());
    metadata.insert("price".into(), product.price.into());
    metadata.insert("stock".into(), product.stock.into());
    metadata.insert("description".into(), product.description.clone().into());
    metadata
}

/// Permission-gated writes and maintenance on the vector index.
#[derive(Clone)]
pub struct VectorAdminService {
    checker: AuthorizationChecker,
    encoder: Arc<dyn EmbeddingEncoder>,
    store: Arc<dyn VectorStore>,
    products: ProductStore,
    index_name: String,
    create: Requirement,
    update: Requirement,
    delete: Requirement,
    manage: Requirement,
}

impl std::fmt::Debug for VectorAdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorAdminService")
            .field("index_name", &self.index_name)
            .field("dimension", &self.encoder.dimension())
            .finish()
    }
}

impl VectorAdminService {
    pub fn new(
        checker: AuthorizationChecker,
        encoder: Arc<dyn EmbeddingEncoder>,
        store: Arc<dyn VectorStore>,
        products: ProductStore,
    ) -> Self {
        Self {
            checker,
            encoder,
            store,
            products,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            create: Requirement::one("vector_create", VECTOR_CREATE, "No permission to create vectors"),
            update: Requirement::one("vector_update", VECTOR_UPDATE, "No permission to update vectors"),
            delete: Requirement::one("vector_delete", VECTOR_DELETE, "No permission to delete vectors"),
            manage: Requirement::one(
                "vector_manage_index",
                VECTOR_MANAGE_INDEX,
                "No permission to manage the vector index",
            ),
        }
    }

    /// Name given to indexes this service creates.
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    fn index_spec(&self, name: &str, metric: Metric) -> IndexSpec {
        IndexSpec::new(name, self.encoder.dimension()).with_metric(metric)
    }

    async fn describe(&self) -> ServiceResult<Option<IndexDescription>> {
        let description = self
            .store
            .describe_index()
            .await
            .inspect_err(|e| warn!(error = %e, "Index describe failed"))?;
        Ok(description)
    }

    async fn build_index(&self, spec: &IndexSpec) -> ServiceResult<IndexDescription> {
        let description = self
            .store
            .create_index(spec)
            .await
            .inspect_err(|e| warn!(error = %e, "Index create failed"))?;
        Ok(description)
    }

    async fn embed(&self, text: &str) -> ServiceResult<Vec<f32>> {
        let values = self
            .encoder
            .encode(text)
            .await
            .inspect_err(|e| warn!(error = %e, "Embedding failed"))?;
        Ok(values)
    }

    async fn write(&self, record: VectorRecord) -> ServiceResult<()> {
        self.store
            .upsert(vec![record])
            .await
            .inspect_err(|e| warn!(error = %e, "Vector upsert failed"))?;
        Ok(())
    }

    /// Embed a catalog product's description and record the vector id on
    /// the product.
    ///
    /// Re-indexing a product overwrites its existing vector in place, so it
    /// also requires `vector_update`.
    #[instrument(skip_all, fields(principal = %principal, product = %id))]
    pub async fn index_product(&self, principal: PrincipalId, id: ProductId) -> ServiceResult<Outcome<Product>> {
        if let Err(denial) = self.checker.check(principal, &self.create) {
            return Ok(denial.into());
        }
        let Some(product) = self.products.get(id) else {
            return Ok(Outcome::not_found(ResourceKind::Product, id));
        };
        if product.vector_id.is_some() {
            if let Err(denial) = self.checker.check(principal, &self.update) {
                return Ok(denial.into());
            }
        }

        let vector_id = product
            .vector_id
            .clone()
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let values = self.embed(&product.description).await?;
        self.write(VectorRecord::new(vector_id.clone(), values, product_metadata(&product)))
            .await?;

        info!(vector_id = %vector_id, "Product indexed");
        match self.products.update(id, |p| p.vector_id = Some(vector_id)) {
            Some(product) => Ok(Outcome::Granted(product)),
            None => Ok(Outcome::not_found(ResourceKind::Product, id)),
        }
    }

    /// Embed `text` into a new vector and return its generated id.
    #[instrument(skip_all, fields(principal = %principal))]
    pub async fn create_vector(
        &self,
        principal: PrincipalId,
        text: &str,
        metadata: Metadata,
    ) -> ServiceResult<Outcome<String>> {
        if let Err(denial) = self.checker.check(principal, &self.create) {
            return Ok(denial.into());
        }

        let vector_id = Uuid::now_v7().to_string();
        let values = self.embed(text).await?;
        self.write(VectorRecord::new(vector_id.clone(), values, metadata)).await?;

        info!(vector_id = %vector_id, "Vector created");
        Ok(Outcome::Granted(vector_id))
    }

    /// Re-embed an existing vector from `text` and replace its metadata.
    ///
    /// The existence check and the write are separate store calls. A delete
    /// landing between them is overwritten: the last writer wins and the
    /// vector exists again afterwards.
    #[instrument(skip_all, fields(principal = %principal, vector_id = %id))]
    pub async fn update_vector(
        &self,
        principal: PrincipalId,
        id: &str,
        text: &str,
        metadata: Metadata,
    ) -> ServiceResult<Outcome<()>> {
        if let Err(denial) = self.checker.check(principal, &self.update) {
            return Ok(denial.into());
        }
        if self.store.fetch(id).await?.is_none() {
            return Ok(Outcome::not_found(ResourceKind::Vector, id));
        }

        let values = self.embed(text).await?;
        self.write(VectorRecord::new(id, values, metadata)).await?;

        info!("Vector updated");
        Ok(Outcome::Granted(()))
    }

    /// Remove one vector. Products pointing at it are marked unindexed.
    #[instrument(skip_all, fields(principal = %principal, vector_id = %id))]
    pub async fn delete_vector(&self, principal: PrincipalId, id: &str) -> ServiceResult<Outcome<()>> {
        if let Err(denial) = self.checker.check(principal, &self.delete) {
            return Ok(denial.into());
        }
        if self.store.fetch(id).await?.is_none() {
            return Ok(Outcome::not_found(ResourceKind::Vector, id));
        }

        self.store
            .delete(&[id.to_string()])
            .await
            .inspect_err(|e| warn!(error = %e, "Vector delete failed"))?;
        self.products.update_all(|p| {
            if p.vector_id.as_deref() == Some(id) {
                p.vector_id = None;
            }
        });

        info!("Vector deleted");
        Ok(Outcome::Granted(()))
    }

    /// Vector count and dimension of the index.
    #[instrument(skip_all, fields(principal = %principal))]
    pub async fn index_stats(&self, principal: PrincipalId) -> ServiceResult<Outcome<IndexStats>> {
        if let Err(denial) = self.checker.check(principal, &self.manage) {
            return Ok(denial.into());
        }
        let stats = self.store.stats().await?;
        Ok(Outcome::Granted(stats))
    }

    /// Drop every vector in the index and mark all products unindexed.
    #[instrument(skip_all, fields(principal = %principal))]
    pub async fn clear_index(&self, principal: PrincipalId) -> ServiceResult<Outcome<()>> {
        if let Err(denial) = self.checker.check(principal, &self.manage) {
            return Ok(denial.into());
        }

        self.store
            .delete_all()
            .await
            .inspect_err(|e| warn!(error = %e, "Index clear failed"))?;
        self.products.update_all(|p| p.vector_id = None);

        info!("Vector index cleared");
        Ok(Outcome::Granted(()))
    }

    /// Create the cosine index if it does not exist yet, sized for the
    /// encoder. An existing index is returned as is, unless its dimension
    /// cannot hold the encoder's vectors.
    #[instrument(skip_all, fields(principal = %principal, index = %self.index_name))]
    pub async fn ensure_index(&self, principal: PrincipalId) -> ServiceResult<Outcome<IndexDescription>> {
        if let Err(denial) = self.checker.check(principal, &self.manage) {
            return Ok(denial.into());
        }

        if let Some(existing) = self.describe().await? {
            let dimension = self.encoder.dimension();
            if existing.dimension != dimension {
                warn!(index_dimension = existing.dimension, dimension, "Index dimension does not match encoder");
                return Err(VectorError::DimensionMismatch {
                    expected: existing.dimension,
                    actual: dimension,
                }
                .into());
            }
            return Ok(Outcome::Granted(existing));
        }

        let created = self.build_index(&self.index_spec(&self.index_name, Metric::Cosine)).await?;
        info!(dimension = created.dimension, "Vector index created");
        Ok(Outcome::Granted(created))
    }

    /// Rebuild the index to rank by `metric`, keeping its name.
    ///
    /// Recreating drops every stored vector, so all products are marked
    /// unindexed. An index already using `metric` at the encoder's dimension
    /// is left alone.
    #[instrument(skip_all, fields(principal = %principal, metric = %metric))]
    pub async fn reconfigure_index(
        &self,
        principal: PrincipalId,
        metric: Metric,
    ) -> ServiceResult<Outcome<IndexDescription>> {
        if let Err(denial) = self.checker.check(principal, &self.manage) {
            return Ok(denial.into());
        }

        let existing = self.describe().await?;
        let name = match &existing {
            Some(current) if current.metric == metric && current.dimension == self.encoder.dimension() => {
                return Ok(Outcome::Granted(current.clone()));
            }
            Some(current) => current.name.clone(),
            None => self.index_name.clone(),
        };

        if existing.is_some() {
            self.store
                .delete_index()
                .await
                .inspect_err(|e| warn!(error = %e, "Index drop failed"))?;
            self.products.update_all(|p| p.vector_id = None);
        }
        let created = self.build_index(&self.index_spec(&name, metric)).await?;

        info!(index = %created.name, "Vector index reconfigured");
        Ok(Outcome::Granted(created))
    }

    /// Drop the index itself and mark all products unindexed.
    #[instrument(skip_all, fields(principal = %principal))]
    pub async fn drop_index(&self, principal: PrincipalId) -> ServiceResult<Outcome<()>> {
        if let Err(denial) = self.checker.check(principal, &self.manage) {
            return Ok(denial.into());
        }

        self.store
            .delete_index()
            .await
            .inspect_err(|e| warn!(error = %e, "Index drop failed"))?;
        self.products.update_all(|p| p.vector_id = None);

        info!("Vector index dropped");
        Ok(Outcome::Granted(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, ALICE, BOB, CAROL, DAVID};
    use serde_json::json;
    use storefront_rbac::{roles, PermissionSet};
    use storefront_vector::{HashingEncoder, MemoryVectorStore};

    const DIM: usize = 128;

    fn service() -> (VectorAdminService, Arc<MemoryVectorStore>, testing::Fixture) {
        let fixture = testing::fixture();
        let store = Arc::new(MemoryVectorStore::new(DIM));
        let admin = VectorAdminService::new(
            fixture.checker.clone(),
            Arc::new(HashingEncoder::new(DIM)),
            store.clone(),
            fixture.products.clone(),
        );
        (admin, store, fixture)
    }

    fn service_over(store: Arc<MemoryVectorStore>) -> (VectorAdminService, testing::Fixture) {
        let fixture = testing::fixture();
        let admin = VectorAdminService::new(
            fixture.checker.clone(),
            Arc::new(HashingEncoder::new(DIM)),
            store,
            fixture.products.clone(),
        );
        (admin, fixture)
    }

    fn promote_to_senior(fixture: &testing::Fixture, principal: PrincipalId) {
        fixture.checker.define(roles::SENIOR_DATA_SCIENTIST, roles::senior_data_scientist());
        fixture.checker.set_role(principal, roles::SENIOR_DATA_SCIENTIST).unwrap();
    }

    fn monitor() -> Metadata {
        match json!({ "name": "Gaming Monitor", "price": 399.99 }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_index_product_records_vector_id() {
        let (admin, store, fixture) = service();

        let product = admin.index_product(CAROL, ProductId(1)).await.unwrap().granted().unwrap();
        let vector_id = product.vector_id.clone().unwrap();
        assert_eq!(fixture.products.get(ProductId(1)).unwrap().vector_id, Some(vector_id.clone()));

        let stored = store.fetch(&vector_id).await.unwrap().unwrap();
        assert_eq!(stored.metadata["name"], json!("Gaming Laptop"));
        assert_eq!(stored.metadata["product_id"], json!(1));
        assert_eq!(stored.metadata["stock"], json!(50));

        let again = admin.index_product(CAROL, ProductId(1)).await.unwrap().granted().unwrap();
        assert_eq!(again.vector_id, Some(vector_id));
        assert_eq!(store.stats().await.unwrap().count, 1);

        assert!(admin.index_product(CAROL, ProductId(9)).await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_customer_cannot_create_vectors() {
        let (admin, store, _) = service();

        let outcome = admin
            .create_vector(ALICE, "New gaming monitor with 4K resolution", monitor())
            .await
            .unwrap();
        assert_eq!(outcome.denial().unwrap().to_string(), "Access Denied: No permission to create vectors");
        assert_eq!(store.stats().await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn test_create_update_delete_vector() {
        let (admin, store, _) = service();

        let id = admin
            .create_vector(CAROL, "New gaming monitor with 4K resolution", monitor())
            .await
            .unwrap()
            .granted()
            .unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let mut metadata = monitor();
        metadata.insert("price".into(), json!(349.99));
        assert!(admin
            .update_vector(CAROL, &id, "Discounted 4K gaming monitor", metadata)
            .await
            .unwrap()
            .is_granted());
        assert_eq!(store.fetch(&id).await.unwrap().unwrap().metadata["price"], json!(349.99));

        assert!(admin.update_vector(CAROL, "missing", "text", Metadata::new()).await.unwrap().is_not_found());
        assert!(admin.update_vector(ALICE, &id, "text", Metadata::new()).await.unwrap().is_denied());

        assert!(admin.delete_vector(BOB, &id).await.unwrap().is_denied());
        assert!(admin.delete_vector(CAROL, &id).await.unwrap().is_granted());
        assert!(admin.delete_vector(CAROL, &id).await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_vector_unindexes_product() {
        let (admin, _, fixture) = service();
        let product = admin.index_product(DAVID, ProductId(2)).await.unwrap().granted().unwrap();
        let vector_id = product.vector_id.unwrap();

        assert!(admin.delete_vector(DAVID, &vector_id).await.unwrap().is_granted());
        assert!(fixture.products.get(ProductId(2)).unwrap().vector_id.is_none());
    }

    #[tokio::test]
    async fn test_manage_index_requires_promotion() {
        let (admin, store, fixture) = service();
        for id in 1..=3 {
            assert!(admin.index_product(DAVID, ProductId(id)).await.unwrap().is_granted());
        }

        assert!(admin.index_stats(CAROL).await.unwrap().is_denied());
        assert!(admin.clear_index(CAROL).await.unwrap().is_denied());

        fixture.checker.define(roles::SENIOR_DATA_SCIENTIST, roles::senior_data_scientist());
        fixture.checker.set_role(CAROL, roles::SENIOR_DATA_SCIENTIST).unwrap();

        let stats = admin.index_stats(CAROL).await.unwrap().granted().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.dimension, DIM);

        assert!(admin.clear_index(CAROL).await.unwrap().is_granted());
        assert_eq!(store.stats().await.unwrap().count, 0);
        assert!(fixture.products.list().iter().all(|p| p.vector_id.is_none()));
    }

    #[tokio::test]
    async fn test_reindex_requires_update_permission() {
        let (admin, store, fixture) = service();
        fixture.checker.define("creator", PermissionSet::from_iter([VECTOR_CREATE]));
        fixture.checker.set_role(CAROL, "creator").unwrap();

        let product = admin.index_product(CAROL, ProductId(1)).await.unwrap().granted().unwrap();
        let vector_id = product.vector_id.unwrap();

        fixture.products.update(ProductId(1), |p| p.stock = 7);
        let outcome = admin.index_product(CAROL, ProductId(1)).await.unwrap();
        assert_eq!(outcome.denial().unwrap().reason, "No permission to update vectors");

        let stored = store.fetch(&vector_id).await.unwrap().unwrap();
        assert_eq!(stored.metadata["stock"], json!(50));
        assert_eq!(store.stats().await.unwrap().count, 1);

        // Products not yet indexed are still creations.
        assert!(admin.index_product(CAROL, ProductId(2)).await.unwrap().is_granted());
    }

    #[tokio::test]
    async fn test_update_after_delete_is_not_found() {
        let (admin, store, _) = service();
        let id = admin
            .create_vector(CAROL, "New gaming monitor with 4K resolution", monitor())
            .await
            .unwrap()
            .granted()
            .unwrap();

        assert!(admin.delete_vector(CAROL, &id).await.unwrap().is_granted());
        let outcome = admin.update_vector(CAROL, &id, "Discounted monitor", monitor()).await.unwrap();
        assert!(outcome.is_not_found());
        assert!(store.fetch(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_index_creates_missing_index() {
        let store = Arc::new(MemoryVectorStore::without_index());
        let (admin, fixture) = service_over(store.clone());
        let admin = admin.with_index_name("catalog");

        assert!(admin.ensure_index(CAROL).await.unwrap().is_denied());
        assert!(store.describe_index().await.unwrap().is_none());

        promote_to_senior(&fixture, CAROL);
        let created = admin.ensure_index(CAROL).await.unwrap().granted().unwrap();
        assert_eq!(created.name, "catalog");
        assert_eq!(created.dimension, DIM);
        assert_eq!(created.metric, Metric::Cosine);
        assert!(created.ready);

        // Second call finds the index and leaves its vectors alone.
        assert!(admin.index_product(DAVID, ProductId(1)).await.unwrap().is_granted());
        assert_eq!(admin.ensure_index(DAVID).await.unwrap().granted(), Some(created));
        assert_eq!(store.stats().await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_ensure_index_rejects_mismatched_dimension() {
        let (admin, _) = service_over(Arc::new(MemoryVectorStore::new(DIM * 2)));

        let err = admin.ensure_index(DAVID).await.unwrap_err();
        assert_eq!(err.error_code(), "DIMENSION_MISMATCH");
    }

    #[tokio::test]
    async fn test_reconfigure_index_rebuilds_with_metric() {
        let (admin, store, fixture) = service();
        for id in 1..=2 {
            assert!(admin.index_product(DAVID, ProductId(id)).await.unwrap().is_granted());
        }

        assert!(admin.reconfigure_index(CAROL, Metric::DotProduct).await.unwrap().is_denied());
        assert_eq!(store.stats().await.unwrap().count, 2);

        promote_to_senior(&fixture, CAROL);
        let rebuilt = admin
            .reconfigure_index(CAROL, Metric::DotProduct)
            .await
            .unwrap()
            .granted()
            .unwrap();
        assert_eq!(rebuilt.metric, Metric::DotProduct);
        assert_eq!(rebuilt.name, storefront_vector::store::MEMORY_INDEX_NAME);
        assert_eq!(store.stats().await.unwrap().count, 0);
        assert!(fixture.products.list().iter().all(|p| p.vector_id.is_none()));

        // Same metric again is a no-op.
        assert!(admin.index_product(CAROL, ProductId(3)).await.unwrap().is_granted());
        let unchanged = admin.reconfigure_index(CAROL, Metric::DotProduct).await.unwrap();
        assert_eq!(unchanged.granted(), Some(rebuilt));
        assert_eq!(store.stats().await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_drop_index_requires_manage_permission() {
        let (admin, store, fixture) = service();
        assert!(admin.index_product(DAVID, ProductId(1)).await.unwrap().is_granted());

        assert!(admin.drop_index(BOB).await.unwrap().is_denied());
        assert!(admin.drop_index(CAROL).await.unwrap().is_denied());
        assert!(store.describe_index().await.unwrap().is_some());

        assert!(admin.drop_index(DAVID).await.unwrap().is_granted());
        assert!(store.describe_index().await.unwrap().is_none());
        assert!(fixture.products.get(ProductId(1)).unwrap().vector_id.is_none());

        // Writes fail until the index exists again.
        let err = admin.index_product(DAVID, ProductId(1)).await.unwrap_err();
        assert_eq!(err.error_code(), "INDEX_NOT_FOUND");
        assert!(admin.ensure_index(DAVID).await.unwrap().is_granted());
        assert!(admin.index_product(DAVID, ProductId(1)).await.unwrap().is_granted());
    }
}
