//! Similarity search over indexed products.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use storefront_org::PrincipalId;
use storefront_rbac::permissions::{VECTOR_SEARCH_ADVANCED, VECTOR_SEARCH_BASIC};
use storefront_vector::{EmbeddingEncoder, Metadata, ScoredVector, VectorStore};

use crate::authz::{AuthorizationChecker, Requirement};
use crate::error::ServiceResult;
use crate::outcome::Outcome;

/// Result count used when the caller does not ask for one.
pub const DEFAULT_TOP_K: usize = 3;

/// One search match with the product fields pulled out of its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Id of the matched vector
    pub vector_id: String,

    /// Similarity score, higher is closer
    pub score: f32,

    /// Product name, when the vector carries one
    pub product_name: Option<String>,

    /// Product price, when the vector carries one
    pub price: Option<f64>,

    /// Product description, when the vector carries one
    pub description: Option<String>,

    /// Everything stored with the vector
    pub metadata: Metadata,
}

impl From<ScoredVector> for SearchHit {
    fn from(scored: ScoredVector) -> Self {
        Self {
            product_name: scored.metadata_str("name").map(str::to_string),
            price: scored.metadata_f64("price"),
            description: scored.metadata_str("description").map(str::to_string),
            vector_id: scored.id,
            score: scored.score,
            metadata: scored.metadata,
        }
    }
}

/// Permission-gated similarity search.
#[derive(Clone)]
pub struct VectorSearchService {
    checker: AuthorizationChecker,
    encoder: Arc<dyn EmbeddingEncoder>,
    store: Arc<dyn VectorStore>,
    default_top_k: usize,
    search: Requirement,
}

impl std::fmt::Debug for VectorSearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorSearchService")
            .field("default_top_k", &self.default_top_k)
            .finish()
    }
}

impl VectorSearchService {
    pub fn new(
        checker: AuthorizationChecker,
        encoder: Arc<dyn EmbeddingEncoder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            checker,
            encoder,
            store,
            default_top_k: DEFAULT_TOP_K,
            search: Requirement::any(
                "vector_search",
                vec![VECTOR_SEARCH_BASIC, VECTOR_SEARCH_ADVANCED],
                "No permission to perform vector search",
            ),
        }
    }

    /// Override the result count used when a search passes `None`.
    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }

    /// Embed `query` and return the closest stored vectors.
    ///
    /// Either search permission is sufficient. Nothing is embedded or queried
    /// for a denied caller, nor when `top_k` is `Some(0)`.
    #[instrument(skip_all, fields(principal = %principal, top_k = ?top_k))]
    pub async fn search(
        &self,
        principal: PrincipalId,
        query: &str,
        top_k: Option<usize>,
    ) -> ServiceResult<Outcome<Vec<SearchHit>>> {
        if let Err(denial) = self.checker.check(principal, &self.search) {
            return Ok(denial.into());
        }

        let top_k = top_k.unwrap_or(self.default_top_k);
        if top_k == 0 {
            return Ok(Outcome::Granted(Vec::new()));
        }

        let vector = self
            .encoder
            .encode(query)
            .await
            .inspect_err(|e| warn!(error = %e, "Query embedding failed"))?;
        let matches = self
            .store
            .query(&vector, top_k)
            .await
            .inspect_err(|e| warn!(error = %e, "Similarity query failed"))?;

        debug!(matches = matches.len(), "Vector search completed");
        Ok(Outcome::Granted(matches.into_iter().map(SearchHit::from).collect()))
    }
}
