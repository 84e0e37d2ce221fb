//! Vector store abstraction and in-memory implementation
//!
//! This module provides the [`VectorStore`] trait the storefront services
//! call for every index operation, and an in-memory implementation suited
//! to single-process deployments and tests.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{VectorError, VectorResult};
use crate::types::{IndexDescription, IndexSpec, IndexStats, Metric, ScoredVector, VectorRecord};

/// Similarity index operations.
///
/// Failures are returned as [`VectorError`]; implementations do not retry.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace records by id. Returns the number written.
    ///
    /// Replacing is unconditional: of two concurrent writers to one id, the
    /// later write wins, and an upsert after a delete recreates the record.
    async fn upsert(&self, records: Vec<VectorRecord>) -> VectorResult<usize>;

    /// The `top_k` records most similar to `vector`, best first.
    async fn query(&self, vector: &[f32], top_k: usize) -> VectorResult<Vec<ScoredVector>>;

    /// Fetch a single record by id.
    async fn fetch(&self, id: &str) -> VectorResult<Option<VectorRecord>>;

    /// Delete records by id. Unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> VectorResult<()>;

    /// Delete every record.
    async fn delete_all(&self) -> VectorResult<()>;

    /// Record count and dimension.
    async fn stats(&self) -> VectorResult<IndexStats>;

    /// The index this store serves, or `None` if it does not exist.
    async fn describe_index(&self) -> VectorResult<Option<IndexDescription>>;

    /// Create an index and wait until it is ready.
    ///
    /// Fails with [`VectorError::IndexExists`] if the index is already there.
    async fn create_index(&self, spec: &IndexSpec) -> VectorResult<IndexDescription>;

    /// Drop the index with every record in it. Dropping a missing index is
    /// not an error.
    async fn delete_index(&self) -> VectorResult<()>;
}

/// Name reported for an index created by [`MemoryVectorStore::new`].
pub const MEMORY_INDEX_NAME: &str = "memory";

#[derive(Default)]
struct MemoryIndex {
    description: Option<IndexDescription>,
    records: HashMap<String, VectorRecord>,
}

impl MemoryIndex {
    fn require(&self) -> VectorResult<&IndexDescription> {
        self.description
            .as_ref()
            .ok_or_else(|| VectorError::IndexNotFound(MEMORY_INDEX_NAME.to_string()))
    }

    fn check_dimension(&self, actual: usize) -> VectorResult<&IndexDescription> {
        let description = self.require()?;
        if actual != description.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: description.dimension,
                actual,
            });
        }
        Ok(description)
    }
}

/// In-memory vector store.
///
/// Brute-force scoring against every stored record with the index's metric.
/// Scores are higher-is-closer for every metric, so euclidean matches are
/// scored by negated distance. Results are ordered by descending score, ties
/// broken by ascending id, so queries are fully deterministic. All vectors
/// must have the index's dimension.
pub struct MemoryVectorStore {
    index: Arc<RwLock<MemoryIndex>>,
}

impl std::fmt::Debug for MemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryVectorStore").finish_non_exhaustive()
    }
}

impl MemoryVectorStore {
    /// Create a store with a ready, empty cosine index of `dimension` values.
    pub fn new(dimension: usize) -> Self {
        let index = MemoryIndex {
            description: Some(IndexDescription {
                name: MEMORY_INDEX_NAME.to_string(),
                dimension,
                metric: Metric::Cosine,
                ready: true,
            }),
            records: HashMap::new(),
        };
        Self {
            index: Arc::new(RwLock::new(index)),
        }
    }

    /// Create a store with no index; call [`VectorStore::create_index`] first.
    pub fn without_index() -> Self {
        Self {
            index: Arc::new(RwLock::new(MemoryIndex::default())),
        }
    }

    fn score(metric: Metric, a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        match metric {
            Metric::DotProduct => dot,
            Metric::Euclidean => -a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            Metric::Cosine => {
                let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 0.0;
                }
                dot / (norm_a * norm_b)
            }
        }
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, records: Vec<VectorRecord>) -> VectorResult<usize> {
        let mut index = self.index.write().await;
        // Validate the whole batch before writing any of it.
        for record in &records {
            index.check_dimension(record.dimension())?;
        }

        let count = records.len();
        for record in records {
            index.records.insert(record.id.clone(), record);
        }
        debug!(count, total = index.records.len(), "Upserted vectors");
        Ok(count)
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> VectorResult<Vec<ScoredVector>> {
        let index = self.index.read().await;
        let metric = index.check_dimension(vector.len())?.metric;

        let mut matches: Vec<ScoredVector> = index
            .records
            .values()
            .map(|record| ScoredVector {
                id: record.id.clone(),
                score: Self::score(metric, vector, &record.values),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn fetch(&self, id: &str) -> VectorResult<Option<VectorRecord>> {
        let index = self.index.read().await;
        index.require()?;
        Ok(index.records.get(id).cloned())
    }

    async fn delete(&self, ids: &[String]) -> VectorResult<()> {
        let mut index = self.index.write().await;
        index.require()?;
        for id in ids {
            index.records.remove(id);
        }
        Ok(())
    }

    async fn delete_all(&self) -> VectorResult<()> {
        let mut index = self.index.write().await;
        index.require()?;
        index.records.clear();
        Ok(())
    }

    async fn stats(&self) -> VectorResult<IndexStats> {
        let index = self.index.read().await;
        let dimension = index.require()?.dimension;
        Ok(IndexStats {
            count: index.records.len() as u64,
            dimension,
        })
    }

    async fn describe_index(&self) -> VectorResult<Option<IndexDescription>> {
        Ok(self.index.read().await.description.clone())
    }

    async fn create_index(&self, spec: &IndexSpec) -> VectorResult<IndexDescription> {
        let mut index = self.index.write().await;
        if let Some(existing) = &index.description {
            return Err(VectorError::IndexExists(existing.name.clone()));
        }

        let description = IndexDescription {
            name: spec.name.clone(),
            dimension: spec.dimension,
            metric: spec.metric,
            ready: true,
        };
        index.description = Some(description.clone());
        index.records.clear();
        debug!(name = %spec.name, dimension = spec.dimension, metric = %spec.metric, "Index created");
        Ok(description)
    }

    async fn delete_index(&self) -> VectorResult<()> {
        let mut index = self.index.write().await;
        index.description = None;
        index.records.clear();
        Ok(())
    }
}
