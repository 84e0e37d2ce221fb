//! Vector data types shared by encoders, stores and their callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form metadata attached to a stored vector.
pub type Metadata = serde_json::Map<String, Value>;

/// A vector with its id and metadata, as written to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique vector id.
    pub id: String,

    /// Embedding values.
    pub values: Vec<f32>,

    /// Attached metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorRecord {
    /// Create a record.
    pub fn new(id: impl Into<String>, values: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            values,
            metadata,
        }
    }

    /// Number of dimensions of the embedding.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// One similarity match, highest score first in query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVector {
    /// Vector id.
    pub id: String,

    /// Similarity score (cosine for the in-memory store).
    pub score: f32,

    /// Metadata stored with the vector.
    #[serde(default)]
    pub metadata: Metadata,
}

impl ScoredVector {
    /// String metadata field, if present.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Numeric metadata field, if present.
    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(Value::as_f64)
    }
}

/// Summary of an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of stored vectors.
    pub count: u64,

    /// Dimension of stored vectors.
    pub dimension: usize,
}

/// Similarity metric an index ranks by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity
    #[default]
    Cosine,
    /// Euclidean distance
    Euclidean,
    /// Dot product
    #[serde(rename = "dotproduct")]
    DotProduct,
}

impl Metric {
    /// Get the string representation of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
            Metric::DotProduct => "dotproduct",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings used to create an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Index name.
    pub name: String,

    /// Vector length the index accepts.
    pub dimension: usize,

    /// Ranking metric.
    #[serde(default)]
    pub metric: Metric,

    /// Serverless cloud provider.
    pub cloud: String,

    /// Serverless region.
    pub region: String,
}

impl IndexSpec {
    /// Cosine index on `aws`/`us-east-1`.
    pub fn new(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric: Metric::Cosine,
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    /// Set the ranking metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

/// An existing index as reported by its store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescription {
    /// Index name.
    pub name: String,

    /// Vector length the index accepts.
    pub dimension: usize,

    /// Ranking metric.
    pub metric: Metric,

    /// Whether the index accepts reads and writes yet.
    pub ready: bool,
}
