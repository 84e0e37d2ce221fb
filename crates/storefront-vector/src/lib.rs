//! # Storefront Vector Collaborators
//!
//! The embedding encoder and vector store the storefront services call out
//! to for similarity search and index maintenance.
//!
//! ## Overview
//!
//! The storefront-vector crate handles:
//! - **Encoders**: The [`EmbeddingEncoder`] trait and a deterministic hashing encoder
//! - **Stores**: The [`VectorStore`] trait and an in-memory similarity store
//! - **Index lifecycle**: [`IndexSpec`] and [`IndexDescription`] for creating, describing and dropping an index
//! - **Hosted index**: [`PineconeClient`], an HTTP [`VectorStore`] for a hosted index
//! - **Configuration**: Environment-driven index and dimension settings
//!
//! ## Architecture
//!
//! ```text
//! storefront-services facade
//!   ├─ EmbeddingEncoder::encode(text) ──→ Vec<f32>
//!   └─ VectorStore
//!        ├─ MemoryVectorStore   (in-process)
//!        └─ PineconeClient      (HTTP data plane and control plane)
//! ```
//!
//! Both collaborators are opaque to their callers. Errors come back as
//! [`VectorError`] and are never retried here.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storefront_vector::{
//!     EmbeddingEncoder, HashingEncoder, MemoryVectorStore, Metadata, VectorRecord, VectorStore,
//! };
//!
//! async fn example() -> Result<(), storefront_vector::VectorError> {
//!     let encoder = HashingEncoder::new(384);
//!     let store = MemoryVectorStore::new(384);
//!
//!     let values = encoder.encode("wireless headphones").await?;
//!     store.upsert(vec![VectorRecord::new("v1", values, Metadata::new())]).await?;
//!
//!     let query = encoder.encode("headphones").await?;
//!     let hits = store.query(&query, 3).await?;
//!     println!("best match: {}", hits[0].id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod pinecone;
pub mod store;
pub mod types;

// Re-export main types
pub use config::{ConfigError, IndexEndpoint, VectorConfig};
pub use encoder::{EmbeddingEncoder, HashingEncoder};
pub use error::{VectorError, VectorResult};
pub use pinecone::PineconeClient;
pub use store::{MemoryVectorStore, VectorStore};
pub use types::{IndexDescription, IndexSpec, IndexStats, Metadata, Metric, ScoredVector, VectorRecord};
