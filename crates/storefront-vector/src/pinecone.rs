//! Hosted index client.
//!
//! HTTP client for a Pinecone-compatible index. Record operations go to the
//! index's data-plane host; creating, describing and dropping the index go
//! to the control-plane host. Implements [`VectorStore`] so the storefront
//! services can use a hosted index in place of [`crate::MemoryVectorStore`]
//! without any change.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{IndexEndpoint, VectorConfig};
use crate::error::{VectorError, VectorResult};
use crate::store::VectorStore;
use crate::types::{IndexDescription, IndexSpec, IndexStats, Metric, ScoredVector, VectorRecord};

/// Delay between readiness checks after creating an index.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Hosted index client.
#[derive(Clone)]
pub struct PineconeClient {
    /// HTTP client instance.
    client: Client,

    /// Index endpoint configuration.
    endpoint: IndexEndpoint,

    /// Request timeout.
    timeout: Duration,
}

impl std::fmt::Debug for PineconeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeClient")
            .field("host", &self.endpoint.host)
            .field("index_name", &self.endpoint.index_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PineconeClient {
    /// Create a new client for `endpoint`.
    pub fn new(endpoint: IndexEndpoint, timeout: Duration) -> VectorResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Create a client from collaborator configuration.
    pub fn from_config(config: &VectorConfig) -> VectorResult<Self> {
        config.validate()?;
        Self::new(config.index.clone(), config.timeout())
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> reqwest::RequestBuilder {
        let request = self.client.post(self.endpoint.url(path)).json(body);
        self.authorize(request)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.endpoint.api_key {
            Some(ref api_key) => request.header("Api-Key", api_key),
            None => request,
        }
    }

    fn index_url(&self, name: &str) -> String {
        self.endpoint.control_url(&format!("/indexes/{}", name))
    }

    async fn describe_named(&self, name: &str) -> VectorResult<Option<IndexDescription>> {
        let response = self.authorize(self.client.get(self.index_url(name))).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let model: IndexModel = self.handle_response(response).await?;
        Ok(Some(model.into()))
    }

    /// Handle API response.
    async fn handle_response<T>(&self, response: reqwest::Response) -> VectorResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| VectorError::InvalidResponse(e.to_string()))
    }

    /// Map an unsuccessful response to [`VectorError::Api`].
    async fn check_status(&self, response: reqwest::Response) -> VectorResult<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
                error!("Index authentication failed ({})", status.as_u16());
            } else {
                warn!("Index API error ({}): {}", status.as_u16(), message);
            }
            return Err(VectorError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl VectorStore for PineconeClient {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, records: Vec<VectorRecord>) -> VectorResult<usize> {
        let body = UpsertRequest { vectors: &records };
        let response = self.post("/vectors/upsert", &body).send().await?;
        let parsed: UpsertResponse = self.handle_response(response).await?;
        debug!(upserted = parsed.upserted_count, "Upserted vectors");
        Ok(parsed.upserted_count)
    }

    #[instrument(skip(self, vector), fields(dimension = vector.len()))]
    async fn query(&self, vector: &[f32], top_k: usize) -> VectorResult<Vec<ScoredVector>> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };
        let response = self.post("/query", &body).send().await?;
        let parsed: QueryResponse = self.handle_response(response).await?;
        debug!(matches = parsed.matches.len(), "Query complete");
        Ok(parsed.matches)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> VectorResult<Option<VectorRecord>> {
        let request = self
            .client
            .get(self.endpoint.url("/vectors/fetch"))
            .query(&[("ids", id)]);
        let response = self.authorize(request).send().await?;
        let mut parsed: FetchResponse = self.handle_response(response).await?;
        Ok(parsed.vectors.remove(id))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete(&self, ids: &[String]) -> VectorResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let body = DeleteRequest {
            ids: Some(ids),
            delete_all: None,
        };
        let response = self.post("/vectors/delete", &body).send().await?;
        let _: serde_json::Value = self.handle_response(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> VectorResult<()> {
        let body = DeleteRequest {
            ids: None,
            delete_all: Some(true),
        };
        let response = self.post("/vectors/delete", &body).send().await?;
        let _: serde_json::Value = self.handle_response(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> VectorResult<IndexStats> {
        let response = self
            .post("/describe_index_stats", &serde_json::json!({}))
            .send()
            .await?;
        let parsed: StatsResponse = self.handle_response(response).await?;
        Ok(IndexStats {
            count: parsed.total_vector_count,
            dimension: parsed.dimension,
        })
    }

    #[instrument(skip(self), fields(index = %self.endpoint.index_name))]
    async fn describe_index(&self) -> VectorResult<Option<IndexDescription>> {
        self.describe_named(&self.endpoint.index_name).await
    }

    #[instrument(skip(self, spec), fields(index = %spec.name, dimension = spec.dimension))]
    async fn create_index(&self, spec: &IndexSpec) -> VectorResult<IndexDescription> {
        let body = CreateIndexRequest {
            name: &spec.name,
            dimension: spec.dimension,
            metric: spec.metric,
            spec: IndexPlacement {
                serverless: Serverless {
                    cloud: &spec.cloud,
                    region: &spec.region,
                },
            },
        };
        let request = self.client.post(self.endpoint.control_url("/indexes")).json(&body);
        let response = self.authorize(request).send().await?;
        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(VectorError::IndexExists(spec.name.clone()));
        }
        let model: IndexModel = self.handle_response(response).await?;

        let mut description = IndexDescription::from(model);
        let deadline = Instant::now() + self.timeout;
        while !description.ready {
            if Instant::now() >= deadline {
                warn!("Index did not become ready within {:?}", self.timeout);
                return Err(VectorError::IndexNotReady(spec.name.clone()));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
            description = self
                .describe_named(&spec.name)
                .await?
                .ok_or_else(|| VectorError::IndexNotFound(spec.name.clone()))?;
        }

        info!(metric = %description.metric, "Index created");
        Ok(description)
    }

    #[instrument(skip(self), fields(index = %self.endpoint.index_name))]
    async fn delete_index(&self) -> VectorResult<()> {
        let request = self.client.delete(self.index_url(&self.endpoint.index_name));
        let response = self.authorize(request).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("Index already absent");
            return Ok(());
        }
        self.check_status(response).await?;
        info!("Index deleted");
        Ok(())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredVector>,
}

#[derive(Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, VectorRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    ids: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete_all: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    dimension: usize,
    #[serde(default)]
    total_vector_count: u64,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: Metric,
    spec: IndexPlacement<'a>,
}

#[derive(Serialize)]
struct IndexPlacement<'a> {
    serverless: Serverless<'a>,
}

#[derive(Serialize)]
struct Serverless<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Deserialize)]
struct IndexModel {
    name: String,
    dimension: usize,
    #[serde(default)]
    metric: Metric,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Default, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

impl From<IndexModel> for IndexDescription {
    fn from(model: IndexModel) -> Self {
        Self {
            name: model.name,
            dimension: model.dimension,
            metric: model.metric,
            ready: model.status.ready,
        }
    }
}
