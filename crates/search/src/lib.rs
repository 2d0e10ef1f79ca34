//! Hybrid search index HTTP client.
//!
//! Speaks the index-scoped search REST dialect: one `POST
//! {endpoint}/indexes/{index}/docs/search` request carries both the
//! vector query (nearest-neighbor stage) and the text query (semantic
//! ranking stage), and asks for extractive captions/answers. Document
//! uploads go through the batch `docs/index` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ragline_core::error::SearchError;
use ragline_core::retrieval::{
    ExtractiveAnswer, HybridQuery, IndexDocument, RetrievedPassage, SearchOutcome,
};
use ragline_core::service::SearchIndex;

const API_VERSION: &str = "2024-07-01";

/// Name of the semantic ranking configuration the index was provisioned
/// with.
const SEMANTIC_CONFIGURATION: &str = "default";

/// Field holding each chunk's embedding.
const VECTOR_FIELD: &str = "contentVector";

/// HTTP client for one search index.
pub struct SearchIndexClient {
    endpoint: String,
    index: String,
    api_key: String,
    client: reqwest::Client,
}

impl SearchIndexClient {
    /// Create a new client with a bounded per-request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        index: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            index: index.into(),
            api_key: api_key.into(),
            client,
        }
    }

    fn docs_url(&self, operation: &str) -> String {
        format!(
            "{}/indexes/{}/docs/{}?api-version={}",
            self.endpoint, self.index, operation, API_VERSION
        )
    }

    fn map_send_error(e: reqwest::Error) -> SearchError {
        if e.is_timeout() {
            SearchError::Timeout(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    }

    fn build_request(query: &HybridQuery) -> SearchApiRequest {
        SearchApiRequest {
            search: query.text.clone(),
            query_type: "semantic".into(),
            semantic_configuration: SEMANTIC_CONFIGURATION.into(),
            vector_queries: vec![VectorQuery {
                kind: "vector".into(),
                vector: query.vector.clone(),
                k: query.k_nearest,
                fields: VECTOR_FIELD.into(),
            }],
            select: "id,content".into(),
            captions: query.want_extractive_answer.then(|| "extractive".into()),
            answers: query.want_extractive_answer.then(|| "extractive".into()),
            highlight_pre_tag: "<em>".into(),
            highlight_post_tag: "</em>".into(),
            top: query.top,
        }
    }
}

#[async_trait]
impl SearchIndex for SearchIndexClient {
    async fn hybrid_search(&self, query: &HybridQuery) -> Result<SearchOutcome, SearchError> {
        let url = self.docs_url("search");
        let body = Self::build_request(query);

        debug!(
            index = %self.index,
            text = %query.text,
            k = query.k_nearest,
            top = query.top,
            "Hybrid search"
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Search service returned error");
            return Err(SearchError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: SearchApiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(api_response.into_outcome())
    }

    async fn upload(&self, documents: &[IndexDocument]) -> Result<(), SearchError> {
        let url = self.docs_url("index");

        let body = UploadApiRequest {
            value: documents
                .iter()
                .map(|d| UploadAction {
                    action: "upload".into(),
                    id: d.id.clone(),
                    content: d.content.clone(),
                    content_vector: d.content_vector.clone(),
                })
                .collect(),
        };

        debug!(index = %self.index, count = documents.len(), "Uploading documents");

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();
        // 207 means per-document statuses; any hard failure shows up there
        if status != 200 && status != 207 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(())
    }
}

// --- Search API wire types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchApiRequest {
    search: String,
    query_type: String,
    semantic_configuration: String,
    vector_queries: Vec<VectorQuery>,
    select: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    captions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answers: Option<String>,
    highlight_pre_tag: String,
    highlight_post_tag: String,
    top: usize,
}

#[derive(Debug, Serialize)]
struct VectorQuery {
    kind: String,
    vector: Vec<f32>,
    k: usize,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct SearchApiResponse {
    #[serde(rename = "@search.answers", default)]
    answers: Vec<ApiAnswer>,

    #[serde(default)]
    value: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiAnswer {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    id: String,
    #[serde(default)]
    content: String,
}

impl SearchApiResponse {
    /// Results arrive in relevance-rank order; keep that order.
    fn into_outcome(self) -> SearchOutcome {
        SearchOutcome {
            passages: self
                .value
                .into_iter()
                .map(|r| RetrievedPassage {
                    id: r.id,
                    content: r.content,
                })
                .collect(),
            extractive_answers: self
                .answers
                .into_iter()
                .filter(|a| !a.text.is_empty())
                .map(|a| ExtractiveAnswer { text: a.text })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UploadApiRequest {
    value: Vec<UploadAction>,
}

#[derive(Debug, Serialize)]
struct UploadAction {
    #[serde(rename = "@search.action")]
    action: String,
    id: String,
    content: String,
    #[serde(rename = "contentVector")]
    content_vector: Vec<f32>,
}
