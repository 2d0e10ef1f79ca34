//! HTTP client for the layout-analysis text extraction service.
//!
//! The service accepts raw document bytes and answers with the analyzed
//! layout: pages of lines. We flatten that to one plain-text string; the
//! downstream chunker neither knows nor cares about page boundaries.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use ragline_core::error::IndexerError;
use ragline_core::service::TextExtractor;

pub struct LayoutExtractClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl LayoutExtractClient {
    /// Create a new client with a bounded per-request timeout.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.endpoint)
    }
}

#[async_trait]
impl TextExtractor for LayoutExtractClient {
    async fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, IndexerError> {
        debug!(file = %file_name, size = bytes.len(), "Extracting text");

        let response = self
            .client
            .post(self.analyze_url())
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| IndexerError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Extraction service returned error");
            return Err(IndexerError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let analysis: AnalyzeResult = response.json().await.map_err(|e| IndexerError::ApiError {
            status_code: status,
            message: format!("Failed to parse extraction response: {e}"),
        })?;

        let text = analysis.into_text();
        if text.is_empty() {
            return Err(IndexerError::NoText(file_name.to_string()));
        }

        Ok(text)
    }
}

// --- Analysis wire types (internal) ---

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    pages: Vec<AnalyzedPage>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedPage {
    #[serde(default)]
    lines: Vec<AnalyzedLine>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedLine {
    #[serde(default)]
    content: String,
}

impl AnalyzeResult {
    /// Concatenate every line of every page, in document order.
    fn into_text(self) -> String {
        let mut text = String::new();
        for page in self.pages {
            for line in page.lines {
                text.push_str(&line.content);
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_url_shape() {
        let client = LayoutExtractClient::new("https://extract.example.net/", "key");
        assert_eq!(client.analyze_url(), "https://extract.example.net/analyze");
    }

    #[test]
    fn flattens_pages_and_lines_in_order() {
        let data = r#"{
            "pages": [
                {"lines": [{"content": "page one, "}, {"content": "line two."}]},
                {"lines": [{"content": "page two."}]}
            ]
        }"#;
        let analysis: AnalyzeResult = serde_json::from_str(data).unwrap();
        assert_eq!(analysis.into_text(), "page one, line two.page two.");
    }

    #[test]
    fn missing_pages_yield_empty_text() {
        let analysis: AnalyzeResult = serde_json::from_str("{}").unwrap();
        assert_eq!(analysis.into_text(), "");
    }
}
