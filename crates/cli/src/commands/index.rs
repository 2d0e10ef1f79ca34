//! `ragline index` — Ingest documents into the search index.

use anyhow::{Context, bail};
use std::path::PathBuf;

use ragline_config::AppConfig;
use ragline_indexer::{IndexerOptions, LayoutExtractClient};
use ragline_providers::AzureOpenAiClient;
use ragline_search::SearchIndexClient;

pub async fn run(docs: Vec<PathBuf>, chunk_size: usize, overlap: usize) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The extraction service is only needed here, so it is not part of
    // startup validation.
    if config.extraction.endpoint.trim().is_empty() {
        bail!("extraction.endpoint is required for indexing (set RAGLINE_EXTRACTION_ENDPOINT)");
    }

    let extractor = LayoutExtractClient::new(
        config.extraction.endpoint.clone(),
        config.extraction.api_key.clone(),
    );
    let openai = AzureOpenAiClient::new(
        config.openai.endpoint.clone(),
        config.openai.api_key.clone(),
        config.openai.api_version.clone(),
    );
    let search = SearchIndexClient::new(
        config.search.endpoint.clone(),
        config.search.index.clone(),
        config.search.api_key.clone(),
    );

    println!("Ingesting {} file(s) into '{}'", docs.len(), config.search.index);

    let summary = ragline_indexer::index_paths(
        &extractor,
        &openai,
        &search,
        config.embedding_deployment(),
        &docs,
        IndexerOptions {
            chunk_size,
            overlap,
        },
    )
    .await
    .context("Ingestion failed")?;

    println!(
        "Indexed {} chunk(s) from {} file(s)",
        summary.chunks, summary.files
    );

    Ok(())
}
