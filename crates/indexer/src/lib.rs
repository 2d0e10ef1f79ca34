//! Document ingestion pipeline.
//!
//! Sequential batch flow, one document at a time: read the file, send it
//! to the extraction service, chunk the text, embed each chunk, upload
//! `{id, content, contentVector}` to the search index. Ingestion runs
//! offline from the CLI, never in the request path.

pub mod chunk;
pub mod extract;

use std::path::Path;
use tracing::info;

use ragline_core::error::IndexerError;
use ragline_core::retrieval::IndexDocument;
use ragline_core::service::{EmbeddingService, SearchIndex, TextExtractor};
use ragline_core::Result;

pub use chunk::ChunkSplitter;
pub use extract::LayoutExtractClient;

/// Chunking knobs for one ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct IndexerOptions {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

/// What one ingestion run accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub files: usize,
    pub chunks: usize,
}

/// Ingest every file in `paths` into the search index.
///
/// Chunk ids are ordinals over the whole run, so a multi-file run never
/// overwrites its own documents. Fails on the first broken file or
/// service call; everything uploaded before that stays in the index.
pub async fn index_paths(
    extractor: &dyn TextExtractor,
    embedding: &dyn EmbeddingService,
    index: &dyn SearchIndex,
    embedding_deployment: &str,
    paths: &[impl AsRef<Path>],
    options: IndexerOptions,
) -> Result<IndexSummary> {
    let splitter = ChunkSplitter::new(options.chunk_size, options.overlap);
    let mut summary = IndexSummary::default();
    let mut next_id = 0usize;

    for path in paths {
        let path = path.as_ref();
        let file_name = path.display().to_string();

        let bytes = tokio::fs::read(path).await.map_err(|e| IndexerError::Io {
            path: file_name.clone(),
            reason: e.to_string(),
        })?;

        info!(file = %file_name, size = bytes.len(), "Extracting document");
        let text = extractor.extract(&file_name, &bytes).await?;

        let chunks = splitter.split(&text);
        info!(file = %file_name, chunks = chunks.len(), "Document chunked");

        for (i, chunk) in chunks.iter().enumerate() {
            info!(file = %file_name, chunk = i + 1, total = chunks.len(), "Indexing chunk");

            let vector = embedding.embed(embedding_deployment, chunk).await?;
            let document = IndexDocument {
                id: next_id.to_string(),
                content: chunk.clone(),
                content_vector: vector,
            };
            index.upload(std::slice::from_ref(&document)).await?;

            next_id += 1;
            summary.chunks += 1;
        }

        summary.files += 1;
    }

    info!(files = summary.files, chunks = summary.chunks, "Ingestion complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragline_core::error::{ProviderError, SearchError};
    use ragline_core::retrieval::{HybridQuery, SearchOutcome};
    use std::io::Write;
    use std::sync::Mutex;

    struct EchoExtractor;

    #[async_trait]
    impl TextExtractor for EchoExtractor {
        async fn extract(
            &self,
            _file_name: &str,
            bytes: &[u8],
        ) -> std::result::Result<String, IndexerError> {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    struct CountingEmbedding {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl EmbeddingService for CountingEmbedding {
        async fn embed(
            &self,
            _deployment: &str,
            text: &str,
        ) -> std::result::Result<Vec<f32>, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            Ok(vec![text.chars().count() as f32])
        }
    }

    #[derive(Default)]
    struct RecordingIndex {
        uploaded: Mutex<Vec<IndexDocument>>,
    }

    #[async_trait]
    impl SearchIndex for RecordingIndex {
        async fn hybrid_search(
            &self,
            _q: &HybridQuery,
        ) -> std::result::Result<SearchOutcome, SearchError> {
            unimplemented!("not used by ingestion")
        }

        async fn upload(
            &self,
            documents: &[IndexDocument],
        ) -> std::result::Result<(), SearchError> {
            self.uploaded.lock().unwrap().extend_from_slice(documents);
            Ok(())
        }
    }

    fn temp_doc(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn indexes_chunks_with_sequential_ids_across_files() {
        let doc_a = temp_doc("alpha text\n\nbeta text");
        let doc_b = temp_doc("gamma text");

        let embedding = CountingEmbedding { calls: Mutex::new(0) };
        let index = RecordingIndex::default();

        let summary = index_paths(
            &EchoExtractor,
            &embedding,
            &index,
            "ada-deploy",
            &[doc_a.path(), doc_b.path()],
            IndexerOptions {
                chunk_size: 12,
                overlap: 0,
            },
        )
        .await
        .unwrap();

        assert_eq!(summary.files, 2);
        let uploaded = index.uploaded.lock().unwrap();
        assert_eq!(uploaded.len(), summary.chunks);
        for (i, doc) in uploaded.iter().enumerate() {
            assert_eq!(doc.id, i.to_string());
            assert!(!doc.content_vector.is_empty());
        }
        assert_eq!(*embedding.calls.lock().unwrap(), uploaded.len());
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let embedding = CountingEmbedding { calls: Mutex::new(0) };
        let index = RecordingIndex::default();

        let err = index_paths(
            &EchoExtractor,
            &embedding,
            &index,
            "ada-deploy",
            &[Path::new("/nonexistent/handbook.pdf")],
            IndexerOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ragline_core::Error::Indexer(IndexerError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn empty_run_uploads_nothing() {
        let embedding = CountingEmbedding { calls: Mutex::new(0) };
        let index = RecordingIndex::default();

        let summary = index_paths(
            &EchoExtractor,
            &embedding,
            &index,
            "ada-deploy",
            &Vec::<&Path>::new(),
            IndexerOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(summary, IndexSummary::default());
        assert!(index.uploaded.lock().unwrap().is_empty());
    }
}
