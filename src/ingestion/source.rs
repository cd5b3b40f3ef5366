use super::types::{DocumentBatch, SourceDocument};

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Supplies the full document list for a bulk reindex.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns every document, in source order.
    async fn fetch_all_documents(&self) -> Result<Vec<SourceDocument>>;
}

/// Reads the document list from an HTTP endpoint serving a `DocumentBatch`.
pub struct HttpDocumentSource {
    url: String,
    http_client: reqwest::Client,
}

impl HttpDocumentSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_all_documents(&self) -> Result<Vec<SourceDocument>> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to reach document source {}", self.url))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Document source {} returned {}",
                self.url,
                response.status()
            ));
        }

        let batch: DocumentBatch = response
            .json()
            .await
            .context("Document source returned an invalid batch")?;

        tracing::debug!("Fetched {} documents from {}", batch.documents.len(), self.url);
        Ok(batch.documents)
    }
}

/// Serves a fixed list of documents.
pub struct StaticDocumentSource {
    documents: Vec<SourceDocument>,
}

impl StaticDocumentSource {
    pub fn new(documents: Vec<SourceDocument>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    async fn fetch_all_documents(&self) -> Result<Vec<SourceDocument>> {
        Ok(self.documents.clone())
    }
}
