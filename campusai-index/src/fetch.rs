//! Page fetching for index builds
//!
//! Pages are fetched exactly once per build run into an immutable
//! [`PageSnapshot`] that is passed by reference to the builder. A later run
//! re-fetches everything and replaces the index wholesale; within a run the
//! snapshot never changes.

use campusai_core::{AssistantError, CoreResult};
use std::time::Duration;
use tracing::{info, warn};

/// Raw pages captured for one build run.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pages: Vec<FetchedPage>,
}

/// One fetched page body with its source URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn pages(&self) -> &[FetchedPage] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch every URL once. Individual failures are logged and skipped so
    /// one unreachable page does not abort the whole build.
    pub async fn fetch_all(&self, urls: &[String]) -> PageSnapshot {
        let mut pages = Vec::with_capacity(urls.len());

        for url in urls {
            match self.fetch(url).await {
                Ok(html) => {
                    pages.push(FetchedPage {
                        url: url.clone(),
                        html,
                    });
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "skipping unreachable page");
                }
            }
        }

        info!(
            fetched = pages.len(),
            requested = urls.len(),
            "captured page snapshot"
        );
        PageSnapshot { pages }
    }

    async fn fetch(&self, url: &str) -> CoreResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssistantError::upstream("page fetch", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::upstream(
                "page fetch",
                format!("{} returned {}", url, status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| AssistantError::upstream("page fetch", e))
    }
}
