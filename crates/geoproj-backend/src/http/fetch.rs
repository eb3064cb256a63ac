use async_trait::async_trait;
use geoproj_core::error::{GeoprojError, Result};
use geoproj_core::models::ResourceLocator;
use geoproj_core::ports::{FileFetcher, ResourceFetcher};

/// Fetches datasets over HTTP(S), delegating local paths to [`FileFetcher`]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, locator: &ResourceLocator) -> Result<String> {
        let url = match locator {
            ResourceLocator::Path(_) => return FileFetcher.fetch(locator).await,
            ResourceLocator::Url(url) => url,
        };

        let load_error = |reason: String| GeoprojError::DatasetLoad { name: url.clone(), reason };

        tracing::debug!(%url, "Fetching dataset");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| load_error(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_error(format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| load_error(format!("Failed to read body: {}", e)))
    }
}
