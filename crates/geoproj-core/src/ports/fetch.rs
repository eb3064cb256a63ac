use async_trait::async_trait;

use crate::error::{GeoprojError, Result};
use crate::models::ResourceLocator;

/// Port for retrieving dataset documents
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch the document at `locator` as text
    async fn fetch(&self, locator: &ResourceLocator) -> Result<String>;
}

/// Fetcher for local files
///
/// URLs are rejected; the HTTP-capable fetcher lives in the backend crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl ResourceFetcher for FileFetcher {
    async fn fetch(&self, locator: &ResourceLocator) -> Result<String> {
        match locator {
            ResourceLocator::Path(path) => {
                tokio::fs::read_to_string(path).await.map_err(|e| GeoprojError::DatasetLoad {
                    name: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
            ResourceLocator::Url(url) => Err(GeoprojError::DatasetLoad {
                name: url.clone(),
                reason: "remote datasets are not supported by the file fetcher".to_string(),
            }),
        }
    }
}
