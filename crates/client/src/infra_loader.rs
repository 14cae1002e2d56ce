//! Roadway-network snapshot loader.
//!
//! Fetches the snapshot from the server and keeps the raw payload
//! cached on disk.  When the server is unreachable the cached snapshot
//! is used instead (stale map data beats an empty map), and the source
//! is reported so callers can warn the operator.

use std::path::PathBuf;
use std::sync::Arc;

use tetres_infra::{cache, Infra, InfraError, InfraSnapshot};

use crate::error::ApiError;
use crate::http::HttpGateway;
use crate::urls::ApiUrls;

/// Where a loaded snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfraSource {
    Server,
    Cache,
}

/// Errors from loading the roadway network.
#[derive(Debug, thiserror::Error)]
pub enum InfraLoadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// Snapshot fetcher with disk-cache fallback.
pub struct InfraLoader {
    gateway: Arc<HttpGateway>,
    url: String,
    cache_dir: PathBuf,
}

impl InfraLoader {
    pub fn new(gateway: Arc<HttpGateway>, urls: &ApiUrls, cache_dir: PathBuf) -> Self {
        Self {
            gateway,
            url: urls.infra(),
            cache_dir,
        }
    }

    /// Load the network, preferring the server.
    ///
    /// A fresh fetch replaces the disk cache; a fetch failure falls
    /// back to the cache when one exists, otherwise the fetch error is
    /// returned.
    pub async fn load(&self) -> Result<(Infra, InfraSource), InfraLoadError> {
        match self.fetch().await {
            Ok(snapshot) => Ok((Infra::build(snapshot), InfraSource::Server)),
            Err(error) => {
                tracing::warn!(%error, "Snapshot fetch failed, trying disk cache");
                match cache::load(&self.cache_dir)? {
                    Some(snapshot) => {
                        tracing::info!("Loaded roadway network from disk cache");
                        Ok((Infra::build(snapshot), InfraSource::Cache))
                    }
                    None => Err(error.into()),
                }
            }
        }
    }

    async fn fetch(&self) -> Result<InfraSnapshot, ApiError> {
        let raw = self.gateway.get_text(&self.url).await?;
        let snapshot: InfraSnapshot = serde_json::from_str(&raw)?;

        if let Err(error) = cache::save_raw(&self.cache_dir, &raw) {
            // A broken cache must not block a successful fetch.
            tracing::warn!(%error, "Failed to cache roadway-network snapshot");
        }
        Ok(snapshot)
    }
}
