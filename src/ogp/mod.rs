//! OGP thumbnail resolution with a per-URL memo.
//!
//! Each target URL is fetched at most once per resolver. Failures are
//! remembered as `None` and never retried.

mod microlink;

pub use microlink::{MicrolinkClient, DEFAULT_ENDPOINT};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::dom::Document;
use crate::render::ExternalGrid;

/// Errors from the metadata client. Lookup failures stay inside the resolver.
#[derive(Debug, Error)]
pub enum OgpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("no image in metadata response")]
    MissingImage,
}

/// Looks up the OGP image of a page through a metadata service.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_image(&self, target_url: &str) -> Result<String, OgpError>;
}

type CacheSlot = Arc<OnceCell<Option<String>>>;

/// Memoizing thumbnail resolver.
pub struct OgpResolver {
    fetcher: Arc<dyn MetadataFetcher>,
    cache: Mutex<HashMap<String, CacheSlot>>,
}

impl OgpResolver {
    pub fn new(fetcher: impl MetadataFetcher + 'static) -> Self {
        Self::with_fetcher(Arc::new(fetcher))
    }

    pub fn with_fetcher(fetcher: Arc<dyn MetadataFetcher>) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, url: &str) -> CacheSlot {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.entry(url.to_string()).or_default().clone()
    }

    /// Resolve the thumbnail image for `url`.
    ///
    /// Empty or absent URLs resolve to `None` without a request. Concurrent
    /// calls for the same URL share a single request.
    pub async fn resolve_thumbnail(&self, url: Option<&str>) -> Option<String> {
        let url = url.filter(|u| !u.is_empty())?;
        let slot = self.slot(url);

        slot.get_or_init(|| async {
            match self.fetcher.fetch_image(url).await {
                Ok(image) => {
                    debug!("Resolved OGP image for {}: {}", url, image);
                    Some(image)
                }
                Err(e) => {
                    warn!("OGP fetch failed for {}: {}", url, e);
                    None
                }
            }
        })
        .await
        .clone()
    }

    /// The settled cache entry for `url`: `Some(None)` for a remembered failure,
    /// `None` if the URL was never resolved.
    pub fn cached(&self, url: &str) -> Option<Option<String>> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(url).and_then(|slot| slot.get().cloned())
    }

    /// Resolve every pending thumbnail of `grid` concurrently.
    ///
    /// Each success replaces its card's placeholder and re-mounts the grid as
    /// soon as it completes; failures leave the placeholder. Returns the
    /// number of thumbnails replaced once every lookup has settled.
    pub async fn resolve_grid(&self, doc: &mut Document, grid: &mut ExternalGrid) -> usize {
        let pending = grid.pending();
        if pending.is_empty() {
            return 0;
        }
        debug!("Resolving {} pending thumbnail(s)", pending.len());

        let mut lookups: FuturesUnordered<_> = pending
            .into_iter()
            .map(|(index, url)| async move {
                let image = self.resolve_thumbnail(Some(&url)).await;
                (index, image)
            })
            .collect();

        let mut replaced = 0;
        while let Some((index, image)) = lookups.next().await {
            if let Some(image) = image {
                grid.set_resolved(index, image);
                grid.mount(doc);
                replaced += 1;
            }
        }
        replaced
    }
}
