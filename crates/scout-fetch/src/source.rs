//! The platform adapter contract.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use scout_resource::{RawHit, Resource, ResourceKind};

use crate::{ArxivSource, FetchError, GithubSource, HttpClient, WikipediaSource, YoutubeSource};

/// A platform that can be searched for resources of one type.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Platform identifier, as used in configuration.
    fn platform(&self) -> &'static str;

    /// The type of resource this platform returns.
    fn kind(&self) -> ResourceKind;

    /// This platform serving content in `language`, when its results depend on it.
    ///
    /// `None` means the source is language-neutral or already serves `language`.
    fn for_language(&self, _language: &str) -> Option<Arc<dyn ResourceSource>> {
        None
    }

    /// Searches for `keyword`, returning at most `limit` hits.
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawHit>, FetchError>;
}

/// Searches one platform and validates its hits.
///
/// Failures are logged and yield an empty list. Hits without a title or with a non-http
/// URL are dropped. At most `limit` resources are returned.
pub async fn search_source(source: &dyn ResourceSource, keyword: &str, limit: usize) -> Vec<Resource> {
    let hits = match source.search(keyword, limit).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!("{} search for '{keyword}' failed: {e}", source.platform());
            return Vec::new();
        }
    };

    let mut resources = Vec::with_capacity(hits.len().min(limit));
    for hit in hits {
        if resources.len() >= limit {
            break;
        }
        match Resource::try_from(hit) {
            Ok(resource) => resources.push(resource),
            Err(e) => debug!("{}: dropping hit: {e}", source.platform()),
        }
    }
    debug!(
        "{} returned {} resources for '{keyword}'",
        source.platform(),
        resources.len()
    );
    resources
}

/// Instantiates the named platforms over a shared client.
///
/// Unknown names are logged and skipped; duplicates are ignored. `language` selects the
/// encyclopedia edition.
pub fn build_sources(
    platforms: &[String],
    client: &Arc<HttpClient>,
    language: &str,
) -> Vec<Arc<dyn ResourceSource>> {
    let mut sources: Vec<Arc<dyn ResourceSource>> = Vec::new();
    for name in platforms {
        if sources.iter().any(|s| s.platform() == name.as_str()) {
            continue;
        }
        match name.as_str() {
            "wikipedia" => sources.push(Arc::new(WikipediaSource::new(Arc::clone(client), language))),
            "youtube" => sources.push(Arc::new(YoutubeSource::new(Arc::clone(client)))),
            "github" => sources.push(Arc::new(GithubSource::new(Arc::clone(client)))),
            "arxiv" => sources.push(Arc::new(ArxivSource::new(Arc::clone(client)))),
            other => warn!("unknown platform '{other}', skipping"),
        }
    }
    sources
}
