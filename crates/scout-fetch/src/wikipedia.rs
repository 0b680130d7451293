//! Encyclopedia articles from Wikipedia.
//!
//! Two calls per keyword: the MediaWiki search API for matching titles, then the REST
//! page summary for each title's lead extract. A failed summary falls back to the
//! search snippet.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use futures::future::join_all;
use log::debug;
use regex::Regex;
use scout_resource::{RawHit, ResourceDetail, ResourceKind};
use serde::Deserialize;
use url::Url;

use crate::{FetchError, HttpClient, ResourceSource};

/// Display name of the platform.
const SOURCE_NAME: &str = "Wikipedia";

/// Markup in search snippets.
static SNIPPET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("snippet tag pattern"));

/// MediaWiki search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Query result.
    query: SearchQuery,
}

/// The `query` object of a search response.
#[derive(Debug, Deserialize)]
struct SearchQuery {
    /// Matching pages.
    #[serde(default)]
    search: Vec<SearchHit>,
}

/// One search match.
#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    /// Page title.
    title: String,
    /// HTML snippet around the match.
    #[serde(default)]
    snippet: String,
}

/// REST page summary.
#[derive(Debug, Deserialize)]
struct PageSummary {
    /// Page title.
    title: String,
    /// Plain-text lead section.
    #[serde(default)]
    extract: String,
    /// Page kind; "disambiguation" pages are skipped.
    #[serde(rename = "type", default)]
    page_type: String,
    /// Canonical page links.
    content_urls: Option<ContentUrls>,
}

/// Links block of a page summary.
#[derive(Debug, Deserialize)]
struct ContentUrls {
    /// Desktop links.
    desktop: PageLinks,
}

/// Desktop links of a page.
#[derive(Debug, Deserialize)]
struct PageLinks {
    /// Article URL.
    page: String,
}

/// Wikipedia adapter for one language edition.
pub struct WikipediaSource {
    /// Shared client.
    client: Arc<HttpClient>,
    /// Language tag of the edition.
    language: String,
    /// Edition root, such as `https://en.wikipedia.org`.
    host: String,
}

impl WikipediaSource {
    /// Creates an adapter for the edition with the given language tag.
    pub fn new(client: Arc<HttpClient>, language: &str) -> Self {
        Self {
            client,
            language: language.to_string(),
            host: format!("https://{language}.wikipedia.org"),
        }
    }

    /// MediaWiki search URL.
    fn search_url(&self, keyword: &str, limit: usize) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/w/api.php", self.host))?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", keyword)
            .append_pair("srlimit", &limit.to_string())
            .append_pair("format", "json");
        Ok(url)
    }

    /// URL below the edition root with `title` as the final, escaped path segment.
    fn title_url(&self, prefix: &[&str], title: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.host)?;
        let segment = title.replace(' ', "_");
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().extend(prefix).push(&segment);
        }
        Ok(url)
    }

    /// Fetches the summary for one search match, falling back to its snippet.
    async fn page_hit(&self, hit: SearchHit) -> Result<Option<RawHit>, FetchError> {
        let fallback_url = self.title_url(&["wiki"], &hit.title)?;
        let summary_url = self.title_url(&["api", "rest_v1", "page", "summary"], &hit.title)?;
        match self.client.get_json::<PageSummary>(summary_url).await {
            Ok(summary) => Ok(summary_hit(summary, &fallback_url)),
            Err(e) => {
                debug!("summary for '{}' unavailable: {e}", hit.title);
                Ok(Some(snippet_hit(hit, &fallback_url)))
            }
        }
    }
}

#[async_trait]
impl ResourceSource for WikipediaSource {
    fn platform(&self) -> &'static str {
        "wikipedia"
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Text
    }

    fn for_language(&self, language: &str) -> Option<Arc<dyn ResourceSource>> {
        if language == self.language {
            return None;
        }
        Some(Arc::new(Self::new(Arc::clone(&self.client), language)))
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawHit>, FetchError> {
        let url = self.search_url(keyword, limit)?;
        let response: SearchResponse = self.client.get_json(url).await?;
        let pages = response.query.search.into_iter().take(limit);
        let hits = join_all(pages.map(|hit| self.page_hit(hit))).await;
        let mut out = Vec::new();
        for hit in hits {
            out.extend(hit?);
        }
        Ok(out)
    }
}

/// Converts a page summary into a hit; disambiguation pages yield nothing.
fn summary_hit(summary: PageSummary, fallback_url: &Url) -> Option<RawHit> {
    if summary.page_type == "disambiguation" {
        return None;
    }
    let url = summary
        .content_urls
        .map(|links| links.desktop.page)
        .unwrap_or_else(|| fallback_url.to_string());
    Some(RawHit {
        title: summary.title,
        url,
        source: SOURCE_NAME.to_string(),
        detail: ResourceDetail::Text {
            content: summary.extract,
        },
    })
}

/// Builds a hit from the search snippet alone.
fn snippet_hit(hit: SearchHit, url: &Url) -> RawHit {
    let content = SNIPPET_TAG.replace_all(&hit.snippet, "").into_owned();
    RawHit {
        title: hit.title,
        url: url.to_string(),
        source: SOURCE_NAME.to_string(),
        detail: ResourceDetail::Text { content },
    }
}
