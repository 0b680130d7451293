//! Preprints from the arXiv query API.
//!
//! The API answers with an Atom feed. Entries are pulled out with patterns rather than
//! a full XML parser; only the title, abstract link, summary and author names are read.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use scout_resource::{RawHit, ResourceDetail, ResourceKind};
use url::Url;

use crate::{FetchError, HttpClient, ResourceSource};

/// Display name of the platform.
const SOURCE_NAME: &str = "arXiv";

/// Query endpoint; needs no credential.
const ENDPOINT: &str = "https://export.arxiv.org/api/query";

/// Most characters kept from an abstract.
const MAX_ABSTRACT_CHARS: usize = 1000;

/// Most author names listed.
const MAX_AUTHORS: usize = 5;

/// One feed entry.
static ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry>(.*?)</entry>").expect("entry pattern"));

/// Entry title.
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title[^>]*>(.*?)</title>").expect("title pattern"));

/// Entry id, the abstract page URL.
static ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<id>(.*?)</id>").expect("id pattern"));

/// Entry abstract.
static SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<summary[^>]*>(.*?)</summary>").expect("summary pattern"));

/// Author name.
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<name>(.*?)</name>").expect("name pattern"));

/// Any markup tag.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

/// Runs of whitespace.
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// arXiv search adapter.
pub struct ArxivSource {
    /// Shared client.
    client: Arc<HttpClient>,
}

impl ArxivSource {
    /// Creates the adapter.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSource for ArxivSource {
    fn platform(&self) -> &'static str {
        "arxiv"
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Text
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawHit>, FetchError> {
        let url = query_url(keyword, limit)?;
        let feed = self.client.get_text(url).await?;
        Ok(parse_feed(&feed, limit))
    }
}

/// Query URL searching all fields for `keyword`.
fn query_url(keyword: &str, limit: usize) -> Result<Url, FetchError> {
    let mut url = Url::parse(ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("search_query", &format!("all:{keyword}"))
        .append_pair("start", "0")
        .append_pair("max_results", &limit.to_string());
    Ok(url)
}

/// Extracts up to `limit` hits from an Atom feed. Entries without a title or id are
/// skipped.
fn parse_feed(feed: &str, limit: usize) -> Vec<RawHit> {
    ENTRY
        .captures_iter(feed)
        .filter_map(|c| c.get(1))
        .filter_map(|entry| entry_hit(entry.as_str()))
        .take(limit)
        .collect()
}

/// Builds a hit from the body of one `<entry>`.
fn entry_hit(entry: &str) -> Option<RawHit> {
    let title = field(&TITLE, entry).filter(|t| !t.is_empty())?;
    let url = field(&ID, entry)
        .filter(|id| !id.is_empty())?
        .replacen("http://", "https://", 1);

    let authors: Vec<String> = NAME
        .captures_iter(entry)
        .filter_map(|c| c.get(1))
        .map(|m| clean(m.as_str()))
        .filter(|name| !name.is_empty())
        .take(MAX_AUTHORS)
        .collect();

    let mut content = String::new();
    if !authors.is_empty() {
        content.push_str(&format!("Authors: {}\n\n", authors.join(", ")));
    }
    if let Some(summary) = field(&SUMMARY, entry).filter(|s| !s.is_empty()) {
        content.push_str("Abstract: ");
        content.extend(summary.chars().take(MAX_ABSTRACT_CHARS));
        if summary.chars().count() > MAX_ABSTRACT_CHARS {
            content.push_str("...");
        }
    }

    Some(RawHit {
        title,
        url,
        source: SOURCE_NAME.to_string(),
        detail: ResourceDetail::Text { content },
    })
}

/// First capture of `pattern` in `entry`, cleaned.
fn field(pattern: &Regex, entry: &str) -> Option<String> {
    pattern
        .captures(entry)
        .and_then(|c| c.get(1))
        .map(|m| clean(m.as_str()))
}

/// Drops markup, decodes the predefined XML entities and collapses whitespace.
fn clean(raw: &str) -> String {
    let text = TAG.replace_all(raw, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
