//! Code repositories from the GitHub search API.

use std::sync::Arc;

use async_trait::async_trait;
use scout_resource::{RawHit, ResourceDetail, ResourceKind};
use serde::Deserialize;
use url::Url;

use crate::{FetchError, HttpClient, ResourceSource};

/// Display name of the platform.
const SOURCE_NAME: &str = "GitHub";

/// Most results the search API returns per page.
const MAX_PER_PAGE: usize = 100;

/// Repository search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Matching repositories.
    #[serde(default)]
    items: Vec<Repository>,
}

/// One repository.
#[derive(Debug, Deserialize)]
struct Repository {
    /// `owner/name`.
    full_name: String,
    /// Repository page.
    html_url: String,
    /// Free-text description.
    description: Option<String>,
    /// Star count.
    #[serde(default)]
    stargazers_count: u64,
    /// Primary language.
    language: Option<String>,
    /// Repository topics.
    #[serde(default)]
    topics: Vec<String>,
}

impl From<Repository> for RawHit {
    fn from(repo: Repository) -> Self {
        let mut description = repo.description.unwrap_or_default();
        if !repo.topics.is_empty() {
            if !description.is_empty() {
                description.push('\n');
            }
            description.push_str(&repo.topics.join(" ").replace('-', " "));
        }
        Self {
            title: repo.full_name,
            url: repo.html_url,
            source: SOURCE_NAME.to_string(),
            detail: ResourceDetail::Code {
                description,
                stars: Some(repo.stargazers_count),
                language: repo.language,
            },
        }
    }
}

/// GitHub repository search adapter.
pub struct GithubSource {
    /// Shared client.
    client: Arc<HttpClient>,
}

impl GithubSource {
    /// Creates the adapter.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

/// Repository search URL sorted by stars.
fn search_url(keyword: &str, limit: usize) -> Result<Url, FetchError> {
    let mut url = Url::parse("https://api.github.com/search/repositories")?;
    url.query_pairs_mut()
        .append_pair("q", keyword)
        .append_pair("sort", "stars")
        .append_pair("order", "desc")
        .append_pair("per_page", &limit.clamp(1, MAX_PER_PAGE).to_string());
    Ok(url)
}

#[async_trait]
impl ResourceSource for GithubSource {
    fn platform(&self) -> &'static str {
        "github"
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Code
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawHit>, FetchError> {
        let response: SearchResponse = self.client.get_json(search_url(keyword, limit)?).await?;
        Ok(response
            .items
            .into_iter()
            .take(limit)
            .map(RawHit::from)
            .collect())
    }
}
