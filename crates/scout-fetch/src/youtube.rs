//! Videos from YouTube search results.
//!
//! The results page embeds its data as a `ytInitialData` JSON object. Video entries
//! are `videoRenderer` objects found anywhere inside it.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use scout_resource::{RawHit, ResourceDetail, ResourceKind};
use serde_json::Value;
use url::Url;

use crate::{FetchError, HttpClient, ResourceSource};

/// Display name of the platform.
const SOURCE_NAME: &str = "YouTube";

/// Deepest nesting searched for renderers.
const MAX_DEPTH: usize = 64;

/// The embedded data blob.
static INITIAL_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)ytInitialData\s*=\s*(\{.*?\});\s*</script>").expect("initial data pattern")
});

/// YouTube search adapter.
pub struct YoutubeSource {
    /// Shared client.
    client: Arc<HttpClient>,
}

impl YoutubeSource {
    /// Creates the adapter.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSource for YoutubeSource {
    fn platform(&self) -> &'static str {
        "youtube"
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Video
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawHit>, FetchError> {
        let mut url = Url::parse("https://www.youtube.com/results")?;
        url.query_pairs_mut().append_pair("search_query", keyword);
        let html = self.client.get_text(url.clone()).await?;
        parse_results(&html, limit).ok_or_else(|| FetchError::Decode {
            url: url.to_string(),
            reason: "no ytInitialData in results page".to_string(),
        })
    }
}

/// Extracts up to `limit` videos from a results page; `None` if the page has no data.
fn parse_results(html: &str, limit: usize) -> Option<Vec<RawHit>> {
    let blob = INITIAL_DATA.captures(html)?.get(1)?.as_str();
    let data: Value = serde_json::from_str(blob).ok()?;
    let mut hits = Vec::new();
    collect_videos(&data, 0, limit, &mut hits);
    Some(hits)
}

/// Depth-first search for `videoRenderer` objects.
fn collect_videos(value: &Value, depth: usize, limit: usize, out: &mut Vec<RawHit>) {
    if out.len() >= limit || depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            if let Some(hit) = map.get("videoRenderer").and_then(video_hit) {
                out.push(hit);
            }
            for (key, child) in map {
                if key != "videoRenderer" {
                    collect_videos(child, depth + 1, limit, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_videos(item, depth + 1, limit, out);
            }
        }
        _ => {}
    }
}

/// Joins the `runs[].text` pieces of a formatted string, or returns its `simpleText`.
fn runs_text(value: &Value) -> String {
    if let Some(text) = value["simpleText"].as_str() {
        return text.to_string();
    }
    value["runs"]
        .as_array()
        .map(|runs| runs.iter().filter_map(|r| r["text"].as_str()).collect())
        .unwrap_or_default()
}

/// Builds a hit from one renderer; renderers without an id or title are skipped.
fn video_hit(renderer: &Value) -> Option<RawHit> {
    let video_id = renderer["videoId"].as_str().filter(|id| !id.is_empty())?;
    let title = runs_text(&renderer["title"]);
    if title.trim().is_empty() {
        return None;
    }

    let mut description = runs_text(&renderer["detailedMetadataSnippets"][0]["snippetText"]);
    if description.is_empty() {
        description = runs_text(&renderer["descriptionSnippet"]);
    }
    if description.is_empty() {
        description.clone_from(&title);
    }
    let thumbnail = renderer["thumbnail"]["thumbnails"]
        .as_array()
        .and_then(|thumbs| thumbs.last())
        .and_then(|t| t["url"].as_str())
        .map(str::to_string);

    Some(RawHit {
        title,
        url: format!("https://www.youtube.com/watch?v={video_id}"),
        source: SOURCE_NAME.to_string(),
        detail: ResourceDetail::Video {
            description,
            video_id: Some(video_id.to_string()),
            thumbnail,
        },
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const PAGE: &str = r#"<html><script nonce="x">var ytInitialData = {"contents":{"twoColumnSearchResultsRenderer":{"primaryContents":{"sectionListRenderer":{"contents":[{"itemSectionRenderer":{"contents":[
        {"videoRenderer":{"videoId":"abcdefghijk","title":{"runs":[{"text":"Graph Neural Networks explained"}]},
          "thumbnail":{"thumbnails":[{"url":"https://i.ytimg.com/small.jpg"},{"url":"https://i.ytimg.com/large.jpg"}]},
          "detailedMetadataSnippets":[{"snippetText":{"runs":[{"text":"Message "},{"text":"passing on graphs"}]}}]}},
        {"adSlotRenderer":{}},
        {"videoRenderer":{"videoId":"lmnopqrstuv","title":{"simpleText":"GNN lecture"}}},
        {"videoRenderer":{"title":{"simpleText":"no id"}}}
    ]}}]}}}}};</script><script>other()</script></html>"#;

    #[test]
    fn extracts_video_renderers() {
        let hits = parse_results(PAGE, 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Graph Neural Networks explained");
        assert_eq!(hits[0].url, "https://www.youtube.com/watch?v=abcdefghijk");
        assert_eq!(
            hits[0].detail,
            ResourceDetail::Video {
                description: "Message passing on graphs".to_string(),
                video_id: Some("abcdefghijk".to_string()),
                thumbnail: Some("https://i.ytimg.com/large.jpg".to_string()),
            }
        );
        assert_eq!(hits[1].detail.text(), "GNN lecture");
    }

    #[test]
    fn respects_limit() {
        assert_eq!(parse_results(PAGE, 1).unwrap().len(), 1);
    }

    #[test]
    fn missing_data_is_none() {
        assert!(parse_results("<html>consent wall</html>", 5).is_none());
    }
}
