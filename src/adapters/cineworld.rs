use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::SourceAdapter;
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, IgnoreList, Item};
use crate::fetcher::{FetchRequest, Fetcher};

const NOW_PLAYING_URL: &str =
    "https://www.cineworld.co.uk/uk/data-api-service/v1/feed/10108/byName/now-playing?lang=en_GB";
const CINEMA_URL: &str = "https://www.cineworld.co.uk/cinemas/edinburgh/037";

fn default_max_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoviesArgs {
    #[serde(default = "default_max_limit")]
    max_limit: usize,
    #[serde(default)]
    ignore_list: String,
}

/// Now-playing listings from the cinema chain's data API.
pub struct CineworldAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl CineworldAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[derive(Debug, Deserialize)]
struct NowPlayingResponse {
    body: NowPlayingBody,
}

#[derive(Debug, Deserialize)]
struct NowPlayingBody {
    posters: Vec<Poster>,
}

#[derive(Debug, Deserialize)]
struct Poster {
    #[serde(rename = "featureTitle")]
    feature_title: String,
    #[serde(default)]
    attributes: Vec<String>,
    url: String,
}

#[async_trait]
impl SourceAdapter for CineworldAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: MoviesArgs = serde_json::from_value(args)?;
        let ignore = IgnoreList::parse(&args.ignore_list);

        let body = self
            .fetcher
            .fetch(FetchRequest::get(NOW_PLAYING_URL))
            .await?
            .body()?;
        let parsed: NowPlayingResponse = serde_json::from_slice(&body)
            .map_err(|e| EstuaryError::Parse(format!("now-playing response: {e}")))?;

        let mut items = Vec::new();
        for poster in parsed.body.posters {
            // The ignore filter sees the full display title, attributes
            // included, so "3D" or "IMAX" work as keywords.
            let title = format!("{} | {}", poster.feature_title, poster.attributes.join("/"));
            if ignore.matches_substring(&title) {
                continue;
            }
            items.push(Item::new(title, poster.url));
        }
        items.truncate(args.max_limit);
        Ok(FeedResult::new("movies in theater", CINEMA_URL, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::StubFetcher;
    use serde_json::json;

    fn now_playing() -> String {
        json!({"body": {"posters": [
            {"featureTitle": "Dune Part Three", "attributes": ["2D", "IMAX"], "url": "https://www.cineworld.co.uk/films/dune-3"},
            {"featureTitle": "Some Kids Film", "attributes": ["3D"], "url": "https://www.cineworld.co.uk/films/kids"},
            {"featureTitle": "Bare Listing", "attributes": [], "url": "https://www.cineworld.co.uk/films/bare"}
        ]}})
        .to_string()
    }

    #[tokio::test]
    async fn test_titles_join_attributes() {
        let adapter = CineworldAdapter::new(Arc::new(StubFetcher::with_body(now_playing())));
        let res = adapter.execute(json!({})).await.unwrap();
        assert_eq!(res.items[0].title, "Dune Part Three | 2D/IMAX");
        assert_eq!(res.items[2].title, "Bare Listing | ");
        assert_eq!(res.link.as_deref(), Some(CINEMA_URL));
    }

    #[tokio::test]
    async fn test_ignore_list_matches_attributes_too() {
        let adapter = CineworldAdapter::new(Arc::new(StubFetcher::with_body(now_playing())));
        let res = adapter
            .execute(json!({"ignore_list": "3D"}))
            .await
            .unwrap();
        let titles: Vec<_> = res.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune Part Three | 2D/IMAX", "Bare Listing | "]);
    }

    #[tokio::test]
    async fn test_shape_mismatch_fails() {
        let adapter =
            CineworldAdapter::new(Arc::new(StubFetcher::with_body(r#"{"body": {}}"#)));
        let err = adapter.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, EstuaryError::Parse(_)));
    }
}
