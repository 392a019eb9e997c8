use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{selector, SourceAdapter};
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

const BROWSE_URL: &str = "https://www.rottentomatoes.com/browse/movies_at_home/";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RottenTomatoesArgs {}

/// Streaming-at-home chart with audience and critic scores.
pub struct RottenTomatoesAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl RottenTomatoesAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

/// Entries missing either score are pre-release noise and get skipped;
/// an anchor without the score element at all means the markup moved.
fn parse_chart(html: &str) -> Result<Vec<Item>> {
    let doc = Html::parse_document(html);
    let anchor_sel = selector(r#"a[data-track="scores"]"#);
    let score_sel = selector("score-pairs-deprecated");
    let name_sel = selector("span");

    let mut items = Vec::new();
    for anchor in doc.select(&anchor_sel) {
        let scores = anchor
            .select(&score_sel)
            .next()
            .ok_or_else(|| EstuaryError::Parse("chart entry without score element".into()))?;
        let audience = scores.value().attr("audiencescore").unwrap_or_default();
        let critics = scores.value().attr("criticsscore").unwrap_or_default();
        if audience.is_empty() || critics.is_empty() {
            continue;
        }

        let name = anchor
            .select(&name_sel)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .ok_or_else(|| EstuaryError::Parse("chart entry without title span".into()))?;
        let href = anchor.value().attr("href").unwrap_or_default();
        items.push(Item::new(
            format!("{name} | audience/{audience} critics/{critics}"),
            format!("https://www.rottentomatoes.com{href}"),
        ));
    }
    Ok(items)
}

#[async_trait]
impl SourceAdapter for RottenTomatoesAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let _args: RottenTomatoesArgs = serde_json::from_value(args)?;
        let html = self
            .fetcher
            .fetch(FetchRequest::get(BROWSE_URL))
            .await?
            .text()?;
        Ok(FeedResult::unlinked("rotten tomatoes", parse_chart(&html)?))
    }
}
