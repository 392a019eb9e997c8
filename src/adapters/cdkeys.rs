use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{selector, SourceAdapter};
use crate::app::Result;
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

const DEALS_URL: &str = "https://www.cdkeys.com/daily-deals";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CdkeysArgs {}

/// Daily game-key deals. Xbox Live top-ups are noise and get dropped.
pub struct CdkeysAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl CdkeysAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

/// The deals grid repeats product anchors across carousel copies; dedupe by
/// exact item equality, not by link alone.
fn parse_deals(html: &str) -> Vec<Item> {
    let doc = Html::parse_document(html);
    let product_sel = selector("a.product-item-link");

    let mut items = Vec::new();
    for anchor in doc.select(&product_sel) {
        let Some(link) = anchor.value().attr("href") else {
            continue;
        };
        if link.to_lowercase().contains("xbox-live") {
            continue;
        }
        let title = anchor.value().attr("title").unwrap_or_default();
        let item = Item::new(title, link);
        if !items.contains(&item) {
            items.push(item);
        }
    }
    items
}

#[async_trait]
impl SourceAdapter for CdkeysAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let _args: CdkeysArgs = serde_json::from_value(args)?;
        let html = self
            .fetcher
            .fetch(FetchRequest::get(DEALS_URL))
            .await?
            .text()?;
        Ok(FeedResult::new("cdkeys", DEALS_URL, parse_deals(&html)))
    }
}
