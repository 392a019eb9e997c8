use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{selector, SourceAdapter};
use crate::app::Result;
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

const FRONT_URL: &str = "https://news.ycombinator.com/front";

fn default_max_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HackerNewsArgs {
    #[serde(default = "default_max_limit")]
    max_limit: usize,
}

/// Front-page stories, linking to the comment threads rather than the
/// submitted articles.
pub struct HackerNewsAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl HackerNewsAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

/// Story titles and subline comment anchors appear in the same document
/// order, so zipping them pairs each story with its thread. The zip also
/// caps the list at the shorter side if the page is mid-render.
fn parse_front_page(html: &str) -> Vec<Item> {
    let doc = Html::parse_document(html);
    let title_sel = selector(".titleline>a");
    let subline_sel = selector("span.subline a");

    let comments: Vec<String> = doc
        .select(&subline_sel)
        .filter(|a| a.text().collect::<String>().contains("comments"))
        .filter_map(|a| a.value().attr("href").map(String::from))
        .collect();

    doc.select(&title_sel)
        .map(|a| a.text().collect::<String>())
        .zip(comments)
        .map(|(title, href)| Item::new(title, format!("https://news.ycombinator.com/{href}")))
        .collect()
}

#[async_trait]
impl SourceAdapter for HackerNewsAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: HackerNewsArgs = serde_json::from_value(args)?;
        let html = self
            .fetcher
            .fetch(FetchRequest::get(FRONT_URL))
            .await?
            .text()?;
        let mut items = parse_front_page(&html);
        items.truncate(args.max_limit);
        Ok(FeedResult::new("hackersnews", FRONT_URL, items))
    }
}
