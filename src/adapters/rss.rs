use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use feed_rs::parser;
use html_escape::decode_html_entities;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{paginate, SourceAdapter};
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, IgnoreList, Item};
use crate::fetcher::{FetchRequest, Fetcher};

fn default_max_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RssArgs {
    url: String,
    #[serde(default = "default_max_limit")]
    max_limit: usize,
    #[serde(default)]
    skip: usize,
    #[serde(default)]
    ignore_list: String,
}

/// Generic feed reader: any RSS/Atom/JSON feed URL, sorted newest first.
pub struct RssAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl RssAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl SourceAdapter for RssAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: RssArgs = serde_json::from_value(args)?;
        let ignore = IgnoreList::parse(&args.ignore_list);

        let body = self
            .fetcher
            .fetch(FetchRequest::get(args.url.as_str()))
            .await?
            .body()?;
        let feed =
            parser::parse(body.as_slice()).map_err(|e| EstuaryError::Parse(e.to_string()))?;

        let mut items = Vec::new();
        for entry in feed.entries {
            let title = entry
                .title
                .map(|t| decode_html_entities(&t.content).to_string())
                .unwrap_or_default();
            if ignore.matches_substring(&title) {
                continue;
            }
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            let date = entry
                .published
                .or(entry.updated)
                .map(|d| d.with_timezone(&Utc));
            items.push(Item::dated(title, link, date));
        }

        // Stable sort: undated entries all share the epoch key and keep
        // their upstream order at the tail.
        items.sort_by_key(|i| Reverse(i.sort_date()));

        let title = feed
            .title
            .map(|t| decode_html_entities(&t.content).to_string())
            .unwrap_or_else(|| format!("rss> {}", args.url));
        let items = paginate(items, args.skip, args.max_limit);
        Ok(FeedResult::new(title, args.url, items))
    }
}
