//! Source adapters: one module per upstream, each normalizing a wildly
//! different payload shape (feeds, scraped HTML, nested JSON) into a
//! [`FeedResult`].
//!
//! The HTML extractors are hand-tuned to one page's current markup and are
//! expected to break when that markup changes. Keeping each extractor behind
//! its own `parse_*` function means a broken one can be reworked without
//! touching the router or the other adapters.

pub mod cdkeys;
pub mod cineworld;
pub mod downdetector;
pub mod epic;
pub mod hackernews;
pub mod liquipedia;
pub mod r6_news;
pub mod rotten_tomatoes;
pub mod rss;
pub mod twitch_streams;
pub mod twitch_vods;
pub mod weather;

use async_trait::async_trait;
use scraper::Selector;
use serde_json::Value;

use crate::app::Result;
use crate::domain::{FeedResult, Item};

/// One upstream source: deserialize the caller's args, fetch, normalize.
///
/// `items` in the returned result is final: filtering, sorting and
/// pagination are the adapter's responsibility, not the router's.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn execute(&self, args: Value) -> Result<FeedResult>;
}

/// Compile a selector known good at compile time.
pub(crate) fn selector(s: &'static str) -> Selector {
    Selector::parse(s).expect("static selector")
}

/// Offset-then-truncate over the final ordered sequence.
pub(crate) fn paginate(items: Vec<Item>, skip: usize, max_limit: usize) -> Vec<Item> {
    items.into_iter().skip(skip).take(max_limit).collect()
}
