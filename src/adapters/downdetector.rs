use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::SourceAdapter;
use crate::app::Result;
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

fn default_service() -> String {
    "rainbow-six".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DowndetectorArgs {
    #[serde(default = "default_service")]
    service: String,
}

/// Outage-report statistics for one service slug.
///
/// The page embeds its chart data as `{ x: ..., y: <count> }` literals in a
/// script block; the middle five samples approximate "reports right now"
/// without the long tail of zeroes on either side.
pub struct DowndetectorAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl DowndetectorAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

fn middle_samples(page: &str) -> Vec<String> {
    // Static pattern, compilation cannot fail.
    let series = Regex::new(r"y: (\d+)").expect("static regex");
    let ys: Vec<String> = series
        .captures_iter(page)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();
    let mid = ys.len() / 2;
    ys[mid.saturating_sub(5)..mid].to_vec()
}

#[async_trait]
impl SourceAdapter for DowndetectorAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: DowndetectorArgs = serde_json::from_value(args)?;
        let url = format!("https://downdetector.co.uk/status/{}/", args.service);
        let page = self
            .fetcher
            .fetch(FetchRequest::get(url.as_str()))
            .await?
            .text()?;

        let summary = middle_samples(&page).join("-");
        let items = vec![Item::new(format!("Reports: {summary}"), url.clone())];
        Ok(FeedResult::unlinked(url, items))
    }
}
