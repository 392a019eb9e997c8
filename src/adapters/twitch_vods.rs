use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::SourceAdapter;
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, Item};
use crate::twitch::TwitchClient;

fn default_max_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VodsArgs {
    name: String,
    #[serde(default = "default_max_limit")]
    max_limit: usize,
}

/// Recent VODs for one streamer: token, then user lookup, then video list.
pub struct TwitchVodsAdapter {
    twitch: Arc<TwitchClient>,
}

impl TwitchVodsAdapter {
    pub fn new(twitch: Arc<TwitchClient>) -> Self {
        Self { twitch }
    }
}

fn format_created_at(created_at: &str) -> Result<String> {
    let when = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| EstuaryError::Parse(format!("video timestamp {created_at:?}: {e}")))?;
    Ok(when.with_timezone(&Local).format("%b %d %H:%M").to_string())
}

#[async_trait]
impl SourceAdapter for TwitchVodsAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: VodsArgs = serde_json::from_value(args)?;

        let user_id = self.twitch.user_id(&args.name).await?;
        let videos = self.twitch.videos(&user_id).await?;

        let items = videos
            .into_iter()
            .take(args.max_limit)
            .map(|v| {
                let when = format_created_at(&v.created_at)?;
                Ok(Item::new(format!("{} - {when}", v.title), v.url))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FeedResult::new(
            format!("vods> {}", args.name),
            format!("https://twitch.tv/{}/videos", args.name),
            items,
        ))
    }
}
