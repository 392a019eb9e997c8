use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::SourceAdapter;
use crate::app::Result;
use crate::domain::{FeedResult, IgnoreList, Item};
use crate::twitch::TwitchClient;

fn default_game_name() -> String {
    "Tom Clancy's Rainbow Six Siege".to_string()
}

fn default_max_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TopStreamsArgs {
    #[serde(default = "default_game_name")]
    game_name: String,
    #[serde(default = "default_max_limit")]
    max_limit: usize,
    #[serde(default)]
    ignore_list: String,
}

/// Top live streams for one game: token, then game lookup, then stream list.
pub struct TwitchStreamsAdapter {
    twitch: Arc<TwitchClient>,
}

impl TwitchStreamsAdapter {
    pub fn new(twitch: Arc<TwitchClient>) -> Self {
        Self { twitch }
    }
}

#[async_trait]
impl SourceAdapter for TwitchStreamsAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: TopStreamsArgs = serde_json::from_value(args)?;
        let ignore = IgnoreList::parse(&args.ignore_list);

        let game_id = self.twitch.game_id(&args.game_name).await?;
        let streams = self.twitch.streams(&game_id).await?;

        // Globs match the login handle, not the display name: rebroadcast
        // bots change display names but keep their logins.
        let items = streams
            .into_iter()
            .filter(|s| !ignore.matches_glob(&s.user_login))
            .take(args.max_limit)
            .map(|s| {
                Item::new(
                    format!("{} {}", s.user_login, s.title),
                    format!("https://twitchls.com/{}", s.user_login),
                )
            })
            .collect();

        Ok(FeedResult::new(
            format!("twitch> {}", args.game_name),
            format!("https://twitch.tv/{}", args.game_name),
            items,
        ))
    }
}
