use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{selector, SourceAdapter};
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

const MAIN_PAGE_URL: &str = "https://liquipedia.net/rainbowsix/Main_Page";

fn default_max_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchesArgs {
    #[serde(default = "default_max_limit")]
    max_limit: usize,
}

/// Upcoming and live esports matches from the Liquipedia main page.
pub struct LiquipediaAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl LiquipediaAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

/// Liquipedia red-links carry this suffix in their title attribute.
fn strip_redlink(title: &str) -> String {
    title.replace(" (page does not exist)", "")
}

/// Countdown timestamps look like `November 20, 2025 - 18:00 UTC`.
fn parse_countdown(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim().trim_end_matches(" UTC");
    NaiveDateTime::parse_from_str(trimmed, "%B %d, %Y - %H:%M")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Extract match items relative to `now`.
///
/// Only match tables carrying a Twitch stream attribute count. A missing
/// league icon is a shape error; an unparseable countdown only drops the
/// time suffix for that one match.
fn parse_matches(html: &str, now: DateTime<Utc>) -> Result<Vec<Item>> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table.infobox_matches_content");
    let stream_sel = selector("span[data-stream-twitch]");
    let team_sel = selector("span.team-template-text > a");
    let league_sel = selector("span.league-icon-small-image a");
    let timer_sel = selector(".timer-object-countdown-only");

    let mut items = Vec::new();
    for table in doc.select(&table_sel) {
        if table.select(&stream_sel).next().is_none() {
            continue;
        }
        let teams: Vec<_> = table
            .select(&team_sel)
            .filter_map(|a| a.value().attr("title"))
            .collect();
        let [team_l, team_r] = teams.as_slice() else {
            continue;
        };

        let league = table
            .select(&league_sel)
            .next()
            .ok_or_else(|| EstuaryError::Parse("match table without league icon".into()))?;
        let league_title = league.value().attr("title").unwrap_or_default();
        let league_href = league.value().attr("href").unwrap_or_default();

        let mut title = format!(
            "[{league_title}] {} vs {}",
            strip_redlink(team_l),
            strip_redlink(team_r)
        );

        let countdown = table
            .select(&timer_sel)
            .next()
            .map(|t| t.text().collect::<String>());
        match countdown.as_deref().map(parse_countdown) {
            Some(Some(when)) => {
                let when_title = if now < when {
                    when.with_timezone(&Local).format("%b %d %H:%M").to_string()
                } else {
                    "LIVE".to_string()
                };
                title = format!("{title} - {when_title}");
            }
            other => {
                // Match entry stays, just without a time suffix.
                tracing::warn!(countdown = ?countdown, missing = other.is_none(), "unparseable match countdown");
            }
        }

        let item = Item::new(title, format!("https://liquipedia.net{league_href}"));
        if !items.contains(&item) {
            items.push(item);
        }
    }
    Ok(items)
}

#[async_trait]
impl SourceAdapter for LiquipediaAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: MatchesArgs = serde_json::from_value(args)?;
        let html = self
            .fetcher
            .fetch(FetchRequest::get(MAIN_PAGE_URL))
            .await?
            .text()?;
        let mut items = parse_matches(&html, Utc::now())?;
        items.truncate(args.max_limit);
        Ok(FeedResult::new("liquipedia", MAIN_PAGE_URL, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn match_table(team_l: &str, team_r: &str, countdown: &str) -> String {
        format!(
            r#"<table class="infobox_matches_content"><tbody><tr><td>
  <span class="team-template-text"><a title="{team_l}">{team_l}</a></span>
  <span class="team-template-text"><a title="{team_r}">{team_r}</a></span>
  <span class="league-icon-small-image"><a title="Six Invitational" href="/rainbowsix/Six_Invitational"></a></span>
  <span data-stream-twitch="rainbow6"></span>
  <span class="timer-object-countdown-only">{countdown}</span>
</td></tr></tbody></table>"#
        )
    }

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_countdown_format() {
        assert_eq!(
            parse_countdown("November 20, 2025 - 18:00 UTC"),
            Some(at(2025, 11, 20, 18))
        );
        assert_eq!(parse_countdown("soon"), None);
    }

    #[test]
    fn test_elapsed_countdown_is_live() {
        let html = match_table("Team A", "Team B", "November 20, 2025 - 18:00 UTC");
        let items = parse_matches(&html, at(2025, 11, 20, 19)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "[Six Invitational] Team A vs Team B - LIVE");
        assert_eq!(items[0].link, "https://liquipedia.net/rainbowsix/Six_Invitational");
    }

    #[test]
    fn test_future_countdown_gets_time_suffix() {
        let html = match_table("Team A", "Team B", "November 20, 2025 - 18:00 UTC");
        let items = parse_matches(&html, at(2025, 11, 19, 0)).unwrap();
        assert!(items[0].title.starts_with("[Six Invitational] Team A vs Team B - "));
        assert!(!items[0].title.ends_with("LIVE"));
    }

    #[test]
    fn test_bad_countdown_keeps_match_without_time() {
        let html = match_table("Team A", "Team B", "TBD");
        let items = parse_matches(&html, at(2025, 11, 19, 0)).unwrap();
        assert_eq!(items[0].title, "[Six Invitational] Team A vs Team B");
    }

    #[test]
    fn test_redlink_suffix_is_stripped() {
        let html = match_table("New Squad (page does not exist)", "Team B", "TBD");
        let items = parse_matches(&html, at(2025, 1, 1, 0)).unwrap();
        assert_eq!(items[0].title, "[Six Invitational] New Squad vs Team B");
    }

    #[test]
    fn test_duplicate_matches_collapse() {
        let html = format!(
            "{}{}",
            match_table("Team A", "Team B", "TBD"),
            match_table("Team A", "Team B", "TBD")
        );
        let items = parse_matches(&html, at(2025, 1, 1, 0)).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_tables_without_stream_or_two_teams_are_skipped() {
        let no_stream = r#"<table class="infobox_matches_content"><tbody><tr><td>
  <span class="team-template-text"><a title="A">A</a></span>
  <span class="team-template-text"><a title="B">B</a></span>
</td></tr></tbody></table>"#;
        let one_team = r#"<table class="infobox_matches_content"><tbody><tr><td>
  <span class="team-template-text"><a title="A">A</a></span>
  <span data-stream-twitch="x"></span>
</td></tr></tbody></table>"#;
        let html = format!("{no_stream}{one_team}");
        assert!(parse_matches(&html, at(2025, 1, 1, 0)).unwrap().is_empty());
    }
}
