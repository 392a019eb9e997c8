//! Request dispatch: a static name→adapter table built once at startup,
//! replacing the original's runtime symbol lookup.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::adapters::{
    cdkeys::CdkeysAdapter, cineworld::CineworldAdapter, downdetector::DowndetectorAdapter,
    epic::EpicFreeGamesAdapter, hackernews::HackerNewsAdapter, liquipedia::LiquipediaAdapter,
    r6_news::R6NewsAdapter, rotten_tomatoes::RottenTomatoesAdapter, rss::RssAdapter,
    twitch_streams::TwitchStreamsAdapter, twitch_vods::TwitchVodsAdapter, weather::WeatherAdapter,
    SourceAdapter,
};
use crate::app::EstuaryError;
use crate::domain::Envelope;
use crate::fetcher::Fetcher;
use crate::twitch::TwitchClient;

pub struct Registry {
    adapters: HashMap<&'static str, Arc<dyn SourceAdapter>>,
}

impl Registry {
    /// Register every adapter under its wire name. Names match the request
    /// definitions the front-end already ships.
    pub fn new(fetcher: Arc<dyn Fetcher>, twitch: Arc<TwitchClient>) -> Self {
        let mut adapters: HashMap<&'static str, Arc<dyn SourceAdapter>> = HashMap::new();
        adapters.insert("fetch_rss", Arc::new(RssAdapter::new(fetcher.clone())));
        adapters.insert(
            "fetch_hackersnews",
            Arc::new(HackerNewsAdapter::new(fetcher.clone())),
        );
        adapters.insert("fetch_cdkeys", Arc::new(CdkeysAdapter::new(fetcher.clone())));
        adapters.insert(
            "fetch_r6_news",
            Arc::new(R6NewsAdapter::new(fetcher.clone())),
        );
        adapters.insert(
            "fetch_weather",
            Arc::new(WeatherAdapter::new(fetcher.clone())),
        );
        adapters.insert(
            "fetch_upcoming_r6_matches",
            Arc::new(LiquipediaAdapter::new(fetcher.clone())),
        );
        adapters.insert(
            "fetch_epic_free_games",
            Arc::new(EpicFreeGamesAdapter::new(fetcher.clone())),
        );
        adapters.insert(
            "fetch_movies_in_theatres",
            Arc::new(CineworldAdapter::new(fetcher.clone())),
        );
        adapters.insert(
            "fetch_downdetector",
            Arc::new(DowndetectorAdapter::new(fetcher.clone())),
        );
        adapters.insert(
            "fetch_rotten_tomatoes",
            Arc::new(RottenTomatoesAdapter::new(fetcher)),
        );
        adapters.insert(
            "fetch_top_twitch_streams",
            Arc::new(TwitchStreamsAdapter::new(twitch.clone())),
        );
        adapters.insert(
            "fetch_twitch_streamer_vods",
            Arc::new(TwitchVodsAdapter::new(twitch)),
        );
        Self { adapters }
    }

    pub fn contains(&self, req_type: &str) -> bool {
        self.adapters.contains_key(req_type)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.adapters.keys().copied()
    }

    /// Run one request to completion. Every failure mode collapses into the
    /// same opaque error envelope; the cause only reaches the logs.
    pub async fn resolve(&self, req_type: &str, args: Value) -> Envelope {
        tracing::debug!(req_type, %args, "dispatching");

        let Some(adapter) = self.adapters.get(req_type) else {
            log_failure(req_type, &EstuaryError::UnknownType(req_type.to_string()));
            return Envelope::error();
        };

        match adapter.execute(args).await {
            Ok(res) => Envelope::ok(res),
            Err(e) => {
                log_failure(req_type, &e);
                Envelope::error()
            }
        }
    }
}

/// Exhaustive over the error kinds so failure modes stay distinguishable in
/// the logs even though callers only ever see one error shape.
fn log_failure(req_type: &str, err: &EstuaryError) {
    match err {
        EstuaryError::Upstream { status, url } => {
            tracing::warn!(req_type, status = *status, url = %url, "upstream returned an http failure");
        }
        EstuaryError::UnknownType(t) => {
            tracing::warn!(req_type = %t, "unknown request type");
        }
        EstuaryError::BadArgs(e) => {
            tracing::warn!(req_type, error = %e, "arguments did not match the adapter");
        }
        EstuaryError::Parse(msg) => {
            tracing::warn!(req_type, error = %msg, "upstream payload did not parse");
        }
        EstuaryError::MissingCredentials => {
            tracing::warn!(req_type, "twitch credentials not configured");
        }
        EstuaryError::Http(e) => {
            tracing::warn!(req_type, error = %e, "transport failure");
        }
        EstuaryError::InvalidUrl(e) => {
            tracing::warn!(req_type, error = %e, "invalid request url");
        }
        EstuaryError::Io(e) => {
            tracing::warn!(req_type, error = %e, "io failure");
        }
        EstuaryError::Config(e) => {
            tracing::warn!(req_type, error = %e, "config failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EnvelopeCode;
    use crate::fetcher::testing::StubFetcher;
    use crate::fetcher::FetchOutcome;
    use serde_json::json;

    fn registry(stub: StubFetcher) -> Registry {
        let fetcher: Arc<dyn Fetcher> = Arc::new(stub);
        let twitch = Arc::new(TwitchClient::new(fetcher.clone(), None, None));
        Registry::new(fetcher, twitch)
    }

    const FEED: &str = r#"<?xml version="1.0"?><rss version="2.0"><channel>
<title>T</title>
<item><title>a</title><link>https://example.com/a</link></item>
</channel></rss>"#;

    #[tokio::test]
    async fn test_all_wire_names_registered() {
        let r = registry(StubFetcher::new(vec![]));
        for name in [
            "fetch_rss",
            "fetch_hackersnews",
            "fetch_cdkeys",
            "fetch_top_twitch_streams",
            "fetch_r6_news",
            "fetch_weather",
            "fetch_upcoming_r6_matches",
            "fetch_twitch_streamer_vods",
            "fetch_epic_free_games",
            "fetch_movies_in_theatres",
            "fetch_downdetector",
            "fetch_rotten_tomatoes",
        ] {
            assert!(r.contains(name), "{name} not registered");
        }
        assert_eq!(r.names().count(), 12);
    }

    #[tokio::test]
    async fn test_unknown_type_yields_exact_error_envelope() {
        let r = registry(StubFetcher::new(vec![]));
        let envelope = r.resolve("fetch_nonsense", json!({})).await;
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"code": "error", "res": {"title": "", "items": []}})
        );
    }

    #[tokio::test]
    async fn test_adapter_success_is_wrapped_unchanged() {
        let r = registry(StubFetcher::with_body(FEED));
        let envelope = r
            .resolve("fetch_rss", json!({"url": "https://example.com/feed"}))
            .await;
        assert_eq!(envelope.code, EnvelopeCode::Ok);
        assert_eq!(envelope.res.title, "T");
        assert_eq!(envelope.res.items.len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_404_collapses_to_error_envelope() {
        let r = registry(StubFetcher::with_failure(404, "https://example.com/feed"));
        let envelope = r
            .resolve("fetch_rss", json!({"url": "https://example.com/feed"}))
            .await;
        assert_eq!(envelope, Envelope::error());
    }

    #[tokio::test]
    async fn test_missing_required_argument_collapses_to_error_envelope() {
        let r = registry(StubFetcher::new(vec![]));
        let envelope = r.resolve("fetch_rss", json!({})).await;
        assert_eq!(envelope, Envelope::error());
    }

    #[tokio::test]
    async fn test_missing_twitch_credentials_collapse_to_error_envelope() {
        let r = registry(StubFetcher::new(vec![]));
        let envelope = r.resolve("fetch_top_twitch_streams", json!({})).await;
        assert_eq!(envelope, Envelope::error());
    }

    #[tokio::test]
    async fn test_repeated_resolution_is_idempotent() {
        let stub = StubFetcher::new(vec![
            FetchOutcome::Body(FEED.into()),
            FetchOutcome::Body(FEED.into()),
        ]);
        let r = registry(stub);
        let args = json!({"url": "https://example.com/feed"});
        let first = r.resolve("fetch_rss", args.clone()).await;
        let second = r.resolve("fetch_rss", args).await;
        assert_eq!(first, second);
    }
}
