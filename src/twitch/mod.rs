//! Twitch Helix sub-client: client-credentials token exchange plus the
//! dependent lookup chains used by the stream and VOD adapters.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::app::{EstuaryError, Result};
use crate::fetcher::{FetchOutcome, FetchRequest, Fetcher};

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const HELIX_URL: &str = "https://api.twitch.tv/helix";

#[derive(Debug, Clone)]
struct Credentials {
    client_id: String,
    secret: String,
}

/// App access token held process-wide. There is no expiry bookkeeping; the
/// cache is dropped when a Helix call comes back 401 and the next caller
/// re-authenticates.
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    obtained_at: DateTime<Utc>,
}

pub struct TwitchClient {
    fetcher: Arc<dyn Fetcher>,
    credentials: Option<Credentials>,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct DataResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Game {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    pub user_login: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
    pub created_at: String,
}

impl TwitchClient {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        client_id: Option<String>,
        secret: Option<String>,
    ) -> Self {
        let credentials = match (client_id, secret) {
            (Some(client_id), Some(secret)) => Some(Credentials { client_id, secret }),
            _ => None,
        };
        Self {
            fetcher,
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Credentials come from `TWITCH_CLIENT_ID` / `TWITCH_SECRET`. Either
    /// missing leaves the client unauthenticated; dependent adapters then
    /// fail with [`EstuaryError::MissingCredentials`].
    pub fn from_env(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::new(
            fetcher,
            std::env::var("TWITCH_CLIENT_ID").ok(),
            std::env::var("TWITCH_SECRET").ok(),
        )
    }

    async fn token(&self) -> Result<String> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(EstuaryError::MissingCredentials)?;

        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            return Ok(cached.value.clone());
        }

        let url = Url::parse_with_params(
            TOKEN_URL,
            &[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.secret.as_str()),
                ("grant_type", "client_credentials"),
            ],
        )?;
        let body = self
            .fetcher
            .fetch(FetchRequest::post(url.as_str()))
            .await?
            .body()?;
        let parsed: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| EstuaryError::Parse(format!("twitch token response: {e}")))?;

        let cached = CachedToken {
            value: parsed.access_token,
            obtained_at: Utc::now(),
        };
        tracing::debug!("obtained twitch app token at {}", cached.obtained_at);
        let value = cached.value.clone();
        *guard = Some(cached);
        Ok(value)
    }

    async fn api_get(&self, url: &Url) -> Result<Vec<u8>> {
        let token = self.token().await?;
        let client_id = self
            .credentials
            .as_ref()
            .ok_or(EstuaryError::MissingCredentials)?
            .client_id
            .clone();

        let req = FetchRequest::get(url.as_str())
            .header("accept", "application/vnd.twitchtv.v5+json")
            .header("client-id", client_id)
            .header("Authorization", format!("Bearer {token}"));
        let outcome = self.fetcher.fetch(req).await?;

        if let FetchOutcome::Failure { status: 401, .. } = &outcome {
            // Stale token. Drop it so the next caller re-authenticates
            // instead of failing the same way.
            *self.token.lock().await = None;
        }

        outcome.body()
    }

    async fn data<T: for<'de> Deserialize<'de>>(&self, url: &Url, what: &str) -> Result<Vec<T>> {
        let body = self.api_get(url).await?;
        let parsed: DataResponse<T> = serde_json::from_slice(&body)
            .map_err(|e| EstuaryError::Parse(format!("twitch {what} response: {e}")))?;
        Ok(parsed.data)
    }

    pub async fn game_id(&self, game_name: &str) -> Result<String> {
        let url = Url::parse_with_params(&format!("{HELIX_URL}/games"), &[("name", game_name)])?;
        let games: Vec<Game> = self.data(&url, "games").await?;
        games
            .into_iter()
            .next()
            .map(|g| g.id)
            .ok_or_else(|| EstuaryError::Parse(format!("no twitch game named {game_name:?}")))
    }

    pub async fn streams(&self, game_id: &str) -> Result<Vec<Stream>> {
        let url = Url::parse_with_params(
            &format!("{HELIX_URL}/streams"),
            &[
                ("game_id", game_id),
                ("first", "100"),
                ("language", "ru"),
                ("language", "en"),
            ],
        )?;
        self.data(&url, "streams").await
    }

    pub async fn user_id(&self, login: &str) -> Result<String> {
        let url = Url::parse_with_params(&format!("{HELIX_URL}/users"), &[("login", login)])?;
        let users: Vec<User> = self.data(&url, "users").await?;
        users
            .into_iter()
            .next()
            .map(|u| u.id)
            .ok_or_else(|| EstuaryError::Parse(format!("no twitch user {login:?}")))
    }

    pub async fn videos(&self, user_id: &str) -> Result<Vec<Video>> {
        let url = Url::parse_with_params(&format!("{HELIX_URL}/videos"), &[("user_id", user_id)])?;
        self.data(&url, "videos").await
    }
}
