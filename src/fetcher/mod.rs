pub mod http_client;

pub use http_client::HttpClient;

use async_trait::async_trait;
use reqwest::Method;

use crate::app::{EstuaryError, Result};

/// An outbound request. Adapters construct these; only the Twitch token
/// exchange needs anything beyond a plain GET.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Outcome of a transport call.
///
/// HTTP-level failures (non-2xx, timeouts) are values, never errors, so every
/// adapter decides explicitly what to do with them. Connection-level failures
/// (DNS, refused) propagate as [`EstuaryError::Http`].
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Body(Vec<u8>),
    Failure { status: u16, url: String },
}

impl FetchOutcome {
    /// Unwrap the body, converting an HTTP failure into the upstream error
    /// value adapters report.
    pub fn body(self) -> Result<Vec<u8>> {
        match self {
            Self::Body(body) => Ok(body),
            Self::Failure { status, url } => Err(EstuaryError::Upstream { status, url }),
        }
    }

    /// Body decoded as UTF-8, lossily. Scraped pages occasionally carry
    /// stray bytes; dropping them beats failing the whole adapter.
    pub fn text(self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.body()?).into_owned())
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, req: FetchRequest) -> Result<FetchOutcome>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Queue-backed fetcher for adapter tests: pops one canned outcome per
    /// call and records the requests it saw.
    pub struct StubFetcher {
        outcomes: Mutex<VecDeque<FetchOutcome>>,
        pub requests: Mutex<Vec<FetchRequest>>,
    }

    impl StubFetcher {
        pub fn new(outcomes: Vec<FetchOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_body(body: impl Into<Vec<u8>>) -> Self {
            Self::new(vec![FetchOutcome::Body(body.into())])
        }

        pub fn with_failure(status: u16, url: &str) -> Self {
            Self::new(vec![FetchOutcome::Failure {
                status,
                url: url.to_string(),
            }])
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, req: FetchRequest) -> Result<FetchOutcome> {
            self.requests.lock().unwrap().push(req);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| EstuaryError::Parse("stub exhausted".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_converts_to_upstream_error() {
        let outcome = FetchOutcome::Failure {
            status: 404,
            url: "https://example.com/feed".into(),
        };
        let err = outcome.body().unwrap_err();
        assert_eq!(err.to_string(), "- 404: https://example.com/feed");
    }

    #[test]
    fn test_body_passes_through() {
        let outcome = FetchOutcome::Body(b"hello".to_vec());
        assert_eq!(outcome.body().unwrap(), b"hello");
    }

    #[test]
    fn test_request_builder() {
        let req = FetchRequest::post("https://id.twitch.tv/oauth2/token")
            .header("client-id", "abc");
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.headers, vec![("client-id".to_string(), "abc".to_string())]);
    }
}
