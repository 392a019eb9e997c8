use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Certificate, Client};
use url::Url;

use crate::app::{EstuaryError, Result};
use crate::fetcher::{FetchOutcome, FetchRequest, Fetcher};

/// Several scraped sites reject obvious bot agents, so requests go out with
/// a browser identity.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X x.y; rv:42.0) Gecko/20100101 Firefox/42.0";

/// Timeouts surface as this status, following the Tornado convention the
/// upstream front-end already understands.
const STATUS_TIMEOUT: u16 = 599;

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_extra_roots(None)
    }

    /// Build the shared client, optionally extending the trust store with a
    /// PEM bundle. The bundle is assumed complete at this point; appending
    /// site certificates is a setup-time concern.
    pub fn with_extra_roots(bundle: Option<&Path>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .brotli(true)
            .user_agent(USER_AGENT);

        if let Some(path) = bundle {
            let pem = std::fs::read(path)?;
            for cert in Certificate::from_pem_bundle(&pem)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, req: FetchRequest) -> Result<FetchOutcome> {
        // Relative URLs are a caller bug, not an upstream failure.
        Url::parse(&req.url)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &req.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }

        let response = self
            .client
            .request(req.method.clone(), req.url.as_str())
            .headers(headers)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return Ok(FetchOutcome::Failure {
                    status: STATUS_TIMEOUT,
                    url: req.url,
                })
            }
            Err(e) => return Err(EstuaryError::Http(e)),
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(FetchOutcome::Failure {
                status: status.as_u16(),
                url: req.url,
            });
        }

        let body = response.bytes().await?.to_vec();
        Ok(FetchOutcome::Body(body))
    }
}
