use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::Result;
use crate::fetcher::{Fetcher, HttpClient};
use crate::router::Registry;
use crate::twitch::TwitchClient;

pub struct AppContext {
    pub registry: Registry,
    pub config_path: PathBuf,
}

impl AppContext {
    pub fn new(config_path: PathBuf, ca_bundle: Option<&Path>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpClient::with_extra_roots(ca_bundle)?);
        let twitch = Arc::new(TwitchClient::from_env(fetcher.clone()));
        Ok(Self {
            registry: Registry::new(fetcher, twitch),
            config_path,
        })
    }
}
