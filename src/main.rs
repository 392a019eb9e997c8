use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use estuary::app::AppContext;
use estuary::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config.clone(), cli.ca_bundle.as_deref())?;

    if !cli.no_browser {
        let url = format!("http://localhost:{}/", cli.port);
        if let Err(e) = open::that_detached(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    estuary::server::serve(cli.port, Arc::new(ctx)).await
}
