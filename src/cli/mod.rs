use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "estuary")]
#[command(about = "Aggregation server: many sources, one title+link list", long_about = None)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 5004)]
    pub port: u16,

    /// Request-definition YAML file served by /status
    #[arg(long, default_value = "data/config.yaml")]
    pub config: PathBuf,

    /// Extra PEM trust anchors for the outbound HTTP client
    #[arg(long)]
    pub ca_bundle: Option<PathBuf>,

    /// Don't open the dashboard in a browser on startup
    #[arg(long)]
    pub no_browser: bool,
}
