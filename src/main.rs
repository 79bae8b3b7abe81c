use anyhow::Result;
use tracing_subscriber::EnvFilter;
use wardrobe_advisor::config::Config;
use wardrobe_advisor::http::{HttpState, start_http_server};
use wardrobe_advisor::service::WardrobeService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.runtime.log_level)
                .unwrap_or_else(|_| EnvFilter::new("wardrobe_advisor=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting wardrobe-advisor server");

    let service = WardrobeService::from_config(&config)?;
    start_http_server(HttpState::new(service), config.server.bind).await
}
