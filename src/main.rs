use std::sync::Arc;

use curatarr::config::Config;
use curatarr::services::providers::openai::OpenAiRecommender;
use curatarr::services::providers::plex::PlexCatalog;
use curatarr::services::runner::Curator;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(PlexCatalog::new(
        config.plex_url.clone(),
        config.plex_token.clone(),
    ));
    let recommender = Arc::new(OpenAiRecommender::new(
        config.openai_api_url.clone(),
        config.openai_key.clone(),
        config.openai_model.clone(),
    ));

    Curator::new(catalog, recommender, config).run().await?;
    Ok(())
}
