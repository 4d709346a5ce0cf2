use library_api::config::Config;
use library_api::database::{SqliteRepository, establish_pool};
use library_api::http::{AppState, HttpServer, HttpServerConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = establish_pool(config.database_url()).await?;
    tracing::info!("database ready at {}", config.database_url());

    let state = AppState::new(SqliteRepository::new(pool));
    let server_config = HttpServerConfig::new(config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
