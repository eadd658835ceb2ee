use tracing_subscriber::{EnvFilter, fmt};

use auctions::shell::bootstrap::bootstrap;
use auctions::shell::config::Settings;
use auctions::shell::graphql::ENDPOINT;
use auctions::shell::http::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = Settings::from_env()?;
    let application = bootstrap(&settings)?;
    let app = router(application.state);

    let listener = tokio::net::TcpListener::bind(settings.http_addr).await?;
    tracing::info!(
        "Serving auctions on http://{}, GraphQL at {}",
        settings.http_addr,
        ENDPOINT
    );
    axum::serve(listener, app).await?;
    Ok(())
}
