use catalog_api::config::Config;
use catalog_api::logging::init_logging;
use catalog_api::server::{create_app, AppState, ROUTES};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging)?;

    tracing::info!("Starting catalog API");

    let app_state = AppState::from_config(&config).await?;
    let app = create_app(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", &addr);
    for (method, path, description) in ROUTES {
        tracing::info!("  {:<6} {:<18} {}", method, path, description);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
