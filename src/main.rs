use std::net::SocketAddr;

use anyhow::Result;
use tracing::info;

use billing_maintenance::{router, startup, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    startup::init_tracing(&config);
    info!("Loaded configuration for environment: {}", config.environment);

    let app_state = startup::initialize_app(&config).await?;
    let app = router::build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting maintenance server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await?;

    Ok(())
}
