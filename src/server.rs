use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::api::router;
use crate::config::ServerConfig;
use crate::db;
use crate::error::AppError;
use crate::state::AppState;

/// Connects the database, runs migrations and loads fixtures if configured.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, AppError> {
    let pool = db::connect(&config.database_url).await?;

    if let Some(path) = &config.seed_path {
        let count = db::seed_from_file(&pool, path).await?;
        info!("loaded {} fixture records from {}", count, path.display());
    }

    Ok(AppState { db: pool })
}

/// Serves the mock backend in the background and returns the bound address.
pub async fn spawn(state: AppState, addr: SocketAddr) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let app = router(state);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("mock backend stopped: {}", e);
        }
    });

    info!("listening on http://{}", local_addr);
    Ok((local_addr, handle))
}
