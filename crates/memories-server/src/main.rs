use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use memories_api::auth::{AppState, AppStateInner};
use memories_api::urls::UrlResolver;
use memories_db::Database;
use memories_media::MediaStore;
use memories_server::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    memories_server::init_logging();

    let config = Config::from_env()?;

    let db = Database::open(&config.db_path)?;
    if config.seed_demo {
        memories_db::bootstrap::seed_demo_user(&db)?;
    }

    let media = MediaStore::new(config.upload_dir.clone())?;
    let urls = UrlResolver::new(&config.base_url);
    info!("Media URLs resolve against {}", urls.base_url());

    let state: AppState = Arc::new(AppStateInner {
        db,
        media,
        urls,
        max_upload_bytes: config.max_upload_bytes,
    });

    let app = memories_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Memories server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate());
        match sigterm {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
