pub mod config;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memories_server=debug,memories_api=debug,memories_db=info,memories_media=debug,tower_http=debug".into()),
        )
        .init();
}
