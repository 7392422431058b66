use anyhow::Context;
use poolscope::{
    api, config::Config, db::init_db, EventSource, Indexer, JsonlEventSource, Repository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let pool = init_db(&config.database_path)
        .await
        .with_context(|| format!("opening database at {}", config.database_path))?;
    let repo = Arc::new(Repository::new(pool));

    match &config.events_file {
        Some(path) => {
            let source: Arc<dyn EventSource> = Arc::new(JsonlEventSource::new(path));
            let indexer = Indexer::new(source, repo.clone(), &config.factory_addresses)
                .with_replay_guard(config.skip_duplicate_events);
            let poll_interval = Duration::from_millis(config.poll_interval_ms);

            tracing::info!(
                events_file = %path,
                factories = config.factory_addresses.len(),
                replay_guard = config.skip_duplicate_events,
                "Starting indexer"
            );
            tokio::spawn(indexer.run(poll_interval));
        }
        None => tracing::warn!("EVENTS_FILE not set; serving queries without indexing"),
    }

    let app = api::create_router(api::AppState::new(repo));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
