use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use folio::auth::AuthContext;
use folio::config::AppConfig;
use folio::db::code_files::MongoCodeFileRepository;
use folio::db::hero_slides::MongoHeroSlideRepository;
use folio::db::projects::MongoProjectRepository;
use folio::router::build_router;
use folio::state::AppState;
use folio::storage::client::S3StorageClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();

    tracing::info!("Starting portfolio API server...");

    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let db = mongo_client.database(&config.mongodb_database);
    tracing::info!("Connected to MongoDB database '{}'", config.mongodb_database);

    let storage = S3StorageClient::from_env(config.s3_bucket.clone(), config.s3_endpoint.as_deref())
        .await
        .context("Failed to initialize S3 client")?;
    tracing::info!("S3 storage client initialized (bucket '{}')", config.s3_bucket);

    let state = AppState {
        code_files: Arc::new(MongoCodeFileRepository::new(&db)),
        projects: Arc::new(MongoProjectRepository::new(&db)),
        hero_slides: Arc::new(MongoHeroSlideRepository::new(&db)),
        storage: Arc::new(storage),
        auth: AuthContext::from_config(&config),
        environment: config.environment.clone(),
        started_at: Instant::now(),
    };

    let app = build_router(state, config.allowed_origins.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
