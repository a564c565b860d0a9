use interview_coach::config::AppConfig;
use interview_coach::services::ai::AiService;
use interview_coach::services::uploads::UploadStore;
use interview_coach::services::vapi::VapiClient;
use interview_coach::state::{AppState, SharedState};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            e
        })?;
    tracing::info!("Database migrations completed");

    let uploads = UploadStore::new(&config.upload_dir);
    uploads.ensure_dir().await?;

    tracing::info!(model = %config.ai.model, base = %config.ai.api_base, "AI client configured");
    if config.vapi_web_token.is_none() {
        tracing::warn!("VAPI_WEB_TOKEN not set; /api/vapi/call will fail");
    }

    let shared: SharedState = Arc::new(AppState {
        pool,
        ai: Arc::new(AiService::new(config.ai.clone())),
        session_key: config.session_key.clone(),
        uploads,
        vapi: VapiClient::new(config.vapi_api_base.clone(), config.vapi_web_token.clone()),
    });

    let app = interview_coach::app(shared, &config.cors_origin)?;

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
