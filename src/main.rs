use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ratings_api::{
    api::{create_router, AppState},
    config::Config,
    db::{self, PgRatingStore, RatingStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ratings_api=debug,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    // Connect to PostgreSQL and bring the schema up to date
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;
    let store: Arc<dyn RatingStore> = Arc::new(PgRatingStore::new(pool));

    tracing::info!(
        store = store.name(),
        critic_email = %config.critic_email,
        "Rating store ready"
    );

    // Create the router with all routes
    let state = AppState::new(store, config.critic_email.clone());
    let app = create_router(state);

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
