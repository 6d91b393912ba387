use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use blog_summarizer::{
    archive::{BlogArchive, MemoryBlogArchive},
    config::Config,
    api::routes::create_router,
    db::{self, PgBlogArchive, PgHistoryStore},
    history::{HistoryStore, MemoryHistoryStore},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_addr = config.server_addr;
    info!(model = %config.gemini_model, "Configuration loaded");

    // Pick the persistence backend
    let (history, archive): (Arc<dyn HistoryStore>, Arc<dyn BlogArchive>) = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let pool = db::connect(url, config.database_max_connections).await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations complete");
            let history: Arc<dyn HistoryStore> = Arc::new(PgHistoryStore::new(pool.clone()));
            let archive: Arc<dyn BlogArchive> = Arc::new(PgBlogArchive::new(pool));
            (history, archive)
        }
        None => {
            warn!("DATABASE_URL not set; history is kept in memory and lost on restart");
            let history: Arc<dyn HistoryStore> = Arc::new(MemoryHistoryStore::new());
            let archive: Arc<dyn BlogArchive> = Arc::new(MemoryBlogArchive::new());
            (history, archive)
        }
    };

    let app_state = AppState::new(config, history, archive)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
