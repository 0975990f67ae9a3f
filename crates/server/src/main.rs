use server::config;
use server::db;
use server::repo::Repository;
use server::routes;
use server::service::MatchService;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    let repo = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = db::pool::create_pool(url).await?;

            tracing::info!("Running migrations...");
            db::pool::run_migrations(&pool).await?;
            Repository::Postgres(pool)
        }
        None => {
            tracing::info!(
                users = config.memory_users.len(),
                "DATABASE_URL not set - keeping matches in memory"
            );
            Repository::in_memory(config.memory_users.iter().copied())
        }
    };

    tracing::info!(depth = config.ai_search_depth, "Computer search depth");
    let service = MatchService::new(repo, config.ai_search_depth);
    let app = routes::router(service, config.clone());

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
