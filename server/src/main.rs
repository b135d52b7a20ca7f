use mario_service::config::Config;
use mario_service::db::{create_pool, run_migrations, users};
use mario_service::http::{cors_layer, create_router, AppState};
use mario_service::utils::mask_email;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("✅ .env loaded from: {:?}", path),
        Err(e) => eprintln!("⚠️  .env not found: {}", e),
    }

    // Logging setup
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mario_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Mario Service server starting...");

    let config = Arc::new(Config::from_env()?);
    tracing::info!("✅ Config loaded");
    tracing::info!("   HTTP Addr: {}", config.http_addr);
    tracing::info!("   CORS origins: {:?}", config.cors_origins);

    tracing::info!("📊 Connecting to database: {}", config.database_url);
    let db_pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&db_pool).await?;
    tracing::info!("✅ Database ready, migrations applied");

    match users::ensure_admin(&db_pool, &config.admin_email, &config.admin_password).await? {
        Some(admin) => tracing::info!("👤 Admin user created: {}", mask_email(&admin.email)),
        None => tracing::info!("👤 Admin user already present"),
    }

    let state = AppState::new(config.clone(), db_pool);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("🌐 Listening on http://{}", config.http_addr);
    tracing::info!("📋 Endpoints:");
    tracing::info!("   GET    /health");
    tracing::info!("   POST   /api/auth/login");
    tracing::info!("   POST   /api/quotes");
    tracing::info!("   POST   /api/forms/submit");
    tracing::info!("   GET    /api/quotes            (admin)");
    tracing::info!("   GET    /api/quotes/stats      (admin)");
    tracing::info!("   GET    /api/quotes/:id        (admin)");
    tracing::info!("   PATCH  /api/quotes/:id/status (admin)");
    tracing::info!("   DELETE /api/quotes/:id        (admin)");
    tracing::info!("   POST   /api/quotes/bulk-delete (admin)");
    tracing::info!("   PATCH  /api/quotes/bulk-status (admin)");
    tracing::info!("   GET    /api/forms/submissions (admin)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
