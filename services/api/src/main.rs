use anyhow::Context as _;
use sea_orm::{ConnectOptions, Database};
use tracing::{info, warn};

use painel_api::config::ApiConfig;
use painel_api::infra::oauth::HttpOAuthVerifier;
use painel_api::router::{build_router, cors_layer};
use painel_api::state::AppState;
use painel_api::usecase::setup::EnsureDefaultAdminUseCase;
use painel_api_migration::{Migrator, MigratorTrait};
use painel_auth_types::identity::JwtSecret;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    painel_core::tracing::init_tracing();

    let config = ApiConfig::from_env();
    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set; using the development default");
    }

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("connect to database")?;

    Migrator::up(&db, None).await.context("run migrations")?;
    info!("migrations applied");

    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(config.jwt_secret.as_str()),
        oauth: HttpOAuthVerifier::new()?,
    };

    let seeded = EnsureDefaultAdminUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
    }
    .execute(&config.admin_email, &config.admin_password)
    .await
    .context("ensure default admin")?;
    if seeded {
        info!(email = %config.admin_email, "default admin created");
    }

    let router = build_router(state).layer(cors_layer(&config.frontend_url)?);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("painel api listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
