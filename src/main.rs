use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use portfolio_projects::{
    AppState,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    repositories::sqlx_repo::SqlxProjectRepo,
    routes::configure_routes,
    settings::AppConfig,
    storage::file_store::LocalFileStore,
    upload_limit,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }
}

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();

    if origins.iter().any(|o| o == "*") {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => {
            init_tracing(cfg.is_production());
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let file_store = LocalFileStore::new(config.upload_dir.clone());
    if let Err(e) = file_store.ensure_ready().await {
        tracing::error!("Upload directory {} is not writable: {}", config.upload_dir.display(), e);
        std::process::exit(1);
    }

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app_state = web::Data::new(AppState::new(&config, pool.clone()));
    let limit = upload_limit(&config);
    let server_addr = config.server_addr();

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let cors_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(limit)
            .wrap(build_cors(&cors_config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes::<SqlxProjectRepo>)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    let result = tokio::select! {
        res = server => res.context("Server error"),
        _ = shutdown_signal() => Ok(()),
    };

    pool.close().await;
    tracing::info!("Database pool closed.");

    result
}
