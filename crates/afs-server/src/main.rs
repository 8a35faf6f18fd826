mod api;
mod middleware;

use std::sync::Arc;

use afs_moderation::{Classifiers, ModerationConfig, ModerationPipeline};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = afs_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = afs_db::PoolConfig::from_app_config(&config);
    let pool = afs_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = afs_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let classifiers = Classifiers::from_app_config(&config)?;
    let store = Arc::new(afs_db::PgStore::new(pool.clone()));
    let pipeline = ModerationPipeline::new(
        classifiers,
        store.clone(),
        store,
        ModerationConfig::from_app_config(&config),
    );

    let app = build_app(
        AppState {
            pool,
            pipeline: Arc::new(pipeline),
        },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "afs-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
