mod api;
mod middleware;

use std::sync::Arc;

use promocheck_scraper::{ChromiumRenderer, Harness, RunSettings, ScreenshotStore};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, StaticDirs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = promocheck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = Arc::new(promocheck_core::load_catalog(&config.catalog_path)?);
    tracing::info!(
        path = %config.catalog_path.display(),
        labels = catalog.discount_labels.len(),
        excluded_headings = catalog.excluded_headings.len(),
        "catalog loaded"
    );

    let harness = Harness::new(
        Arc::new(ChromiumRenderer::from_config(&config)),
        catalog,
        ScreenshotStore::new(&config.screenshots_dir),
        RunSettings::from_config(&config),
    );
    tokio::fs::create_dir_all(&config.screenshots_dir).await?;

    let app = build_app(
        AppState {
            harness: Arc::new(harness),
        },
        &StaticDirs {
            screenshots: config.screenshots_dir.clone(),
            frontend: config.frontend_dir.clone(),
        },
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "promocheck server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
