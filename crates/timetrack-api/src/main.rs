use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use timetrack_api::{create_router, ApiState, Cli, Environment, Settings};
use timetrack_db::Database;
use timetrack_info::HttpUserInfoClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    init_tracing(settings.env);

    tracing::info!(
        env = ?settings.env,
        version = env!("CARGO_PKG_VERSION"),
        "Starting timetrack-api"
    );

    // Initialize database
    let db = Database::connect(&settings.database.url, settings.database.options()).await?;
    if cli.no_migrate {
        tracing::info!("Skipping schema bootstrap");
    } else {
        db.init_schema().await?;
    }

    // Passport lookup service
    let info = Arc::new(HttpUserInfoClient::new(
        &settings.info_service.base_url,
        settings.info_service.timeout(),
    )?);

    // Statements still running after the shutdown grace period are cancelled
    let shutdown = CancellationToken::new();
    let state = ApiState::new(db.with_cancellation(shutdown.child_token()), info);

    // Build router
    let app = create_router(state, &settings.http);

    let listener = tokio::net::TcpListener::bind(&settings.http.address).await?;
    tracing::info!(address = %settings.http.address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown, settings.http.shutdown_timeout()))
        .await?;

    db.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env.default_log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Environment::Local => registry.with(fmt::layer().pretty()).init(),
        Environment::Dev | Environment::Prod => registry.with(fmt::layer().json()).init(),
    }
}

async fn shutdown_signal(token: CancellationToken, grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(grace = ?grace, "Stopping server");

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!("Shutdown grace period elapsed, cancelling in-flight statements");
        token.cancel();
    });
}
