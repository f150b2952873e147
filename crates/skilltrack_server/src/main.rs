//! skilltrack HTTP server binary.

mod config;

use config::ServerConfig;
use log::{error, info};
use skilltrack_core::{init_logging, DbPool};
use skilltrack_http::{build_router, AppState};
use std::process::ExitCode;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("skilltrack: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("skilltrack: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pool = DbPool::open(&config.db_path, config.db_pool_size)?;
    info!(
        "event=store_ready module=server status=ok path={} pool_size={}",
        config.db_path.display(),
        pool.size()
    );

    let app = build_router(AppState::new(pool));
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        "event=server_listen module=server status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_exit module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
