//! Main entry point for the MPEA CMS server.
//!
//! Loads the configuration, opens the selected store, then serves the admin
//! and public APIs until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use mpea_migration::{Migrator, MigratorTrait};
use mpea_persistence::{
    ExternalDbPersistService, MemoryPersistService, PersistenceService, StorageMode,
};
use mpea_server::{
    middleware::rate_limit,
    model::{
        app_state::AppState,
        config::{Cli, Command, Configuration},
    },
    startup,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

async fn open_persistence(
    configuration: &Configuration,
) -> anyhow::Result<Arc<dyn PersistenceService>> {
    let storage_mode = configuration.persistence_mode();
    info!("Persistence mode: {}", storage_mode);

    let persistence: Arc<dyn PersistenceService> = match storage_mode {
        StorageMode::ExternalDb => {
            let db = configuration.database_connection().await?;
            if configuration.db_migrate() {
                Migrator::up(&db, None).await?;
                info!("Database migrations applied");
            }
            Arc::new(ExternalDbPersistService::new(db))
        }
        StorageMode::Memory => Arc::new(MemoryPersistService::new()),
    };

    Ok(persistence)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let configuration = Configuration::from_cli(&cli)?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let persistence = open_persistence(&configuration).await?;

    if let Some(Command::CreateAdmin { username, password }) = &cli.command {
        let id = mpea_auth::service::admin::create(persistence.as_ref(), username, password).await?;
        info!(id, username = %username, "Admin account created");
        return Ok(());
    }

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();

    let app_state = Arc::new(AppState::new(configuration, persistence));

    // Prune both limiters so idle clients do not accumulate
    let _rate_limit_cleanup_handle = rate_limit::start_cleanup_task(app_state.clone());

    let shutdown_signal = startup::listen_for_os_signals();
    let mut shutdown_rx = shutdown_signal.subscribe();

    info!("Starting MPEA CMS server on {}:{}", server_address, server_port);
    let server = startup::main_server(app_state, server_address, server_port)?;
    let server_handle = server.handle();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
                return Err(e.into());
            }
        }
        Ok(reason) = shutdown_rx.recv() => {
            info!(%reason, "Stopping HTTP server, draining for up to {:?}", SHUTDOWN_GRACE);
            let _ = tokio::time::timeout(SHUTDOWN_GRACE, server_handle.stop(true)).await;
        }
    }

    Ok(())
}
