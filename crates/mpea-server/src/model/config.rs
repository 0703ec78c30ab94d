//! Configuration management for the CMS server
//!
//! Sources, lowest precedence first: `conf/application.yml` (or `--config`),
//! `mpea.*` environment variables, then command line overrides.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use mpea_auth::model::{
    DEFAULT_TOKEN_EXPIRE_SECONDS, DEFAULT_TOKEN_SECRET_KEY, TOKEN_EXPIRE_SECONDS, TOKEN_SECRET_KEY,
};
use mpea_common::DEFAULT_LOCALES;
use mpea_persistence::StorageMode;

use super::constants::{
    AUTH_MAX_ATTEMPTS, CONTACT_RATE_LIMIT_INTERVAL, CONTACT_RATE_LIMIT_MAX_ENTRIES, DB_MIGRATE,
    DB_URL, DEFAULT_AUTH_MAX_ATTEMPTS, DEFAULT_CONFIG_FILE, DEFAULT_CONTACT_INTERVAL_SECONDS,
    DEFAULT_CONTACT_MAX_ENTRIES, DEFAULT_DB_URL, DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT,
    I18N_LOCALES, LOGS_CONSOLE, LOGS_FILE, LOGS_LEVEL, LOGS_PATH, PERSISTENCE_MODE,
    SERVER_ADDRESS, SERVER_PORT,
};
use crate::startup::LoggingConfig;

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "mpea-server", version, about = "MPEA bilingual CMS backend")]
pub struct Cli {
    /// Configuration file, defaults to conf/application.yml
    #[arg(short = 'c', long = "config", env = "MPEA_CONFIG")]
    pub config: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,
    /// Storage backend: external_db or memory
    #[arg(short = 's', long = "storage")]
    pub storage: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create an admin account and exit
    CreateAdmin {
        #[arg(short = 'u', long)]
        username: String,
        #[arg(short = 'p', long)]
        password: String,
    },
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Build the configuration from `cli` and the layered sources.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let file = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let mut builder = Config::builder()
            .add_source(config::File::with_name(file).required(cli.config.is_some()))
            .add_source(
                Environment::with_prefix("mpea")
                    .keep_prefix(true)
                    .separator(".")
                    .try_parsing(true),
            );

        if let Some(v) = cli.port {
            builder = builder.set_override(SERVER_PORT, i64::from(v))?;
        }
        if let Some(v) = &cli.database_url {
            builder = builder.set_override(DB_URL, v.as_str())?;
        }
        if let Some(v) = &cli.storage {
            builder = builder.set_override(PERSISTENCE_MODE, v.as_str())?;
        }

        Ok(Configuration {
            config: builder.build()?,
        })
    }

    /// Configuration with `overrides` applied on top of the defaults only.
    ///
    /// Used by tests and embedders that bypass files and the environment.
    pub fn with_overrides(overrides: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        Ok(Configuration {
            config: builder.build()?,
        })
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn persistence_mode(&self) -> StorageMode {
        self.config
            .get_string(PERSISTENCE_MODE)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(StorageMode::ExternalDb)
    }

    pub fn database_url(&self) -> String {
        self.config
            .get_string(DB_URL)
            .unwrap_or(DEFAULT_DB_URL.to_string())
    }

    pub fn db_migrate(&self) -> bool {
        self.config.get_bool(DB_MIGRATE).unwrap_or(true)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self
            .config
            .get_int("db.pool.config.maximumPoolSize")
            .unwrap_or(100) as u32;
        let min_connections = self
            .config
            .get_int("db.pool.config.minimumPoolSize")
            .unwrap_or(1) as u32;
        let connect_timeout = self
            .config
            .get_int("db.pool.config.connectionTimeout")
            .unwrap_or(30) as u64;
        let acquire_timeout = self
            .config
            .get_int("db.pool.config.initializationFailTimeout")
            .unwrap_or(8) as u64;
        let idle_timeout = self
            .config
            .get_int("db.pool.config.idleTimeout")
            .unwrap_or(10) as u64;
        let max_lifetime = self
            .config
            .get_int("db.pool.config.maxLifetime")
            .unwrap_or(1800) as u64;
        let sqlx_logging = self
            .config
            .get_bool("db.pool.config.sqlxLogging")
            .unwrap_or(false);

        let mut opt = ConnectOptions::new(self.database_url());

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            "Connecting to database"
        );

        Ok(Database::connect(opt).await?)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub fn token_secret_key(&self) -> String {
        self.config
            .get_string(TOKEN_SECRET_KEY)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_TOKEN_SECRET_KEY.to_string())
    }

    pub fn token_expire_seconds(&self) -> i64 {
        self.config
            .get_int(TOKEN_EXPIRE_SECONDS)
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_SECONDS)
    }

    pub fn auth_max_attempts(&self) -> u32 {
        self.config
            .get_int(AUTH_MAX_ATTEMPTS)
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_AUTH_MAX_ATTEMPTS)
    }

    // ========================================================================
    // I18n and public contact form
    // ========================================================================

    /// Allowed locales, lower-cased, in configured order.
    pub fn i18n_locales(&self) -> Vec<String> {
        let configured = self
            .config
            .get_string(I18N_LOCALES)
            .unwrap_or_default()
            .split(',')
            .map(|item| item.trim().to_lowercase())
            .filter(|item| !item.is_empty())
            .collect::<Vec<String>>();

        if configured.is_empty() {
            DEFAULT_LOCALES.iter().map(|s| s.to_string()).collect()
        } else {
            configured
        }
    }

    pub fn contact_rate_limit_interval(&self) -> Duration {
        let seconds = self
            .config
            .get_int(CONTACT_RATE_LIMIT_INTERVAL)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_CONTACT_INTERVAL_SECONDS);
        Duration::from_secs(seconds)
    }

    pub fn contact_rate_limit_max_entries(&self) -> usize {
        self.config
            .get_int(CONTACT_RATE_LIMIT_MAX_ENTRIES)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_CONTACT_MAX_ENTRIES)
    }

    // ========================================================================
    // Logging
    // ========================================================================

    /// Logging settings; explicit `mpea.logs.*` keys win over `MPEA_LOG_*`.
    pub fn logging_config(&self) -> LoggingConfig {
        let mut logging = LoggingConfig::from_env();

        if let Some(dir) = self
            .config
            .get_string(LOGS_PATH)
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            logging.log_dir = PathBuf::from(dir);
        }
        if let Ok(console) = self.config.get_bool(LOGS_CONSOLE) {
            logging.console_output = console;
        }
        if let Ok(file) = self.config.get_bool(LOGS_FILE) {
            logging.file_logging = file;
        }
        let level = self
            .config
            .get_string(LOGS_LEVEL)
            .ok()
            .and_then(|v| v.trim().parse::<tracing::Level>().ok());

        match level {
            Some(level) => logging.with_level(level),
            None => logging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let configuration = Configuration::default();
        assert_eq!(configuration.server_address(), "0.0.0.0");
        assert_eq!(configuration.server_port(), 3000);
        assert_eq!(configuration.persistence_mode(), StorageMode::ExternalDb);
        assert_eq!(
            configuration.database_url(),
            "mysql://root@localhost:3306/mpea_cms"
        );
        assert!(configuration.db_migrate());
        assert_eq!(configuration.token_expire_seconds(), 604_800);
        assert_eq!(configuration.i18n_locales(), vec!["zh", "en"]);
        assert_eq!(
            configuration.contact_rate_limit_interval(),
            Duration::from_secs(30)
        );
        assert_eq!(configuration.contact_rate_limit_max_entries(), 10_000);
        assert_eq!(configuration.auth_max_attempts(), 5);
    }

    #[test]
    fn test_overrides() {
        let configuration = Configuration::with_overrides(&[
            (SERVER_PORT, "8080"),
            (PERSISTENCE_MODE, "memory"),
            (I18N_LOCALES, " EN , zh-TW ,,"),
            (TOKEN_SECRET_KEY, "s3cret"),
        ])
        .unwrap();

        assert_eq!(configuration.server_port(), 8080);
        assert_eq!(configuration.persistence_mode(), StorageMode::Memory);
        assert_eq!(configuration.i18n_locales(), vec!["en", "zh-tw"]);
        assert_eq!(configuration.token_secret_key(), "s3cret");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let configuration = Configuration::with_overrides(&[
            (SERVER_PORT, "99999"),
            (PERSISTENCE_MODE, "rocks"),
            (TOKEN_SECRET_KEY, ""),
        ])
        .unwrap();

        assert_eq!(configuration.server_port(), 3000);
        assert_eq!(configuration.persistence_mode(), StorageMode::ExternalDb);
        assert_eq!(configuration.token_secret_key(), DEFAULT_TOKEN_SECRET_KEY);
    }

    #[test]
    fn test_cli_parses_create_admin() {
        let cli = Cli::parse_from([
            "mpea-server",
            "--storage",
            "memory",
            "create-admin",
            "--username",
            "admin",
            "--password",
            "pw",
        ]);
        assert_eq!(cli.storage.as_deref(), Some("memory"));
        assert_eq!(
            cli.command,
            Some(Command::CreateAdmin {
                username: "admin".to_string(),
                password: "pw".to_string(),
            })
        );
    }
}
