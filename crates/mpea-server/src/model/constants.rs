// Configuration keys and defaults for the CMS server

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

// Server
pub const SERVER_ADDRESS: &str = "server.address";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const SERVER_PORT: &str = "server.port";
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// Persistence
pub const PERSISTENCE_MODE: &str = "mpea.persistence.mode";
pub const DB_URL: &str = "db.url";
pub const DEFAULT_DB_URL: &str = "mysql://root@localhost:3306/mpea_cms";
pub const DB_MIGRATE: &str = "db.migrate";

// I18n
pub const I18N_LOCALES: &str = "mpea.i18n.locales";

// Rate limiting
pub const CONTACT_RATE_LIMIT_INTERVAL: &str = "mpea.contact.rateLimit.intervalSeconds";
pub const DEFAULT_CONTACT_INTERVAL_SECONDS: u64 = 30;
pub const CONTACT_RATE_LIMIT_MAX_ENTRIES: &str = "mpea.contact.rateLimit.maxEntries";
pub const DEFAULT_CONTACT_MAX_ENTRIES: usize = 10_000;
pub const AUTH_MAX_ATTEMPTS: &str = "mpea.auth.rateLimit.maxAttempts";
pub const DEFAULT_AUTH_MAX_ATTEMPTS: u32 = 5;

// Logging
pub const LOGS_PATH: &str = "mpea.logs.path";
pub const LOGS_LEVEL: &str = "mpea.logs.level";
pub const LOGS_CONSOLE: &str = "mpea.logs.console";
pub const LOGS_FILE: &str = "mpea.logs.file";

// Request headers
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const ACCEPT_LANGUAGE: &str = "accept-language";
