// =============================================================================
// Logging
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "API_LOG";

/// Set to `json` for JSON log lines
pub const ENV_LOG_FORMAT: &str = "API_LOG_FORMAT";

/// Filter used when neither `API_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "info";

// =============================================================================
// Environment Variables - Server
// =============================================================================

pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";

/// Seconds a request may take before the server answers 408
pub const ENV_SERVER_READ_TIMEOUT: &str = "SERVER_READ_TIMEOUT";

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_SERVER_READ_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Environment Variables - PostgreSQL
// =============================================================================

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_SSL_MODE: &str = "DB_SSL_MODE";
pub const ENV_DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
pub const ENV_DB_MAX_IDLE_CONNECTIONS: &str = "DB_MAX_IDLE_CONNECTIONS";

/// Connection lifetime in seconds
pub const ENV_DB_MAX_LIFETIME_CONNECTIONS: &str = "DB_MAX_LIFETIME_CONNECTIONS";

pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_SSL_MODE: &str = "disable";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 2;

/// Recycle connections after 30 minutes by default
pub const DEFAULT_DB_MAX_LIFETIME_SECS: u64 = 1800;

/// Timeout for acquiring a connection from the pool
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Environment Variables - Valkey
// =============================================================================

pub const ENV_VALKEY_HOST: &str = "VALKEY_HOST";
pub const ENV_VALKEY_PORT: &str = "VALKEY_PORT";
pub const ENV_VALKEY_DB_NUMBER: &str = "VALKEY_DB_NUMBER";
pub const ENV_VALKEY_CLIENT_NAME: &str = "VALKEY_CLIENT_NAME";
pub const ENV_VALKEY_USERNAME: &str = "VALKEY_USERNAME";
pub const ENV_VALKEY_PASSWORD: &str = "VALKEY_PASSWORD";

pub const DEFAULT_VALKEY_PORT: u16 = 6379;

// =============================================================================
// Machine Auth
// =============================================================================

/// Shared secret expected in the machine key header
pub const ENV_MACHINE_KEY: &str = "MACHINE_KEY";

/// Header carrying the machine key
pub const MACHINE_KEY_HEADER: &str = "x-machine-key";

// =============================================================================
// Shutdown
// =============================================================================

/// Time allowed for in-flight requests after a shutdown signal
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
