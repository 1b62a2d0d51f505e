pub mod config;
pub mod constants;
pub mod logging;
pub mod shutdown;

pub use config::{
    ConfigError, ConnectionTarget, PostgresConfig, ServerConfig, ValkeyConfig, connection_url,
    connection_url_from_env, load_dotenv, machine_key_from_env, machine_key_from_lookup,
};
pub use logging::init_logging;
pub use shutdown::ShutdownService;
