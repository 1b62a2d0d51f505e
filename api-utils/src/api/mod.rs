pub mod extractors;
pub mod middleware;
pub mod server;
pub mod types;

pub use extractors::{ValidatedJson, ValidatedQuery};
pub use middleware::{MachineKey, machine_protected, not_found};
pub use server::{finalize_router, serve_until, start_server, start_server_with_graceful_shutdown};
pub use types::{ApiError, codes, error_response, handle_error};
