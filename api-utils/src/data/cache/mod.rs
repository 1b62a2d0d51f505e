pub mod error;
pub mod valkey;

pub use error::CacheError;
pub use valkey::ValkeyCache;
