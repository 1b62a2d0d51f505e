pub mod crypto;
pub mod string;
pub mod validation;

pub use crypto::{CryptoError, constant_time_eq, decrypt, encrypt, generate_key};
pub use string::{ConversionError, camel_to_pascal, pascal_to_camel, string_to_uint};
pub use validation::{format_validation_errors, validate_uuid, validation_errors};
