//! Helpers for the `validator` crate

use std::collections::BTreeMap;

use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

/// Custom validator: the field must be a UUID (hyphenated, simple, braced
/// or URN form)
///
/// ```ignore
/// #[derive(Validate)]
/// struct OrderPath {
///     #[validate(custom(function = "validate_uuid"))]
///     id: String,
/// }
/// ```
pub fn validate_uuid<T: AsRef<str>>(value: T) -> Result<(), ValidationError> {
    Uuid::parse_str(value.as_ref())
        .map(|_| ())
        .map_err(|_| ValidationError::new("uuid").with_message("must be a valid UUID".into()))
}

/// One message per invalid field (the first failing rule wins)
pub fn validation_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .iter()
        .filter_map(|(field, errs)| {
            errs.first()
                .map(|e| (field.to_string(), error_message(field, e)))
        })
        .collect()
}

/// Every failing rule as one `; `-separated message
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| error_message(&field, e)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn error_message(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{}: validation failed ({})", field, error.code))
}
