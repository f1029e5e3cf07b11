pub mod employer;
pub mod job;
pub mod skill;

use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

/// Field name → messages, as rendered next to each form input.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Rejects empty and whitespace-only values.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Flattens `validator` output into per-field messages, falling back to the
/// error code when a rule has no message.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
