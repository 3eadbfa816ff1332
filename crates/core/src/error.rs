use std::collections::BTreeMap;

use validator::{ValidationErrors, ValidationErrorsKind};

use crate::types::DbId;

/// Field path -> human-readable messages, ordered by path for stable output.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(FieldErrors),

    #[error("Asset storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        collect_field_errors(&errors, None, &mut fields);
        CoreError::InvalidFields(fields)
    }
}

/// Flatten nested `validator` errors into dotted paths (`actors[1].character`).
fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(path).or_default();
                for error in list {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => error.code.to_string(),
                    };
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_field_errors(nested, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::ValidationError;

    use super::*;

    #[test]
    fn field_errors_prefer_message_over_code() {
        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("length"));
        errors.add(
            "name",
            ValidationError::new("first_letter_uppercase")
                .with_message("must start with an uppercase letter".into()),
        );

        let err = CoreError::from(errors);
        assert_matches!(err, CoreError::InvalidFields(fields) => {
            assert_eq!(
                fields["name"],
                vec!["length".to_string(), "must start with an uppercase letter".to_string()]
            );
        });
    }

    #[test]
    fn nested_list_errors_use_indexed_paths() {
        let mut inner = ValidationErrors::new();
        inner.add("character", ValidationError::new("length"));

        let mut items = BTreeMap::new();
        items.insert(1usize, Box::new(inner));

        let mut errors = ValidationErrors::new();
        errors
            .errors_mut()
            .insert("actors".into(), ValidationErrorsKind::List(items));

        let err = CoreError::from(errors);
        assert_matches!(err, CoreError::InvalidFields(fields) => {
            assert!(fields.contains_key("actors[1].character"));
        });
    }
}
