use crate::error::{Result, ValidationErrors};
use crate::models::{Field, FieldKind, Record, Value};
use crate::services::slug::validate_slug_input;

pub const DENYLIST: [char; 5] = ['<', '>', ';', '\\', '/'];
pub const DENYLIST_MESSAGE: &str = "Input can not contain < > ; \\ or /";

/// Fields never checked against the denylist.
pub const IGNORED_FIELDS: [&str; 2] = ["id", "slug"];

pub fn sanitize_string(value: &str) -> bool {
    !value.contains(&DENYLIST[..])
}

/// Type, blank, null and length checks for every field not in `exclude`.
pub fn validate_structure<R: Record>(record: &R, exclude: &[&str]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in R::FIELDS {
        if exclude.contains(&field.name) {
            continue;
        }
        check_field(field, &record.value(field.name), &mut errors);
    }
    errors
}

/// Structural validation plus the denylist check on text fields. All
/// failures come back together as one `Error::Validation`.
pub fn clean_fields<R: Record>(record: &R, exclude: &[&str]) -> Result<()> {
    let mut errors = validate_structure(record, exclude);

    for field in R::FIELDS {
        if exclude.contains(&field.name)
            || IGNORED_FIELDS.contains(&field.name)
            || !field.kind.is_text()
        {
            continue;
        }

        if let Value::Text(raw) = record.value(field.name) {
            if !sanitize_string(&raw) {
                errors.add(field.name, DENYLIST_MESSAGE);
            }
        }
    }

    if !errors.is_empty() {
        tracing::debug!(table = R::TABLE, fields = %errors, "Field validation failed");
    }
    errors.into_result()
}

fn check_field(field: &Field, value: &Value, errors: &mut ValidationErrors) {
    let text = match value {
        Value::Null => {
            if !field.null {
                errors.add(field.name, "This field cannot be null.");
            }
            return;
        }
        Value::Integer(i) => i.to_string(),
        Value::Text(s) => s.clone(),
    };

    if text.is_empty() {
        if !field.blank {
            errors.add(field.name, "This field cannot be blank.");
        }
        return;
    }

    match field.kind {
        FieldKind::Integer => {
            if text.trim().parse::<i64>().is_err() {
                errors.add(field.name, format!("'{}' value must be an integer.", text));
            }
        }
        FieldKind::Char { max_length } => check_length(field, &text, max_length, errors),
        FieldKind::Slug { max_length } => {
            check_length(field, &text, max_length, errors);
            if text.chars().count() <= max_length && !validate_slug_input(&text, max_length) {
                errors.add(
                    field.name,
                    "Enter a valid 'slug' consisting of letters, numbers, underscores or hyphens.",
                );
            }
        }
        FieldKind::Text => {}
    }
}

fn check_length(field: &Field, text: &str, max_length: usize, errors: &mut ValidationErrors) {
    let length = text.chars().count();
    if length > max_length {
        errors.add(
            field.name,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max_length, length
            ),
        );
    }
}
