//! Shared helpers for `validator`-based input checks.

use indexmap::IndexSet;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

/// Reject strings that are empty or only whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Declaration order of a type's validated fields, as dotted paths.
///
/// Nested fields are written `parent.child`; struct-level (`schema`) checks
/// appear as `parent.__all__`. Messages are reported in this order.
pub trait FieldOrder {
    const FIELDS: &'static [&'static str];
}

/// Collect every message in a (possibly nested) error tree in field order,
/// keeping only the first occurrence of each message.
pub fn messages(errors: &ValidationErrors, order: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    collect(errors, "", &mut found);
    found.sort_by(|(a, _), (b, _)| (rank(order, a), a).cmp(&(rank(order, b), b)));
    found
        .into_iter()
        .map(|(_, message)| message)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Position of `path` in `order`, falling back to its nearest listed parent.
fn rank(order: &[&str], path: &str) -> usize {
    if let Some(pos) = order.iter().position(|f| *f == path) {
        return pos;
    }
    let mut parent = path;
    while let Some((head, _)) = parent.rsplit_once('.') {
        if let Some(pos) = order.iter().position(|f| *f == head) {
            return pos;
        }
        parent = head;
    }
    usize::MAX
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code));
                    out.push((path.clone(), msg));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect(nested, &path, out);
                }
            }
        }
    }
}

/// Run `validator` checks and turn failures into a single 400 error.
pub fn check<T: Validate + FieldOrder>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(messages(&e, T::FIELDS).join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Inner {
        #[validate(range(min = 0.0, max = 14.0, message = "pH must be between 0 and 14"))]
        ph: f64,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(nested)]
        inner: Inner,
        #[validate(custom(function = "not_blank", message = "Name is required"))]
        name: String,
        #[validate(custom(function = "not_blank", message = "Name is required"))]
        alias: String,
    }

    impl FieldOrder for Outer {
        const FIELDS: &'static [&'static str] = &["inner", "inner.ph", "name", "alias"];
    }

    #[test]
    fn collects_nested_messages_in_order() {
        let input = Outer {
            inner: Inner { ph: 15.0 },
            name: "  ".to_string(),
            alias: String::new(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(
            messages(&errors, Outer::FIELDS),
            vec!["pH must be between 0 and 14".to_string(), "Name is required".to_string()]
        );
    }

    #[test]
    fn check_maps_to_validation_error() {
        let input = Outer {
            inner: Inner { ph: 7.0 },
            name: String::new(),
            alias: "Sundarbans".to_string(),
        };
        let err = check(&input).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn valid_input_passes() {
        let input = Outer {
            inner: Inner { ph: 8.1 },
            name: "Sundarbans".to_string(),
            alias: "Sundarbans".to_string(),
        };
        assert!(check(&input).is_ok());
    }

    #[test]
    fn unlisted_fields_rank_after_listed_ones() {
        let order = &["name", "location"];
        assert_eq!(rank(order, "location.__all__"), 1);
        assert_eq!(rank(order, "location.address"), 1);
        assert_eq!(rank(order, "tags"), usize::MAX);
    }
}
