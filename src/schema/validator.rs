//! Submission validator
//!
//! For each field, in schema order:
//! 1. Resolve visibility; hidden fields are skipped entirely
//! 2. A visible required field must have an answer
//! 3. A present answer must satisfy the field's type constraint
//!
//! The first failing field wins; violations are not accumulated.

use super::errors::{ValidationError, ValidationResult};
use super::types::{FieldKind, FieldSchema, Form};
use crate::submission::{AnswerValue, Answers};

/// Validates answer sets against one form.
///
/// Validator does not mutate answers.
pub struct SchemaValidator<'a> {
    form: &'a Form,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(form: &'a Form) -> Self {
        Self { form }
    }

    /// Validates an answer set.
    ///
    /// # Errors
    ///
    /// Returns the violation of the first failing field in schema order.
    pub fn validate(&self, answers: &Answers) -> ValidationResult<()> {
        for field in &self.form.fields {
            if !field.is_visible(answers) {
                continue;
            }

            match answers.get(&field.id) {
                Some(value) => check_value(field, value)?,
                None if field.required => {
                    return Err(ValidationError::missing_required(&field.id));
                }
                None => {}
            }
        }

        Ok(())
    }
}

/// Validates `answers` against `form`
pub fn validate(form: &Form, answers: &Answers) -> ValidationResult<()> {
    SchemaValidator::new(form).validate(answers)
}

/// Checks a present answer against its field's type
fn check_value(field: &FieldSchema, value: &AnswerValue) -> ValidationResult<()> {
    match &field.kind {
        FieldKind::Text => match value {
            AnswerValue::String(s) if !s.is_empty() => Ok(()),
            _ => Err(ValidationError::invalid_value(&field.id)),
        },
        FieldKind::SingleChoice => match value.as_str() {
            Some(s) if field.allows(s) => Ok(()),
            _ => Err(ValidationError::value_not_allowed(&field.id)),
        },
        FieldKind::MultiSelect => {
            let AnswerValue::List(items) = value else {
                return Err(ValidationError::value_not_allowed(&field.id));
            };
            let all_allowed = items
                .iter()
                .all(|item| item.as_str().map_or(false, |s| field.allows(s)));
            if all_allowed {
                Ok(())
            } else {
                Err(ValidationError::value_not_allowed(&field.id))
            }
        }
        FieldKind::Rating => {
            let (min, max) = field.rating_bounds();
            match value.as_f64() {
                Some(n) if n >= min && n <= max => Ok(()),
                _ => Err(ValidationError::out_of_range(&field.id)),
            }
        }
        FieldKind::Other(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn answers(value: Value) -> Answers {
        serde_json::from_value(value).unwrap()
    }

    fn survey() -> Form {
        Form::new(
            "Survey",
            vec![
                FieldSchema::text("q1", "Say something").required(),
                FieldSchema::rating("q2", "Rate us"),
            ],
        )
    }

    #[test]
    fn test_accepts_minimal_answers() {
        assert!(validate(&survey(), &answers(json!({"q1": "hi"}))).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = validate(&survey(), &answers(json!({}))).unwrap_err();
        assert_eq!(err, ValidationError::missing_required("q1"));
    }

    #[test]
    fn test_empty_text_is_invalid() {
        let err = validate(&survey(), &answers(json!({"q1": ""}))).unwrap_err();
        assert_eq!(err, ValidationError::invalid_value("q1"));
    }

    #[test]
    fn test_non_string_text_is_invalid() {
        let err = validate(&survey(), &answers(json!({"q1": 3}))).unwrap_err();
        assert_eq!(err, ValidationError::invalid_value("q1"));
    }

    #[test]
    fn test_rating_non_numeric() {
        let err = validate(&survey(), &answers(json!({"q1": "hi", "q2": "5"}))).unwrap_err();
        assert_eq!(err, ValidationError::out_of_range("q2"));
    }

    #[test]
    fn test_explicit_rating_range() {
        let form = Form::new(
            "Range",
            vec![FieldSchema::rating("r", "R").required().with_range(0, 10)],
        );
        // min of zero falls back to the default of 1
        assert!(validate(&form, &answers(json!({"r": 0}))).is_err());
        assert!(validate(&form, &answers(json!({"r": 10}))).is_ok());
        assert!(validate(&form, &answers(json!({"r": 10.5}))).is_err());
    }

    #[test]
    fn test_single_choice() {
        let form = Form::new(
            "Choice",
            vec![FieldSchema::single_choice("c", "Pick", &["a", "b"]).required()],
        );
        assert!(validate(&form, &answers(json!({"c": "a"}))).is_ok());
        assert_eq!(
            validate(&form, &answers(json!({"c": "A"}))).unwrap_err(),
            ValidationError::value_not_allowed("c")
        );
        assert_eq!(
            validate(&form, &answers(json!({"c": ["a"]}))).unwrap_err(),
            ValidationError::value_not_allowed("c")
        );
    }

    #[test]
    fn test_multi_select_non_string_element() {
        let form = Form::new(
            "Multi",
            vec![FieldSchema::multi_select("m", "Pick", &["a", "b"]).required()],
        );
        assert!(validate(&form, &answers(json!({"m": ["a", "b"]}))).is_ok());
        assert!(validate(&form, &answers(json!({"m": []}))).is_ok());
        assert_eq!(
            validate(&form, &answers(json!({"m": ["a", 1]}))).unwrap_err(),
            ValidationError::value_not_allowed("m")
        );
        assert_eq!(
            validate(&form, &answers(json!({"m": "a"}))).unwrap_err(),
            ValidationError::value_not_allowed("m")
        );
    }

    #[test]
    fn test_unknown_type_accepts_anything() {
        let form = Form::new(
            "Other",
            vec![FieldSchema::new("x", "X", FieldKind::Other("date".into())).required()],
        );
        assert!(validate(&form, &answers(json!({"x": {"any": "thing"}}))).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let form = Form::new(
            "Order",
            vec![
                FieldSchema::text("first", "First").required(),
                FieldSchema::text("second", "Second").required(),
            ],
        );
        let err = validate(&form, &answers(json!({}))).unwrap_err();
        assert_eq!(err.field(), "first");
    }

    #[test]
    fn test_visibility_is_single_level() {
        // c depends on b, which depends on a. With a absent, b is hidden but
        // its answer still drives c.
        let form = Form::new(
            "Chain",
            vec![
                FieldSchema::text("a", "A"),
                FieldSchema::text("b", "B").show_if("a", json!("yes")),
                FieldSchema::text("c", "C").required().show_if("b", json!("go")),
            ],
        );
        let err = validate(&form, &answers(json!({"b": "go"}))).unwrap_err();
        assert_eq!(err, ValidationError::missing_required("c"));
    }
}
