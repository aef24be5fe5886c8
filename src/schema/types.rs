//! Form schema type definitions
//!
//! Field types:
//! - text: non-empty string
//! - single_choice: one of the listed options
//! - multi_select: list of listed options
//! - rating: number within `[min, max]`
//! - anything else: accepted as-is

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::DefinitionError;
use crate::submission::Answers;

/// Rating lower bound when the schema leaves `min` at zero
pub const DEFAULT_RATING_MIN: i64 = 1;
/// Rating upper bound when the schema leaves `max` at zero
pub const DEFAULT_RATING_MAX: i64 = 5;

const PLACEHOLDER_TITLE: &str = "Untitled Form";
const PLACEHOLDER_LABEL: &str = "Question";

/// Field type tag
///
/// Unknown tags are preserved so that forms round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    SingleChoice,
    MultiSelect,
    Rating,
    Other(String),
}

impl FieldKind {
    /// Returns the wire name of this type
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::SingleChoice => "single_choice",
            FieldKind::MultiSelect => "multi_select",
            FieldKind::Rating => "rating",
            FieldKind::Other(tag) => tag,
        }
    }

    /// Whether the field draws its answers from an option list
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::SingleChoice | FieldKind::MultiSelect)
    }
}

impl From<String> for FieldKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => FieldKind::Text,
            "single_choice" => FieldKind::SingleChoice,
            "multi_select" => FieldKind::MultiSelect,
            "rating" => FieldKind::Rating,
            _ => FieldKind::Other(tag),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.type_name().to_string()
    }
}

/// Visibility condition: show the field only if another answer equals a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowIf {
    /// Field whose answer controls visibility
    pub field_id: String,
    /// Expected answer
    pub equals: Value,
}

/// A single field of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Identifier, unique within the form
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Type tag
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Whether a visible field must be answered
    #[serde(default)]
    pub required: bool,
    /// Allowed values for choice types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Rating minimum (0 = default)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub min: i64,
    /// Rating maximum (0 = default)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max: i64,
    /// Optional visibility condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    /// Personally identifiable; excluded from analytics
    #[serde(default, rename = "isPII")]
    pub is_pii: bool,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl FieldSchema {
    /// Create an optional field of the given kind
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
            min: 0,
            max: 0,
            show_if: None,
            is_pii: false,
        }
    }

    /// Create an optional text field
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldKind::Text)
    }

    /// Create an optional single-choice field
    pub fn single_choice(id: impl Into<String>, label: impl Into<String>, options: &[&str]) -> Self {
        Self::new(id, label, FieldKind::SingleChoice).with_options(options)
    }

    /// Create an optional multi-select field
    pub fn multi_select(id: impl Into<String>, label: impl Into<String>, options: &[&str]) -> Self {
        Self::new(id, label, FieldKind::MultiSelect).with_options(options)
    }

    /// Create an optional rating field with default bounds
    pub fn rating(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldKind::Rating)
    }

    /// Mark the field required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as PII
    pub fn pii(mut self) -> Self {
        self.is_pii = true;
        self
    }

    /// Set explicit rating bounds
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Attach a visibility condition
    pub fn show_if(mut self, field_id: impl Into<String>, equals: Value) -> Self {
        self.show_if = Some(ShowIf {
            field_id: field_id.into(),
            equals,
        });
        self
    }

    fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    /// Effective rating bounds, each defaulted independently when zero
    pub fn rating_bounds(&self) -> (f64, f64) {
        let min = if self.min == 0 { DEFAULT_RATING_MIN } else { self.min };
        let max = if self.max == 0 { DEFAULT_RATING_MAX } else { self.max };
        (min as f64, max as f64)
    }

    /// Whether `value` is one of the listed options
    pub fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }

    /// Resolve visibility against an answer set.
    ///
    /// Only the direct reference is consulted; a referenced field that is
    /// itself hidden still counts if it was answered.
    pub fn is_visible(&self, answers: &Answers) -> bool {
        match &self.show_if {
            None => true,
            Some(cond) => answers
                .get(&cond.field_id)
                .map_or(false, |answer| answer.matches(&cond.equals)),
        }
    }
}

/// Form lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Published => "published",
        }
    }
}

/// A form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Unique form ID
    pub id: String,
    /// Title
    pub title: String,
    /// Lifecycle state
    #[serde(default)]
    pub status: FormStatus,
    /// Ordered field schemas
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Creator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Form {
    /// Create a draft form with a fresh ID
    pub fn new(title: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            status: FormStatus::Draft,
            fields,
            created_at: now,
            updated_at: now,
            owner_id: None,
        }
    }

    /// Set the owner
    pub fn owned_by(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Mark published
    pub fn published(mut self) -> Self {
        self.status = FormStatus::Published;
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == FormStatus::Published
    }

    /// Whether `caller` created this form
    pub fn is_owned_by(&self, caller: &str) -> bool {
        self.owner_id.as_deref() == Some(caller)
    }

    /// Validates the form definition itself (not a submission)
    pub fn validate_structure(&self) -> Result<(), DefinitionError> {
        let title = self.title.trim();
        if title.is_empty() || title == PLACEHOLDER_TITLE {
            return Err(DefinitionError::MissingTitle);
        }

        if self.fields.is_empty() {
            return Err(DefinitionError::NoFields);
        }

        if !self.fields.iter().any(|f| f.required) {
            return Err(DefinitionError::NoRequiredField);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.id.trim().is_empty() {
                return Err(DefinitionError::MissingFieldId);
            }
            if !seen.insert(field.id.as_str()) {
                return Err(DefinitionError::DuplicateField(field.id.clone()));
            }

            let label = field.label.trim();
            if label.is_empty() || label == PLACEHOLDER_LABEL {
                return Err(DefinitionError::MissingLabel(field.id.clone()));
            }

            if field.is_pii && !field.required {
                return Err(DefinitionError::PiiNotRequired(field.id.clone()));
            }

            if field.kind.is_choice() {
                if field.options.is_empty() {
                    return Err(DefinitionError::MissingOptions(field.id.clone()));
                }
                if field.options.iter().any(|o| o.is_empty()) {
                    return Err(DefinitionError::EmptyOption(field.id.clone()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::AnswerValue;
    use serde_json::json;

    fn sample_form() -> Form {
        Form::new(
            "Feedback",
            vec![
                FieldSchema::text("name", "Your name").required().pii(),
                FieldSchema::single_choice("color", "Favourite colour", &["red", "blue"]),
                FieldSchema::rating("score", "Score"),
            ],
        )
    }

    #[test]
    fn test_structure_valid() {
        assert!(sample_form().validate_structure().is_ok());
    }

    #[test]
    fn test_placeholder_title_rejected() {
        let mut form = sample_form();
        form.title = "Untitled Form".into();
        assert_eq!(form.validate_structure(), Err(DefinitionError::MissingTitle));
    }

    #[test]
    fn test_requires_a_required_field() {
        let form = Form::new("T", vec![FieldSchema::text("a", "A")]);
        assert_eq!(form.validate_structure(), Err(DefinitionError::NoRequiredField));
    }

    #[test]
    fn test_pii_must_be_required() {
        let form = Form::new(
            "T",
            vec![
                FieldSchema::text("a", "A").required(),
                FieldSchema::text("email", "Email").pii(),
            ],
        );
        assert_eq!(
            form.validate_structure(),
            Err(DefinitionError::PiiNotRequired("email".into()))
        );
    }

    #[test]
    fn test_choice_needs_options() {
        let form = Form::new(
            "T",
            vec![FieldSchema::single_choice("c", "Pick", &[]).required()],
        );
        assert_eq!(
            form.validate_structure(),
            Err(DefinitionError::MissingOptions("c".into()))
        );
    }

    #[test]
    fn test_duplicate_field_ids() {
        let form = Form::new(
            "T",
            vec![
                FieldSchema::text("a", "A").required(),
                FieldSchema::text("a", "Again"),
            ],
        );
        assert_eq!(
            form.validate_structure(),
            Err(DefinitionError::DuplicateField("a".into()))
        );
    }

    #[test]
    fn test_rating_bounds_default_independently() {
        assert_eq!(FieldSchema::rating("r", "R").rating_bounds(), (1.0, 5.0));
        assert_eq!(FieldSchema::rating("r", "R").with_range(0, 10).rating_bounds(), (1.0, 10.0));
        assert_eq!(FieldSchema::rating("r", "R").with_range(3, 0).rating_bounds(), (3.0, 5.0));
    }

    #[test]
    fn test_visibility() {
        let field = FieldSchema::text("b", "B").show_if("a", json!("yes"));
        let mut answers = Answers::new();
        assert!(!field.is_visible(&answers));

        answers.insert("a".into(), AnswerValue::from("no"));
        assert!(!field.is_visible(&answers));

        answers.insert("a".into(), AnswerValue::from("yes"));
        assert!(field.is_visible(&answers));
    }

    #[test]
    fn test_field_wire_format() {
        let field: FieldSchema = serde_json::from_value(json!({
            "id": "q",
            "label": "Q",
            "type": "dropdown",
            "showIf": {"fieldId": "a", "equals": 2},
            "isPII": true
        }))
        .unwrap();

        assert_eq!(field.kind, FieldKind::Other("dropdown".into()));
        assert!(field.is_pii);
        assert!(!field.required);

        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back["type"], "dropdown");
        assert_eq!(back["showIf"]["fieldId"], "a");
        assert!(back.get("min").is_none());
    }
}
