//! Schema error types
//!
//! Error codes:
//! - FORM_MISSING_REQUIRED
//! - FORM_INVALID_VALUE
//! - FORM_VALUE_NOT_ALLOWED
//! - FORM_OUT_OF_RANGE
//! - FORM_INVALID_DEFINITION

use thiserror::Error;

/// Result type for submission validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// First violation found while validating a submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Visible required field has no answer
    #[error("missing required field: {field}")]
    MissingRequired { field: String },

    /// Text answer missing or empty
    #[error("invalid value for field: {field}")]
    InvalidValue { field: String },

    /// Choice answer not among the options
    #[error("value not allowed for field: {field}")]
    ValueNotAllowed { field: String },

    /// Rating not numeric or outside its bounds
    #[error("value out of range for field: {field}")]
    OutOfRange { field: String },
}

impl ValidationError {
    pub fn missing_required(field: impl Into<String>) -> Self {
        Self::MissingRequired { field: field.into() }
    }

    pub fn invalid_value(field: impl Into<String>) -> Self {
        Self::InvalidValue { field: field.into() }
    }

    pub fn value_not_allowed(field: impl Into<String>) -> Self {
        Self::ValueNotAllowed { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>) -> Self {
        Self::OutOfRange { field: field.into() }
    }

    /// The offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field }
            | Self::InvalidValue { field }
            | Self::ValueNotAllowed { field }
            | Self::OutOfRange { field } => field,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "FORM_MISSING_REQUIRED",
            Self::InvalidValue { .. } => "FORM_INVALID_VALUE",
            Self::ValueNotAllowed { .. } => "FORM_VALUE_NOT_ALLOWED",
            Self::OutOfRange { .. } => "FORM_OUT_OF_RANGE",
        }
    }
}

/// Problems with a form definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("form title is required")]
    MissingTitle,

    #[error("at least one field is required")]
    NoFields,

    #[error("at least one field must be required")]
    NoRequiredField,

    #[error("every field needs an id")]
    MissingFieldId,

    #[error("duplicate field id: {0}")]
    DuplicateField(String),

    #[error("field '{0}' needs a proper label")]
    MissingLabel(String),

    #[error("PII field '{0}' must be required")]
    PiiNotRequired(String),

    #[error("choice field '{0}' must have at least one option")]
    MissingOptions(String),

    #[error("choice field '{0}' has an empty option")]
    EmptyOption(String),
}

impl DefinitionError {
    pub fn code(&self) -> &'static str {
        "FORM_INVALID_DEFINITION"
    }
}
