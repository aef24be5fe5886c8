//! Form schema and submission validator
//!
//! A form is an ordered list of field schemas. Validation walks that order
//! and stops at the first violation.
//!
//! # Rules
//!
//! - A field with a `showIf` condition is visible only when the referenced
//!   answer is present and equal to the expected value
//! - Hidden fields are neither required nor type-checked
//! - Visibility is single-level: conditions are not resolved transitively
//! - Validation is pure and deterministic

mod errors;
mod types;
mod validator;

pub use errors::{DefinitionError, ValidationError, ValidationResult};
pub use types::{FieldKind, FieldSchema, Form, FormStatus, ShowIf, DEFAULT_RATING_MAX, DEFAULT_RATING_MIN};
pub use validator::{validate, SchemaValidator};
