//! Domain error model.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Infrastructure
/// concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// One or more values failed validation.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Field-keyed validation failures.
///
/// Every write surface reports invalid input through this type so that callers
/// see the same field names and messages regardless of transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure against a field. A field may accumulate several messages.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Fold another set of failures into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "must not be empty");
        errors.add("title", "too long");
        errors.add("quantity", "must not be negative");

        assert!(!errors.is_empty());
        assert_eq!(errors.fields()["title"].len(), 2);
        assert_eq!(errors.fields()["quantity"], vec!["must not be negative"]);
    }

    #[test]
    fn merge_combines_both_sides() {
        let mut left = ValidationErrors::new();
        left.add("title", "must not be empty");

        let mut right = ValidationErrors::new();
        right.add("title", "too long");
        right.add("cost_price", "enter a number");

        left.merge(right);
        assert_eq!(left.fields()["title"].len(), 2);
        assert!(left.fields().contains_key("cost_price"));
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add("quantity", "must not be negative");
        errors.add("title", "must not be empty");

        assert_eq!(
            errors.to_string(),
            "quantity: must not be negative; title: must not be empty"
        );
    }

    #[test]
    fn converts_into_domain_error() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "must not be empty");

        let err = DomainError::from(errors);
        assert_eq!(
            err,
            DomainError::validation("title: must not be empty")
        );
    }

    #[test]
    fn serializes_as_a_plain_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "must not be empty");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "title": ["must not be empty"] }));
    }
}
