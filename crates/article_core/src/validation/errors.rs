//! Structured validation outcomes.
//!
//! # Responsibility
//! - Describe every rule violation as a field + reason pair.
//! - Render violations as stable codes and user-facing messages.
//!
//! # Invariants
//! - Errors keep rule-table order; nothing is deduplicated or reordered.
//! - An empty `ValidationErrors` always means the candidate passed.

use crate::model::article::ArticleId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Article field addressed by a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleField {
    Title,
}

impl ArticleField {
    /// Wire/storage name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
        }
    }

    /// Capitalized name used when building full messages.
    pub fn human_name(self) -> &'static str {
        match self {
            Self::Title => "Title",
        }
    }
}

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    /// Value is absent or blank.
    #[serde(rename = "blank")]
    Presence,
    /// Value has more characters than allowed.
    #[serde(rename = "too_long")]
    Length { maximum: usize, actual: usize },
    /// Another article already uses the same case-folded value.
    #[serde(rename = "taken")]
    Uniqueness { existing: ArticleId },
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Presence => "blank",
            Self::Length { .. } => "too_long",
            Self::Uniqueness { .. } => "taken",
        }
    }

    /// Message without the field name, e.g. `can't be blank`.
    pub fn message(&self) -> String {
        match self {
            Self::Presence => "can't be blank".to_string(),
            Self::Length { maximum, .. } => {
                format!("is too long (maximum is {maximum} characters)")
            }
            Self::Uniqueness { .. } => "has already been taken".to_string(),
        }
    }
}

/// Violation bound to the field it was raised on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ArticleField,
    #[serde(flatten)]
    pub error: ValidationError,
}

impl FieldError {
    /// Message prefixed with the field name, e.g. `Title can't be blank`.
    pub fn full_message(&self) -> String {
        format!("{} {}", self.field.human_name(), self.error.message())
    }
}

/// Ordered set of every violation found for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set holding exactly one violation.
    pub fn single(field: ArticleField, error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(field, error);
        errors
    }

    pub fn add(&mut self, field: ArticleField, error: ValidationError) {
        self.errors.push(FieldError { field, error });
    }

    /// Appends every violation from `other`, keeping order.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Violations raised on one field.
    pub fn on(&self, field: ArticleField) -> impl Iterator<Item = &ValidationError> {
        self.errors
            .iter()
            .filter(move |item| item.field == field)
            .map(|item| &item.error)
    }

    /// Stable codes in rule order, e.g. `["blank", "too_long"]`.
    pub fn codes(&self) -> Vec<&'static str> {
        self.errors.iter().map(|item| item.error.code()).collect()
    }

    pub fn has_presence_error(&self) -> bool {
        self.errors
            .iter()
            .any(|item| matches!(item.error, ValidationError::Presence))
    }

    pub fn has_length_error(&self) -> bool {
        self.errors
            .iter()
            .any(|item| matches!(item.error, ValidationError::Length { .. }))
    }

    pub fn has_uniqueness_error(&self) -> bool {
        self.errors
            .iter()
            .any(|item| matches!(item.error, ValidationError::Uniqueness { .. }))
    }

    /// User-facing messages prefixed with the field name.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::full_message).collect()
    }

    /// Field name to messages, for callers that render per-field errors.
    pub fn to_field_map(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for item in &self.errors {
            map.entry(item.field.as_str())
                .or_default()
                .push(item.error.message());
        }
        map
    }

    /// Converts into `Err` when any violation was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "validation passed");
        }
        write!(f, "validation failed: {}", self.full_messages().join(", "))
    }
}

impl Error for ValidationErrors {}
