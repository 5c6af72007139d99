//! # Validation Vocabulary
//!
//! The shared error vocabulary for request validation. Field failures are
//! *collected*, not fail-fast: a caller submitting a form with three bad
//! fields gets all three back in one round trip.
//!
//! Hierarchy and persistence errors live next to the components that raise
//! them (`locus-registry`); they short-circuit and are not part of this
//! per-field vocabulary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a single field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationKind {
    /// A required field was missing or blank.
    Required,
    /// A string field exceeded its maximum length.
    MaxLength,
    /// A string field fell short of its minimum length.
    MinLength,
    /// A geometry field carried out-of-range coordinates.
    InvalidGeometry,
}

impl ValidationKind {
    /// The canonical string name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::MaxLength => "MAX_LENGTH",
            Self::MinLength => "MIN_LENGTH",
            Self::InvalidGeometry => "INVALID_GEOMETRY",
        }
    }
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The field that failed (e.g. `"name"`).
    pub field: String,
    /// The kind of failure.
    pub kind: ValidationKind,
    /// Human-readable detail (limits, actual lengths).
    pub detail: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.kind, self.detail)
    }
}

/// An exhaustive collection of field validation failures for one request.
///
/// Accumulate with [`ValidationErrors::push`], then convert to a `Result`
/// with [`ValidationErrors::into_result`] once every field has been checked.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[error("validation failed: {}", self.summary())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field failure.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Whether any failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The recorded failures.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether a failure of the given kind was recorded for the given field.
    pub fn contains(&self, field: &str, kind: ValidationKind) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && e.kind == kind)
    }

    /// `Ok(value)` if no failure was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
