//! # Request Validation — Exhaustive, Not Fail-Fast
//!
//! Every field of a draft is checked and every failure recorded before
//! anything is returned, so a client can correct a whole form in one round
//! trip. Hierarchy and concurrency errors are not part of this: they
//! short-circuit in the registry, because they are not independent per-field
//! issues.

use locus_core::{FieldError, GeoPoint, ValidationErrors, ValidationKind};

use crate::dto::RawPoint;

/// Minimum length of a name field, after trimming.
pub const NAME_MIN_LEN: usize = 2;
/// Maximum length of a name field.
pub const NAME_MAX_LEN: usize = 256;
/// Maximum length of a log entry message.
pub const MESSAGE_MAX_LEN: usize = 1024;
/// Maximum length of a dashboard option key.
pub const KEY_MAX_LEN: usize = 128;

/// Validate a required name-like string field.
///
/// Records `Required` for a missing or blank value, `MinLength`/`MaxLength`
/// for out-of-bounds lengths. Returns the trimmed value when it passed.
pub fn require_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    let trimmed = match value.map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new(
                field,
                ValidationKind::Required,
                "value is required",
            ));
            return None;
        }
        Some(trimmed) => trimmed,
    };
    check_length(errors, field, trimmed, min, max).then(|| trimmed.to_string())
}

/// Validate an optional name-like string field (present means change it).
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    let trimmed = value.map(str::trim)?;
    if trimmed.is_empty() {
        errors.push(FieldError::new(
            field,
            ValidationKind::Required,
            "value may not be blank",
        ));
        return None;
    }
    check_length(errors, field, trimmed, min, max).then(|| trimmed.to_string())
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> bool {
    let length = value.chars().count();
    if length < min {
        errors.push(FieldError::new(
            field,
            ValidationKind::MinLength,
            format!("length {length} is below the minimum of {min}"),
        ));
        return false;
    }
    if length > max {
        errors.push(FieldError::new(
            field,
            ValidationKind::MaxLength,
            format!("length {length} exceeds the maximum of {max}"),
        ));
        return false;
    }
    true
}

/// Validate a raw coordinate pair, recording `InvalidGeometry` on failure.
pub fn validate_geometry(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<RawPoint>,
) -> Option<GeoPoint> {
    let raw = raw?;
    match GeoPoint::new(raw.latitude, raw.longitude) {
        Ok(point) => Some(point),
        Err(reason) => {
            errors.push(FieldError::new(
                field,
                ValidationKind::InvalidGeometry,
                reason.to_string(),
            ));
            None
        }
    }
}

/// Record a `Required` failure for a missing non-text field.
pub fn require_present<T>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<T>,
) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::new(
            field,
            ValidationKind::Required,
            "value is required",
        ));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_collects_required() {
        let mut errors = ValidationErrors::new();
        assert!(require_text(&mut errors, "name", None, NAME_MIN_LEN, NAME_MAX_LEN).is_none());
        assert!(require_text(&mut errors, "name", Some("   "), NAME_MIN_LEN, NAME_MAX_LEN).is_none());
        assert_eq!(errors.errors().len(), 2);
        assert!(errors.contains("name", ValidationKind::Required));
    }

    #[test]
    fn test_require_text_trims_and_accepts() {
        let mut errors = ValidationErrors::new();
        let value = require_text(&mut errors, "name", Some("  Plant 7  "), NAME_MIN_LEN, NAME_MAX_LEN);
        assert_eq!(value.as_deref(), Some("Plant 7"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_length_bounds() {
        let mut errors = ValidationErrors::new();
        assert!(require_text(&mut errors, "name", Some("x"), NAME_MIN_LEN, NAME_MAX_LEN).is_none());
        assert!(errors.contains("name", ValidationKind::MinLength));

        let long = "x".repeat(NAME_MAX_LEN + 1);
        let mut errors = ValidationErrors::new();
        assert!(require_text(&mut errors, "name", Some(&long), NAME_MIN_LEN, NAME_MAX_LEN).is_none());
        assert!(errors.contains("name", ValidationKind::MaxLength));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 3 multibyte characters are length 3, not 9.
        let mut errors = ValidationErrors::new();
        let value = require_text(&mut errors, "name", Some("äöü"), NAME_MIN_LEN, NAME_MAX_LEN);
        assert_eq!(value.as_deref(), Some("äöü"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_optional_text_absent_is_fine() {
        let mut errors = ValidationErrors::new();
        assert!(optional_text(&mut errors, "name", None, NAME_MIN_LEN, NAME_MAX_LEN).is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_optional_text_blank_is_rejected() {
        let mut errors = ValidationErrors::new();
        assert!(optional_text(&mut errors, "name", Some(""), NAME_MIN_LEN, NAME_MAX_LEN).is_none());
        assert!(errors.contains("name", ValidationKind::Required));
    }

    #[test]
    fn test_geometry_out_of_range_collected() {
        let mut errors = ValidationErrors::new();
        let point = validate_geometry(
            &mut errors,
            "geometry",
            Some(RawPoint {
                latitude: 95.0,
                longitude: 0.0,
            }),
        );
        assert!(point.is_none());
        assert!(errors.contains("geometry", ValidationKind::InvalidGeometry));
    }

    #[test]
    fn test_geometry_valid_converts() {
        let mut errors = ValidationErrors::new();
        let point = validate_geometry(
            &mut errors,
            "geometry",
            Some(RawPoint {
                latitude: 48.2,
                longitude: 16.37,
            }),
        );
        assert!(point.is_some());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_require_present() {
        let mut errors = ValidationErrors::new();
        assert_eq!(require_present(&mut errors, "type_id", Some(7)), Some(7));
        assert!(errors.is_empty());
        assert!(require_present::<u8>(&mut errors, "type_id", None).is_none());
        assert!(errors.contains("type_id", ValidationKind::Required));
    }
}
