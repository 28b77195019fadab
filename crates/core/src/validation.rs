//! Field-level validation results.
//!
//! Validators collect every violation they find into a [`Violations`]
//! accumulator instead of stopping at the first one, so callers can report
//! all offending fields at once.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: &'static str,
    pub message: String,
}

/// All violations found while validating one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    /// A failure carrying exactly one violation.
    pub fn single(field: &str, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.to_string(),
                rule,
                message: message.into(),
            }],
        }
    }

    /// Whether `field` is among the violated fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Names of the violated fields, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for v in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Accumulator for field violations.
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, rule: &'static str, message: impl Into<String>) {
        self.items.push(FieldViolation {
            field: field.to_string(),
            rule,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Return `value` if nothing was violated, otherwise a
    /// [`CoreError::Validation`] listing every violation.
    pub fn finish<T>(self, value: T) -> Result<T, CoreError> {
        if self.items.is_empty() {
            Ok(value)
        } else {
            Err(CoreError::Validation(ValidationFailure {
                violations: self.items,
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// Reusable field checks
// ---------------------------------------------------------------------------

/// Trim `value` and check its character count lies in `[min, max]`.
///
/// Returns the trimmed string when the field is present, even if it violated
/// the length bounds, so callers can keep collecting violations.
pub fn check_text(
    violations: &mut Violations,
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    let trimmed = match value.map(str::trim) {
        None | Some("") => {
            violations.push(field, "required", format!("{field} is required"));
            return None;
        }
        Some(s) => s,
    };
    let len = trimmed.chars().count();
    if len < min {
        violations.push(
            field,
            "min_length",
            format!("{field} must be at least {min} characters"),
        );
    } else if len > max {
        violations.push(
            field,
            "max_length",
            format!("{field} must be at most {max} characters"),
        );
    }
    Some(trimmed.to_string())
}

/// Whether `value` is an absolute `http`/`https` URL.
pub fn is_web_url(value: &str) -> bool {
    use validator::ValidateUrl;

    let lower = value.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://"))
        && value.to_owned().validate_url()
}

/// Check an optional URL field; blank strings count as absent.
pub fn check_optional_url(
    violations: &mut Violations,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    let trimmed = value.map(str::trim).filter(|s| !s.is_empty())?;
    if !is_web_url(trimmed) {
        violations.push(field, "url", format!("{field} must be a valid URL"));
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn finish_without_violations_returns_value() {
        let v = Violations::new();
        assert_eq!(v.finish(7).unwrap(), 7);
    }

    #[test]
    fn finish_collects_every_violation() {
        let mut v = Violations::new();
        v.push("title", "required", "title is required");
        v.push("price", "range", "price out of range");
        let err = v.finish(()).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref failure) if failure.fields() == ["title", "price"]);
    }

    #[test]
    fn check_text_trims_and_measures_chars() {
        let mut v = Violations::new();
        let out = check_text(&mut v, "title", Some("  héé  "), 3, 10);
        assert_eq!(out.as_deref(), Some("héé"));
        assert!(v.is_empty());
    }

    #[test]
    fn check_text_blank_is_required_violation() {
        let mut v = Violations::new();
        assert!(check_text(&mut v, "title", Some("   "), 3, 10).is_none());
        let err = v.finish(()).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref f) if f.violations[0].rule == "required");
    }

    #[test]
    fn check_text_too_long() {
        let mut v = Violations::new();
        check_text(&mut v, "title", Some("abcdefghijk"), 3, 10);
        let err = v.finish(()).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref f) if f.violations[0].rule == "max_length");
    }

    #[test]
    fn web_urls() {
        assert!(is_web_url("https://cdn.example/x.zip"));
        assert!(is_web_url("http://localhost:9000/bucket/key"));
        assert!(!is_web_url("not a url"));
        assert!(!is_web_url("ftp://files.example/x.zip"));
        assert!(!is_web_url("https://"));
    }

    #[test]
    fn display_joins_violations() {
        let failure = ValidationFailure {
            violations: vec![
                FieldViolation {
                    field: "a".into(),
                    rule: "required",
                    message: "a is required".into(),
                },
                FieldViolation {
                    field: "b".into(),
                    rule: "url",
                    message: "b must be a valid URL".into(),
                },
            ],
        };
        assert_eq!(failure.to_string(), "a: a is required; b: b must be a valid URL");
    }
}
