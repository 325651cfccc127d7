//! Validation system for configuration values
//!
//! Each config section implements [`ConfigSection`], so new sections can be
//! added without touching the loader.

pub use crate::error::ValidationError;

/// Trait for configuration sections that can validate themselves
pub trait ConfigSection: Default {
    /// Validates the configuration section
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another config section into this one; values from `other` win
    fn merge(&mut self, other: Self);

    /// Returns the section name for error reporting
    fn section_name(&self) -> &'static str;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a numeric value is within a range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a string is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a value is one of the allowed options
    pub fn one_of<T>(value: &T, allowed: &[T], field: &str) -> Result<(), ValidationError>
    where
        T: PartialEq + std::fmt::Display,
    {
        if !allowed.contains(value) {
            let allowed_str = allowed
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ValidationError::with_value(
                field,
                format!("must be one of: {}", allowed_str),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a list is non-empty and strictly ascending
    pub fn strictly_ascending<T>(values: &[T], field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display,
    {
        if values.is_empty() {
            return Err(ValidationError::new(field, "must not be empty"));
        }
        match values.windows(2).find(|w| w[0] >= w[1]) {
            Some(pair) => Err(ValidationError::with_value(
                field,
                "must be strictly ascending",
                format!("{} followed by {}", pair[0], pair[1]),
            )),
            None => Ok(()),
        }
    }

    /// Validates an optional http(s) URL; empty means "not set"
    pub fn http_url(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.is_empty() || value.starts_with("https://") || value.starts_with("http://") {
            Ok(())
        } else {
            Err(ValidationError::with_value(
                field,
                "must start with http:// or https://",
                value,
            ))
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
