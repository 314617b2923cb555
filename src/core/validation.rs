//! Input validation utilities.
//!
//! Small parameter validators shared by request and configuration checks.
//! All of them fail with [`VectorizeError::InvalidRequest`] naming the
//! offending parameter.

use crate::core::errors::VectorizeError;

/// Validates that a string parameter is present and non-empty.
#[inline]
pub fn validate_non_empty_str(value: &str, param_name: &str) -> Result<(), VectorizeError> {
    if value.trim().is_empty() {
        return Err(VectorizeError::invalid_request(format!(
            "missing required field: {param_name}"
        )));
    }
    Ok(())
}

/// Validates that a float value is finite and strictly positive.
#[inline]
pub fn validate_positive_f64(value: f64, param_name: &str) -> Result<(), VectorizeError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(VectorizeError::invalid_request(format!(
            "{param_name} must be a positive number, got: {value}"
        )));
    }
    Ok(())
}

/// Validates that a float value is finite and strictly positive.
#[inline]
pub fn validate_positive_f32(value: f32, param_name: &str) -> Result<(), VectorizeError> {
    validate_positive_f64(value as f64, param_name)
}

/// Validates that a value is within a range (inclusive).
#[inline]
pub fn validate_range_f32(
    value: f32,
    min: f32,
    max: f32,
    param_name: &str,
) -> Result<(), VectorizeError> {
    if !value.is_finite() || value < min || value > max {
        return Err(VectorizeError::invalid_request(format!(
            "{param_name} must be in [{min}, {max}], got: {value}"
        )));
    }
    Ok(())
}
