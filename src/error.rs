//! Error types for the sqsforge crate.

use thiserror::Error;

/// Main error type for sqsforge operations.
#[derive(Debug, Error)]
pub enum SqsError {
    /// A settings parameter failed validation during `settings::validate`.
    #[error("invalid setting '{parameter}': {reason}")]
    BadSettings {
        /// Name of the offending settings field.
        parameter: String,
        /// Human-readable explanation of why it was rejected.
        reason: String,
    },

    /// A structure or configuration is geometrically inconsistent (e.g.
    /// mismatched lengths, degenerate lattice, out-of-bounds site index).
    #[error("geometry error: {reason}")]
    GeometryError {
        /// Human-readable explanation of the inconsistency.
        reason: String,
    },

    /// The search was cancelled before completion. Carries the count of
    /// results accumulated so far; the worker pool attaches the results
    /// themselves separately.
    #[error("search cancelled after {partial_results} partial result(s)")]
    CancelledError {
        /// Number of results already accumulated when cancellation hit.
        partial_results: usize,
    },
}

/// Result type alias for sqsforge operations.
pub type Result<T> = std::result::Result<T, SqsError>;

// === Validation helpers ===
//
// Each wraps a single `BadSettings` construction, used throughout
// `settings::validate`'s reader-function chain.

/// Check that a value is finite and strictly positive.
#[inline]
pub fn check_positive(value: f64, parameter: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SqsError::BadSettings {
            parameter: parameter.to_string(),
            reason: format!("must be a finite positive number, got {value}"),
        });
    }
    Ok(())
}

/// Check that a value is finite and non-negative.
#[inline]
pub fn check_non_negative(value: f64, parameter: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SqsError::BadSettings {
            parameter: parameter.to_string(),
            reason: format!("must be a finite non-negative number, got {value}"),
        });
    }
    Ok(())
}

/// Check that an integer-valued parameter is strictly positive.
#[inline]
pub fn check_positive_usize(value: usize, parameter: &str) -> Result<()> {
    if value == 0 {
        return Err(SqsError::BadSettings {
            parameter: parameter.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Check that a site index is within bounds.
#[inline]
pub fn check_site_bounds(site_idx: usize, n_sites: usize, parameter: &str) -> Result<()> {
    if site_idx >= n_sites {
        return Err(SqsError::BadSettings {
            parameter: parameter.to_string(),
            reason: format!("site index {site_idx} out of bounds (structure has {n_sites} sites)"),
        });
    }
    Ok(())
}

/// Check that a value lies within `[low, high]`, inclusive.
#[inline]
pub fn check_in_range(value: f64, low: f64, high: f64, parameter: &str) -> Result<()> {
    if !value.is_finite() || value < low || value > high {
        return Err(SqsError::BadSettings {
            parameter: parameter.to_string(),
            reason: format!("must be within [{low}, {high}], got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_settings_display() {
        let err = SqsError::BadSettings {
            parameter: "atol".to_string(),
            reason: "must be positive".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("atol"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_geometry_error_display() {
        let err = SqsError::GeometryError {
            reason: "mismatched lengths".to_string(),
        };
        assert!(err.to_string().contains("mismatched lengths"));
    }

    #[test]
    fn test_cancelled_error_display() {
        let err = SqsError::CancelledError { partial_results: 7 };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("cancelled"));
    }

    #[test]
    fn test_check_positive() {
        assert!(check_positive(1.0, "x").is_ok());
        assert!(check_positive(0.0, "x").is_err());
        assert!(check_positive(-1.0, "x").is_err());
        assert!(check_positive(f64::NAN, "x").is_err());
    }

    #[test]
    fn test_check_non_negative() {
        assert!(check_non_negative(0.0, "x").is_ok());
        assert!(check_non_negative(-0.1, "x").is_err());
    }

    #[test]
    fn test_check_positive_usize() {
        assert!(check_positive_usize(1, "n").is_ok());
        assert!(check_positive_usize(0, "n").is_err());
    }

    #[test]
    fn test_check_site_bounds() {
        assert!(check_site_bounds(2, 5, "site").is_ok());
        assert!(check_site_bounds(5, 5, "site").is_err());
    }

    #[test]
    fn test_check_in_range() {
        assert!(check_in_range(0.5, 0.0, 1.0, "x").is_ok());
        assert!(check_in_range(1.5, 0.0, 1.0, "x").is_err());
        assert!(check_in_range(f64::NAN, 0.0, 1.0, "x").is_err());
    }
}
