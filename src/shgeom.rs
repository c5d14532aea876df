//! Shifted geometric mean
//!
//! The shifted geometric mean adds a positive shift to every value before
//! taking the geometric mean, and subtracts it from the result:
//!
//! ```text
//! shgeom(v, s) = exp( (1/n) · Σ ln(v_i + s) ) − s
//! ```
//!
//! It is neither dominated by large outliers (unlike the arithmetic mean) nor
//! by values close to zero (unlike the plain geometric mean), which makes it
//! the usual way of comparing solver runtimes over a test set.
//!
//! References:
//! - <http://plato.asu.edu/ftp/shgeom.html>

use crate::{Error, Result};

/// Shift applied to solver runtimes (in microseconds) when none is configured
pub const DEFAULT_SHIFT: f64 = 10.0;

/// Shifted geometric mean of nonnegative values.
///
/// Computed as the exponential of a mean of logarithms, so it neither
/// overflows on large test sets nor on large runtimes.
///
/// # Arguments
/// * `values` - Nonnegative, finite values (at least one)
/// * `shift` - Shift parameter, at least 1
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `values` is empty, if any value is
/// negative or not finite, or if `shift` is below 1 or not finite.
///
/// # Example
///
/// ```rust
/// use qpbench::shgeom::shgeom;
///
/// let mean = shgeom(&[100.0, 200.0], 10.0)?;
/// let expected = ((110.0_f64.ln() + 210.0_f64.ln()) / 2.0).exp() - 10.0;
/// assert!((mean - expected).abs() < 1e-9);
/// # Ok::<(), qpbench::Error>(())
/// ```
pub fn shgeom(values: &[f64], shift: f64) -> Result<f64> {
    check_shift(shift)?;
    if values.is_empty() {
        return Err(Error::InvalidArgument(
            "shifted geometric mean of an empty sequence is undefined".to_string(),
        ));
    }
    if let Some((index, value)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(Error::InvalidArgument(format!(
            "values must be finite and nonnegative, got {value} at index {index}"
        )));
    }

    // Summing in sorted order makes the result independent of input order
    let mut logs: Vec<f64> = values.iter().map(|v| (v + shift).ln()).collect();
    logs.sort_by(f64::total_cmp);

    #[allow(clippy::cast_precision_loss)]
    let mean_log = logs.iter().sum::<f64>() / logs.len() as f64;
    Ok(mean_log.exp() - shift)
}

pub(crate) fn check_shift(shift: f64) -> Result<()> {
    if !shift.is_finite() || shift < 1.0 {
        return Err(Error::InvalidArgument(format!(
            "shift must be a finite number >= 1, got {shift}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_is_identity() {
        let mean = shgeom(&[42.0], 1.0).unwrap();
        assert!((mean - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_values() {
        let mean = shgeom(&[7.0, 7.0, 7.0], DEFAULT_SHIFT).unwrap();
        assert!((mean - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_values() {
        let mean = shgeom(&[0.0, 0.0], 1.0).unwrap();
        assert!(mean.abs() < 1e-12);
    }

    #[test]
    fn test_reference_value() {
        let mean = shgeom(&[100.0, 200.0], 10.0).unwrap();
        let expected = (110.0_f64 * 210.0).sqrt() - 10.0;
        assert!((mean - expected).abs() < 1e-9);
    }

    #[test]
    fn test_large_inputs_do_not_overflow() {
        // A raw product of these would overflow f64
        let values = vec![1e300; 1_000];
        let mean = shgeom(&values, DEFAULT_SHIFT).unwrap();
        assert!(mean.is_finite());
        assert!((mean / 1e300 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_small_shift() {
        assert!(matches!(
            shgeom(&[1.0], 0.5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            shgeom(&[1.0], f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_negative_value() {
        let err = shgeom(&[1.0, -2.0], 10.0).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_rejects_nan_value() {
        assert!(matches!(
            shgeom(&[f64::NAN], 10.0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(shgeom(&[], 10.0), Err(Error::InvalidArgument(_))));
    }
}
