//! Safe percentage-change computation

/// Percent change from `previous` to `current`.
///
/// Returns `0.0` when `previous` is zero or not a finite number, so callers
/// never see a division by zero, `Infinity`, or `NaN`. The result is
/// unrounded; rounding happens at the report boundary.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_previous_returns_zero() {
        assert_eq!(percent_change(150.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(-42.5, 0.0), 0.0);
    }

    #[test]
    fn test_basic_changes() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
        assert_eq!(percent_change(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_both_negative() {
        // Spending shrank in magnitude: -50 from -100 is a -50% change
        assert_eq!(percent_change(-50.0, -100.0), -50.0);
        assert_eq!(percent_change(-200.0, -100.0), 100.0);
    }

    #[test]
    fn test_sign_flip() {
        assert_eq!(percent_change(50.0, -100.0), -150.0);
        assert_eq!(percent_change(-50.0, 100.0), -150.0);
    }

    #[test]
    fn test_non_finite_inputs_never_propagate() {
        assert_eq!(percent_change(f64::NAN, 100.0), 0.0);
        assert_eq!(percent_change(100.0, f64::NAN), 0.0);
        assert_eq!(percent_change(100.0, f64::INFINITY), 0.0);
        assert!(percent_change(f64::INFINITY, f64::NEG_INFINITY).is_finite());
    }
}
