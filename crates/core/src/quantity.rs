//! Float-tolerant quantity comparison.
//!
//! Quantities are real numbers on both sides; rounding noise from unit
//! conversions must not trigger remote writes.

/// Absolute tolerance below which two quantities are always equal.
pub const ABSOLUTE_TOLERANCE: f64 = 0.001;

/// Relative tolerance, scaled by the larger magnitude.
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

/// `true` when `|a - b| <= max(abs_tol, rel_tol * max(|a|, |b|))`.
pub fn quantities_match(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let tolerance = ABSOLUTE_TOLERANCE.max(RELATIVE_TOLERANCE * a.abs().max(b.abs()));
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn noise_below_absolute_tolerance_matches() {
        assert!(quantities_match(50.0000001, 50.0));
        assert!(quantities_match(0.0, 0.0009));
        assert!(quantities_match(10.0, 10.001));
    }

    #[test]
    fn differences_above_tolerance_do_not_match() {
        assert!(!quantities_match(50.002, 50.0));
        assert!(!quantities_match(42.0, 40.0));
        assert!(!quantities_match(0.0, 0.01));
    }

    #[test]
    fn relative_tolerance_dominates_for_large_values() {
        // 1e-9 * 1e8 = 0.1
        assert!(quantities_match(100_000_000.0, 100_000_000.05));
        assert!(!quantities_match(100_000_000.0, 100_000_000.5));
    }

    #[test]
    fn non_finite_values_only_match_themselves() {
        assert!(!quantities_match(f64::NAN, f64::NAN));
        assert!(quantities_match(f64::INFINITY, f64::INFINITY));
        assert!(!quantities_match(f64::INFINITY, 1.0));
    }

    proptest! {
        #[test]
        fn comparison_is_symmetric(a in 0.0f64..1e9, b in 0.0f64..1e9) {
            prop_assert_eq!(quantities_match(a, b), quantities_match(b, a));
        }

        #[test]
        fn value_matches_itself(a in 0.0f64..1e12) {
            prop_assert!(quantities_match(a, a));
        }
    }
}
