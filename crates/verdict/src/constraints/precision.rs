//! Digit-budget constraint for floating-point values.

/// Splits a finite value's decimal rendering into significant integer
/// digits and decimal digits. `None` for NaN and infinities.
///
/// Works on the `Display` form, which for `f64` is always plain decimal
/// notation: the shortest text that round-trips, so no trailing zeros and
/// no exponent to account for. Leading integer zeros are not significant.
fn digits(value: f64) -> Option<(u32, u32)> {
    if !value.is_finite() {
        return None;
    }
    let rendered = value.abs().to_string();
    let (int_part, frac_part) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));
    let int_digits = u32::try_from(int_part.trim_start_matches('0').len()).ok()?;
    let frac_digits = u32::try_from(frac_part.len()).ok()?;
    Some((int_digits, frac_digits))
}

// ============================================================================
// SCALE PRECISION
// ============================================================================

crate::constraint! {
    /// Passes when the value fits a digit budget: at most `scale` decimal
    /// digits, and at most `precision - scale` digits before the point.
    ///
    /// Mirrors SQL `DECIMAL(precision, scale)`: `scale = 2, precision = 4`
    /// admits `12.34` but rejects `123.4` and `1.234`. Non-finite values
    /// never fit.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub ScalePrecision { scale: u32, precision: u32 } for f64;
    rule(self, value) {
        match digits(*value) {
            Some((int_digits, frac_digits)) => {
                frac_digits <= self.scale
                    && int_digits <= self.precision.saturating_sub(self.scale)
            }
            None => false,
        }
    }
    message(self, value) {
        format!(
            "Value must not be more than {} digits in total, with allowance for {} decimals",
            self.precision, self.scale,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::constraints::Constraint;

    #[rstest]
    #[case(12.34, true)]
    #[case(2.3, true)]
    #[case(0.04, true)]
    #[case(99.0, true)]
    #[case(123.4, false)] // three integer digits
    #[case(1.234, false)] // three decimals
    #[case(1234.0, false)]
    fn budget_of_four_with_two_decimals(#[case] value: f64, #[case] valid: bool) {
        let atom = ScalePrecision::new(2, 4);
        assert_eq!(atom.check(&value).is_none(), valid, "value: {value}");
    }

    #[test]
    fn negative_sign_is_not_a_digit() {
        let atom = ScalePrecision::new(2, 4);
        assert_eq!(atom.check(&-12.34), None);
        assert!(atom.check(&-123.4).is_some());
    }

    #[test]
    fn leading_integer_zeros_are_not_significant() {
        // "0.5" renders with a leading zero that must not count.
        let atom = ScalePrecision::new(1, 1);
        assert_eq!(atom.check(&0.5), None);
        assert!(atom.check(&1.5).is_some());
    }

    #[test]
    fn non_finite_values_never_fit() {
        let atom = ScalePrecision::new(2, 8);
        assert!(atom.check(&f64::NAN).is_some());
        assert!(atom.check(&f64::INFINITY).is_some());
        assert!(atom.check(&f64::NEG_INFINITY).is_some());
    }

    #[test]
    fn message_names_both_budgets() {
        let atom = ScalePrecision::new(2, 4);
        assert_eq!(
            atom.check(&123.456).as_deref(),
            Some("Value must not be more than 4 digits in total, with allowance for 2 decimals"),
        );
    }
}
