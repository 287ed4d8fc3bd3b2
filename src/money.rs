// 💵 Money helpers - whole-unit rounding shared by both engines
//
// All published money values are whole currency units (i64).
// Rounding is half-up toward +infinity: 2.5 -> 3, -2.5 -> -2.

/// Round half-up to the nearest whole unit
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}

/// Round to one decimal place (used for percentages)
pub fn round_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0 + 0.5).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_non_finite_rounds_to_zero() {
        assert_eq!(round_half_up(f64::NAN), 0);
        assert_eq!(round_half_up(f64::INFINITY), 0);
        assert_eq!(round_tenth(f64::NAN), 0.0);
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(12.34), 12.3);
        assert_eq!(round_tenth(12.36), 12.4);
        assert_eq!(round_tenth(-20.0), -20.0);
    }
}
