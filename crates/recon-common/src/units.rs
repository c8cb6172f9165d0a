//! Unit conversions used for classification.

/// Statute miles per hour in one knot, as used by the hurricane scale tables.
pub const KNOTS_TO_MPH: f64 = 1.15078;

/// Convert a wind speed from knots to mph.
pub fn knots_to_mph(knots: f64) -> f64 {
    knots * KNOTS_TO_MPH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knots_to_mph() {
        assert!((knots_to_mph(100.0) - 115.078).abs() < 1e-9);
        assert_eq!(knots_to_mph(0.0), 0.0);
    }
}
