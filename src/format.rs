//! Number formatting for dashboard metrics and table cells.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Unit labels used while the scaled value is still below one thousand.
const UNITS: [&str; 2] = ["", "thousand"];

/// Label used once the value has been scaled past every entry of `UNITS`.
const LARGEST_UNIT: &str = "million";

/// Formats a metric as `"{prefix} {value} {unit}"`, dividing by one thousand until the value is
/// below one thousand, and printing two decimal places. Rounding is done on the `f64` value, so
/// `12.345` shows as `12.35` and `2.675` as `2.67`.
///
/// # Examples
///
/// ```
/// # use sales_dash::format_number;
/// assert_eq!(format_number(950, "R$"), "R$ 950.00 ");
/// assert_eq!(format_number(1500, "R$"), "R$ 1.50 thousand");
/// assert_eq!(format_number(2_500_000, ""), " 2.50 million");
/// ```
pub fn format_number(value: impl Into<Decimal>, prefix: &str) -> String {
    let mut value = value.into().to_f64().unwrap_or_default();
    for unit in UNITS {
        if value < 1000.0 {
            return format!("{prefix} {value:.2} {unit}");
        }
        value /= 1000.0;
    }
    format!("{prefix} {value:.2} {LARGEST_UNIT}")
}

/// Formats a value with thousands separators and two decimal places, e.g. `12,345.60`.
pub(crate) fn format_grouped(value: Decimal) -> String {
    format_num::format_num!(",.2f", value.to_f64().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::dec;

    #[test]
    fn test_below_one_thousand() {
        assert_eq!(format_number(950, "R$"), "R$ 950.00 ");
        assert_eq!(format_number(dec("999.994"), "R$"), "R$ 999.99 ");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(format_number(1500, "R$"), "R$ 1.50 thousand");
        assert_eq!(format_number(1000, "R$"), "R$ 1.00 thousand");
        assert_eq!(format_number(999_990, "R$"), "R$ 999.99 thousand");
    }

    #[test]
    fn test_millions() {
        assert_eq!(format_number(2_500_000, ""), " 2.50 million");
        assert_eq!(format_number(1_000_000, "R$"), "R$ 1.00 million");
        assert_eq!(format_number(7_250_000_000_i64, "R$"), "R$ 7250.00 million");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_number(0, "R$"), "R$ 0.00 ");
        assert_eq!(format_number(0, ""), " 0.00 ");
    }

    #[test]
    fn test_rounds_the_float_value() {
        assert_eq!(format_number(12_345, "R$"), "R$ 12.35 thousand");
        assert_eq!(format_number(12_345_u64, ""), " 12.35 thousand");
        assert_eq!(format_number(2_675, "R$"), "R$ 2.67 thousand");
    }

    #[test]
    fn test_count() {
        assert_eq!(format_number(9_436_u64, ""), " 9.44 thousand");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(dec("1234567.891")), "1,234,567.89");
        assert_eq!(format_grouped(dec("12")), "12.00");
    }
}
