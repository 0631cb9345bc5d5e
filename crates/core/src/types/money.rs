//! Money helpers for Nepali rupee amounts.
//!
//! All monetary values in the system are `rust_decimal::Decimal` in NPR.
//! The store sells in a single currency, so there is no currency field on
//! prices; this module only provides display formatting.

use rust_decimal::Decimal;

/// Format a decimal amount as an NPR price string, e.g. `"Rs 4,999.00"`.
#[must_use]
pub fn format_npr(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let raw = format!("{rounded:.2}");
    let (whole, frac) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole), |rest| ("-", rest));

    // Group thousands from the right
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("Rs {sign}{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_npr_small() {
        assert_eq!(format_npr(Decimal::ZERO), "Rs 0.00");
        assert_eq!(format_npr(Decimal::new(999, 1)), "Rs 99.90");
    }

    #[test]
    fn test_format_npr_thousands_grouping() {
        assert_eq!(format_npr(Decimal::new(4999, 0)), "Rs 4,999.00");
        assert_eq!(format_npr(Decimal::new(12_345_675, 1)), "Rs 1,234,567.50");
    }

    #[test]
    fn test_format_npr_negative() {
        assert_eq!(format_npr(Decimal::new(-1500, 0)), "Rs -1,500.00");
    }

    #[test]
    fn test_format_npr_rounds_to_two_places() {
        assert_eq!(format_npr(Decimal::new(10_006, 3)), "Rs 10.01");
    }
}
