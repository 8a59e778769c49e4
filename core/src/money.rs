// shopfront/src/money.rs

//! Conversions between admin-entered decimal prices and integer minor units.

use crate::error::ShopError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses a major-unit amount such as `"12.5"` into minor units (`1250`),
/// rounding half away from zero to two decimal places.
pub fn parse_major_units(input: &str) -> Result<i64, ShopError> {
  let trimmed = input.trim();
  let amount = Decimal::from_str(trimmed)
    .map_err(|_| ShopError::Validation(format!("'{}' is not a valid price.", trimmed)))?;

  amount
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    .checked_mul(Decimal::ONE_HUNDRED)
    .and_then(|cents| cents.to_i64())
    .ok_or_else(|| ShopError::Validation(format!("'{}' is out of range.", trimmed)))
}

/// Renders minor units as a dollar string, e.g. `2200` -> `"$22.00"`.
pub fn format_minor_units(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_and_rounds_prices() {
    assert_eq!(parse_major_units("12.50").unwrap(), 1250);
    assert_eq!(parse_major_units(" 5 ").unwrap(), 500);
    assert_eq!(parse_major_units("0.005").unwrap(), 1);
    assert_eq!(parse_major_units("19.994").unwrap(), 1999);
  }

  #[test]
  fn rejects_garbage() {
    assert!(matches!(parse_major_units("ten dollars"), Err(ShopError::Validation(_))));
    assert!(matches!(parse_major_units(""), Err(ShopError::Validation(_))));
  }

  #[test]
  fn huge_amounts_are_out_of_range() {
    let err = parse_major_units("79228162514264337593543950335").unwrap_err();
    assert_eq!(err.user_message(), "'79228162514264337593543950335' is out of range.");
    assert!(matches!(parse_major_units("92233720368547758.08"), Err(ShopError::Validation(_))));
  }

  #[test]
  fn formats_cents() {
    assert_eq!(format_minor_units(2200), "$22.00");
    assert_eq!(format_minor_units(5), "$0.05");
    assert_eq!(format_minor_units(-150), "-$1.50");
  }
}
