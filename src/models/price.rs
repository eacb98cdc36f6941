use crate::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Renders `value` with at most `precision` decimal places, truncating toward zero.
/// Never produces scientific notation.
pub fn format_fixed(value: f64, precision: u32) -> Result<String> {
    let decimal = to_decimal(value)?;
    Ok(decimal
        .round_dp_with_strategy(precision, RoundingStrategy::ToZero)
        .to_string())
}

/// Renders `value` in plain positional notation using the shortest digits that
/// round-trip.
pub fn format_plain(value: f64) -> Result<String> {
    Ok(to_decimal(value)?.normalize().to_string())
}

fn to_decimal(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(Error::invalid_input(format!("{value} is not a finite number")));
    }
    // f64 Display is the shortest round-trip form and never uses an exponent.
    value
        .to_string()
        .parse::<Decimal>()
        .map_err(|err| Error::invalid_input(format!("{value} has no decimal form: {err}")))
}
