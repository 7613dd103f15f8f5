//! Psychological price endings.
//!
//! Pure, deterministic functions from a raw converted amount to the
//! locally-conventional retail price. Inputs are always non-negative; every
//! rule is idempotent, so re-rounding an already rounded price is a no-op.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::domain::RoundingRule;

/// Currencies that render without decimal places.
const INTEGER_CURRENCIES: &[&str] = &["HUF", "CZK", "RSD", "CLP", "COP", "PYG", "CRC"];

/// Whether a currency renders with zero decimal places.
#[must_use]
pub fn is_integer_currency(currency: &str) -> bool {
    INTEGER_CURRENCIES.contains(&currency)
}

/// Apply a market's psychological-ending rule to a raw price.
#[must_use]
pub fn round(raw: Decimal, rule: RoundingRule) -> Decimal {
    match rule {
        RoundingRule::Ending99 => raw.floor() + dec!(0.99),
        RoundingRule::Ending95 => raw.floor() + dec!(0.95),
        RoundingRule::Ending00 => nearest_integer(raw),
        RoundingRule::Ending9Int => ending_9_int(raw),
        RoundingRule::Thousands => thousands(raw),
        RoundingRule::HufPattern => huf_pattern(raw),
        RoundingRule::Nordic5 => nearest_multiple(raw, dec!(5)),
    }
}

/// Format a rounded amount for display in a currency.
///
/// Integer-only currencies render with zero decimal places, everything else
/// with exactly two.
#[must_use]
pub fn format_price(amount: Decimal, currency: &str) -> String {
    if is_integer_currency(currency) {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Nearest integer, midpoint away from zero.
fn nearest_integer(raw: Decimal) -> Decimal {
    raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Nearest multiple of `step`, midpoint away from zero.
fn nearest_multiple(raw: Decimal, step: Decimal) -> Decimal {
    (raw / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step
}

/// Nearest integer ending in digit 9 at or below the input.
///
/// Inputs below 10 collapse to 9. A value already ending in 9 is returned
/// unchanged; anything else rounds down into the previous ending-in-9 value.
fn ending_9_int(raw: Decimal) -> Decimal {
    if raw < dec!(10) {
        return dec!(9);
    }
    let base = raw.floor();
    let last = base % dec!(10);
    if last == dec!(9) {
        base
    } else {
        base - last - Decimal::ONE
    }
}

/// Nearest multiple of 1000, floored at 1000 so the rule never produces 0.
fn thousands(raw: Decimal) -> Decimal {
    nearest_multiple(raw, dec!(1000)).max(dec!(1000))
}

/// HUF/CZK/RSD family: the ending narrows with the magnitude.
///
/// >= 10000 -> floor to thousand + 990; [1000, 10000) -> floor to hundred +
/// 90; below 1000 -> floor to ten + 9.
fn huf_pattern(raw: Decimal) -> Decimal {
    let base = raw.floor();
    if base >= dec!(10000) {
        (base / dec!(1000)).floor() * dec!(1000) + dec!(990)
    } else if base >= dec!(1000) {
        (base / dec!(100)).floor() * dec!(100) + dec!(90)
    } else {
        (base / dec!(10)).floor() * dec!(10) + dec!(9)
    }
}
