//! Money calculation and input coercion
//!
//! All amounts are `Decimal`. Deductions are whole currency units: rounded
//! to the nearest integer with ties away from zero (`2.5 -> 3`,
//! `-2.5 -> -3`).
//!
//! Products of external values use saturating arithmetic, so oversized
//! prices or quantities cap at `Decimal::MAX` instead of overflowing.
//!
//! User and catalog input is coerced by named parse-or-default rules rather
//! than rejected:
//! - discount percent: number as-is, numeric string parsed, anything else 0;
//!   the result is clamped to `0..=100`
//! - quantity: leading integer, positive only, otherwise ignored
//! - deduction: leading number, otherwise 0

use rust_decimal::prelude::*;
use shared::DiscountInput;

/// Whole currency units
const DECIMAL_PLACES: u32 = 0;

/// Decimal places shown in formatted amounts
const DISPLAY_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite values become zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round to whole currency units, ties away from zero
#[inline]
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Discount percent as a number in `0..=100`
pub fn coerce_discount(input: Option<&DiscountInput>) -> Decimal {
    let raw = match input {
        Some(DiscountInput::Number(n)) => to_decimal(*n),
        Some(DiscountInput::Text(s)) => parse_float_prefix(s).unwrap_or_default(),
        Some(DiscountInput::Other(_)) | None => Decimal::ZERO,
    };
    raw.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Per-unit deduction: `round(unit_price × (1 − discount/100))`
pub fn unit_deduction(unit_price: Decimal, discount_percent: Decimal) -> Decimal {
    let discount = discount_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let factor = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
    round_currency(unit_price.saturating_mul(factor))
}

/// Deduction for `quantity` units: `round(unit_deduction × quantity)`
///
/// The per-unit amount is rounded first, so every unit costs the same whole
/// amount.
pub fn line_deduction(unit_price: Decimal, discount_percent: Decimal, quantity: u32) -> Decimal {
    let per_unit = unit_deduction(unit_price, discount_percent);
    round_currency(per_unit.saturating_mul(Decimal::from(quantity)))
}

/// Saturating sum
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Quantity from free text; `None` unless it is a positive integer
///
/// Like a lenient integer parse, trailing garbage after the digits is
/// ignored (`"3.7"` is 3, `"12 pcs"` is 12).
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 || negative {
        return None;
    }
    match digits[..end].parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(qty) => Some(qty),
    }
}

/// Manual deduction from free text; unparsable input becomes zero
pub fn parse_deduction(raw: &str) -> Decimal {
    parse_float_prefix(raw).unwrap_or_default()
}

/// Lenient float parse: the longest numeric prefix after leading whitespace
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent. `"10%"` parses as 10, `".5"` as 0.5, `"abc"` fails.
pub fn parse_float_prefix(raw: &str) -> Option<Decimal> {
    let s = raw.trim_start().as_bytes();
    let mut i = 0;
    if matches!(s.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if i < s.len() && s[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    // Exponent only counts when followed by at least one digit
    if i < s.len() && matches!(s[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < s.len() && matches!(s[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let text = std::str::from_utf8(&s[..i]).ok()?;
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(to_decimal))
}

/// Format with thousands separators and two decimals: `1,234.50 KES`
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let rounded =
        amount.round_dp_with_strategy(DISPLAY_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    if currency.is_empty() {
        format!("{}{}.{}", sign, grouped, frac_part)
    } else {
        format!("{}{}.{} {}", sign, grouped, frac_part, currency)
    }
}
