use rug::ops::Pow;
use rug::{Float, Integer};

/// Number of decimal digits `precision` bits can hold
pub fn max_digits(precision: u32) -> usize {
    // log10(2) ~ 0.30103
    let digits = u64::from(precision) * 30103 / 100_000 + 1;
    usize::try_from(digits).unwrap_or(usize::MAX)
}

/// Render `value` in fixed point with at most `digits` digits after the
/// decimal point, never more than its precision holds. Trailing zeros are
/// trimmed and integral values print without a decimal point.
pub fn render_decimal(value: &Float, digits: usize) -> String {
    let digits = digits.min(max_digits(value.prec()));
    if !value.is_finite() {
        return value.to_string();
    }
    if value.is_integer() {
        return value.to_integer().map_or_else(|| value.to_string(), |n| n.to_string());
    }

    let exponent = u32::try_from(digits).unwrap_or(u32::MAX);
    let scale = Integer::from(10).pow(exponent);
    // enough room for the scaled value to stay exact
    let precision = value.prec().saturating_add(exponent.saturating_mul(4)).saturating_add(8);
    let scaled = Float::with_val(precision, value * &scale);
    let rounded = match scaled.to_integer() {
        Some(rounded) => rounded,
        None => return value.to_string(),
    };
    if rounded == 0 {
        return "0".into();
    }

    let mut text = rounded.clone().abs().to_string();
    if text.len() <= digits {
        text.insert_str(0, &"0".repeat(digits + 1 - text.len()));
    }
    text.insert(text.len() - digits, '.');
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if rounded < 0 {
        format!("-{}", text)
    } else {
        text.to_owned()
    }
}
