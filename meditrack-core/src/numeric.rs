//! Lenient number parsing for values typed into form fields.
//!
//! Form inputs reach the core as raw text. Two readings are used:
//! a *leading* reading that takes the numeric prefix and ignores whatever
//! follows (`"72 lpm"` reads as 72), and a *strict* reading that accepts the
//! value only when the whole (trimmed) text is a number.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Numeric prefix of `raw` after leading whitespace, or `None` when the
/// prefix holds no digit.
pub fn leading_number_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut digits = int_digits;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 {
            end += 1 + frac_digits;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    Some(&trimmed[..end])
}

/// Leading reading as a float.
pub fn leading_number(raw: &str) -> Option<f64> {
    leading_number_text(raw)?.parse::<f64>().ok()
}

/// Leading reading as a fixed-point decimal.
pub fn leading_decimal(raw: &str) -> Option<Decimal> {
    decimal_from_text(leading_number_text(raw)?)
}

/// Integer prefix of `raw`; a fractional part or exponent is ignored
/// (`"72.9"` reads as 72).
pub fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    trimmed[..sign + digits].parse::<i64>().ok()
}

/// Strict reading: the trimmed text must be a number in its entirety. A
/// trailing dot with no fraction is accepted (`"70."` reads as 70).
pub fn strict_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let prefix = leading_number_text(trimmed)?;
    let rest = &trimmed[prefix.len()..];
    let bare_dot = rest == "." && !prefix.contains(['.', 'e', 'E']);
    if !rest.is_empty() && !bare_dot {
        return None;
    }
    decimal_from_text(prefix)
}

/// Rounds half away from zero and always renders two fractional digits.
pub fn two_decimals(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn decimal_from_text(text: &str) -> Option<Decimal> {
    let unsigned = text.strip_prefix('+').unwrap_or(text);
    let (negative, body) = match unsigned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, unsigned),
    };

    let body = if body.starts_with('.') {
        format!("0{body}")
    } else {
        body.to_string()
    };

    let magnitude = if body.contains(['e', 'E']) {
        Decimal::from_scientific(&body.to_lowercase()).ok()?
    } else {
        Decimal::from_str(&body).ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}
