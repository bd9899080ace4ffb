//! Canonical number text.
//!
//! Exports are parsed by downstream tooling, so every double written into a
//! dump goes through [`format_double`]: ten fraction digits, upper-case `E`,
//! at least two exponent digits, and fixed tokens for the non-finite values.

use crate::error::{Error, Result};

/// Text for an unknown value.
pub const NAN_TOKEN: &str = "NaN";
/// Text for positive infinity.
pub const POS_INFINITY_TOKEN: &str = "Infinity";
/// Text for negative infinity.
pub const NEG_INFINITY_TOKEN: &str = "-Infinity";

const FRACTION_DIGITS: usize = 10;

fn non_finite_token(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NAN_TOKEN)
    } else if value == f64::INFINITY {
        Some(POS_INFINITY_TOKEN)
    } else if value == f64::NEG_INFINITY {
        Some(NEG_INFINITY_TOKEN)
    } else {
        None
    }
}

/// Canonical export form, e.g. `1.0000000000E02`, `-2.5000000000E-03`.
pub fn format_double(value: f64) -> String {
    if let Some(token) = non_finite_token(value) {
        return token.to_string();
    }
    let sci = format!("{:.*e}", FRACTION_DIGITS, value);
    // Rust renders `1.0000000000e2`; the exponent always parses
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { "-" } else { "" };
    format!("{}E{}{:02}", mantissa, sign, exponent.unsigned_abs())
}

/// Short human form used in diagnostic dumps, e.g. `42.5`, `1.0`, `NaN`.
///
/// Magnitudes in `[1e-3, 1e7)` and zero print as shortest decimals; anything
/// else switches to `1.0E7` / `1.5E-4` style, as dump readers expect.
pub fn format_double_plain(value: f64) -> String {
    if let Some(token) = non_finite_token(value) {
        return token.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", value);
    }
    let sci = format!("{:e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{}E{}", mantissa, exponent)
    } else {
        format!("{}.0E{}", mantissa, exponent)
    }
}

/// Parse number text produced by either formatter.
///
/// Also accepts `U` and `UNKN`, the conventional spellings of an unknown value.
pub fn parse_double(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed {
        "NaN" | "nan" | "U" | "UNKN" => Ok(f64::NAN),
        "Infinity" | "+Infinity" | "inf" | "+inf" => Ok(f64::INFINITY),
        "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
        _ => trimmed
            .parse::<f64>()
            .map_err(|_| Error::InvalidNumber(text.to_string())),
    }
}
