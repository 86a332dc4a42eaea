// src/numfmt.rs

use thiserror::Error;

/// A numeric field could not be parsed in the report's locale format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("empty numeric field")]
    Empty,
    #[error("not a number: '{0}'")]
    NotANumber(String),
}

/// Parse a locale-formatted number: comma as the decimal separator,
/// dot or space as thousands separators ("1.234,56", "89,16").
pub fn parse(text: &str) -> Result<f64, FormatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FormatError::Empty);
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != '.' && *c != ' ')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    // f64::from_str also accepts exponents and "inf"/"NaN"; none of
    // those are valid report values, so validate the shape first.
    let digits = normalized.strip_prefix('-').unwrap_or(&normalized);
    let plausible = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|c| *c == '.').count() <= 1;
    if !plausible {
        return Err(FormatError::NotANumber(trimmed.to_string()));
    }

    normalized
        .parse::<f64>()
        .map_err(|_| FormatError::NotANumber(trimmed.to_string()))
}

/// Render a value back into the locale convention with exactly two
/// decimal digits ("1234.5" becomes "1.234,50").
pub fn format(value: f64) -> String {
    format_decimals(value, 2)
}

/// Variable-precision variant; percentage columns use six decimals.
pub fn format_decimals(value: f64, decimals: usize) -> String {
    let rendered = format!("{value:.decimals$}");
    let (int_part, dec_part) = match rendered.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (rendered.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    match dec_part {
        Some(d) => format!("{sign}{grouped},{d}"),
        None => format!("{sign}{grouped}"),
    }
}
