//! String conventions of the sportdata draws pages.
//!
//! Every function here is pure and fails with an explicit error when the
//! text does not have the documented shape.

use crate::utils::error::{EtlError, Result};

const HEADER_SEPARATOR: &str = " - ";

/// Splits a `"<tournament> - <category>"` page header.
///
/// The header may end with a colon and whitespace; those are stripped first.
/// The split happens on the last `" - "` since tournament names contain the
/// separator themselves (`"Karate1 Premier League - Salzburg 2020"`).
pub fn split_header(text: &str) -> Result<(String, String)> {
    let header = text
        .trim_start()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ';' | ',' | '.'));

    match header.rsplit_once(HEADER_SEPARATOR) {
        Some((tournament, category)) => Ok((tournament.to_string(), category.to_string())),
        None => Err(EtlError::malformed(format!(
            "page header {:?} has no {:?} separator",
            text, HEADER_SEPARATOR
        ))),
    }
}

/// Parses `"<name> (<city>, <country>)"` into the name and the country code.
pub fn parse_competitor(text: &str) -> Result<(String, String)> {
    let text = text.trim();
    let (name, origin) = text.split_once(" (").ok_or_else(|| {
        EtlError::malformed(format!("competitor {:?} has no \"(city, country)\" part", text))
    })?;
    let (_, country) = origin.rsplit_once(',').ok_or_else(|| {
        EtlError::malformed(format!("competitor {:?} has no country after a comma", text))
    })?;

    let name = name.trim();
    let nationality = country.strip_suffix(')').unwrap_or(country).trim();
    if name.is_empty() || nationality.is_empty() {
        return Err(EtlError::malformed(format!(
            "competitor {:?} has an empty name or nationality",
            text
        )));
    }

    Ok((name.to_string(), nationality.to_string()))
}

/// Returns the text between the first and second `:` of a pool heading row.
pub fn pool_label(text: &str) -> Result<String> {
    text.split(':')
        .nth(1)
        .map(|label| label.trim().to_string())
        .ok_or_else(|| EtlError::malformed(format!("pool heading {:?} has no ':'", text)))
}

/// Converts a grade or score written with a decimal comma (`"8,5"`).
///
/// Accepted shape: digits, optionally followed by one separator (comma or
/// dot) and more digits. Everything else is a conversion error, never zero.
pub fn parse_decimal(text: &str, field: &str) -> Result<f64> {
    let conversion_error = || EtlError::NumericConversion {
        field: field.to_string(),
        value: text.to_string(),
    };

    let normalized = text.trim().replace(',', ".");
    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (normalized.as_str(), None),
    };

    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    let well_formed = match fraction {
        Some(fraction) => {
            !whole.is_empty() && !fraction.is_empty() && all_digits(whole) && all_digits(fraction)
        }
        None => !whole.is_empty() && all_digits(whole),
    };
    if !well_formed {
        return Err(conversion_error());
    }

    normalized.parse::<f64>().map_err(|_| conversion_error())
}
