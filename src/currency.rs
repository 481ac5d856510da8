//! Localized currency parsing and formatting.
//!
//! Separators are passed in through a [`NumericFormat`] value instead of
//! being read from process-wide locale state, so the same input always parses
//! the same way for a given format.

use serde::Serialize;

use crate::error::FormatError;

/// Currency symbol and digit separators for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumericFormat {
    pub currency_symbol: char,
    pub decimal_separator: char,
    pub thousands_separator: Option<char>,
}

impl NumericFormat {
    /// `$1,234.56`
    pub const fn en_us() -> Self {
        NumericFormat {
            currency_symbol: '$',
            decimal_separator: '.',
            thousands_separator: Some(','),
        }
    }

    /// `$1.234,56`
    pub const fn de_de() -> Self {
        NumericFormat {
            currency_symbol: '$',
            decimal_separator: ',',
            thousands_separator: Some('.'),
        }
    }

    /// `$1234.56`, no grouping (the C/POSIX locale).
    pub const fn c() -> Self {
        NumericFormat {
            currency_symbol: '$',
            decimal_separator: '.',
            thousands_separator: None,
        }
    }

    /// Resolves a locale name such as `en_US` or `de-de`.
    pub fn from_locale(name: &str) -> Option<Self> {
        match name.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "en_us" => Some(Self::en_us()),
            "c" | "posix" => Some(Self::c()),
            "de_de" => Some(Self::de_de()),
            _ => None,
        }
    }
}

/// Parses a price such as `"$1,234.56"` into its amount.
///
/// Exactly one leading currency symbol is required. Thousands separators are
/// optional but, when present, must split the integer digits into groups of
/// three. A thousands separator after the decimal separator is rejected, which
/// is what makes `"$1,234.56"` fail under a format with flipped separators.
///
/// # Errors
///
/// Returns a [`FormatError`] describing the first violation found.
pub fn parse_price(input: &str, format: &NumericFormat) -> Result<f64, FormatError> {
    let invalid = |reason: &'static str| FormatError::InvalidNumber {
        input: input.to_string(),
        reason,
    };

    let amount = input
        .trim()
        .strip_prefix(format.currency_symbol)
        .ok_or_else(|| FormatError::MissingSymbol {
            input: input.to_string(),
            symbol: format.currency_symbol,
        })?;

    if amount.is_empty() {
        return Err(FormatError::Empty {
            input: input.to_string(),
        });
    }

    let (int_part, frac_part) = match amount.split_once(format.decimal_separator) {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (amount, None),
    };

    let mut normalized = String::with_capacity(amount.len() + 1);

    match format.thousands_separator {
        Some(sep) if int_part.contains(sep) => {
            let mut groups = int_part.split(sep);
            let first = groups.next().unwrap_or_default();
            if first.is_empty() || !all_digits(first) || first.len() > 3 {
                return Err(invalid("misplaced thousands separator"));
            }
            normalized.push_str(first);
            for group in groups {
                if group.len() != 3 || !all_digits(group) {
                    return Err(invalid("misplaced thousands separator"));
                }
                normalized.push_str(group);
            }
        }
        _ => {
            if int_part.is_empty() && frac_part.is_none() {
                return Err(invalid("no digits"));
            }
            if !all_digits(int_part) {
                return Err(invalid("unexpected character"));
            }
            normalized.push_str(if int_part.is_empty() { "0" } else { int_part });
        }
    }

    if let Some(frac) = frac_part {
        if frac.is_empty() {
            return Err(invalid("no digits after decimal separator"));
        }
        if !all_digits(frac) {
            let reason = if frac.contains(format.decimal_separator) {
                "multiple decimal separators"
            } else if format.thousands_separator.is_some_and(|sep| frac.contains(sep)) {
                "thousands separator after decimal separator"
            } else {
                "unexpected character"
            };
            return Err(invalid(reason));
        }
        normalized.push('.');
        normalized.push_str(frac);
    }

    let value: f64 = normalized.parse().map_err(|_| invalid("unparseable amount"))?;
    if !value.is_finite() {
        return Err(invalid("amount out of range"));
    }

    Ok(value)
}

/// Formats an amount with the currency symbol, thousands grouping and two decimals.
pub fn format_amount(amount: f64, format: &NumericFormat) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_digits, frac_digits) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 2);
    if amount < 0.0 {
        out.push('-');
    }
    out.push(format.currency_symbol);
    out.push_str(&group_digits(int_digits, format.thousands_separator));
    out.push(format.decimal_separator);
    out.push_str(frac_digits);
    out
}

fn group_digits(digits: &str, separator: Option<char>) -> String {
    let Some(sep) = separator else {
        return digits.to_string();
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
