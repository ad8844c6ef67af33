use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref PINCODE_REGEX: Regex = Regex::new(r"^\d{6}$").unwrap();
    static ref SCIENTIFIC_REGEX: Regex =
        Regex::new(r"^[+]?\d+(\.\d+)?[eE][+]?\d+$").unwrap();
    static ref INTEGRAL_FLOAT_REGEX: Regex = Regex::new(r"^(\d+)\.0+$").unwrap();
}

/// A validated six-digit Indian postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct Pincode {
    #[validate(regex(path = *PINCODE_REGEX))]
    pub value: String,
}

impl Pincode {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let pincode = Self { value };
        pincode.validate()?;
        Ok(pincode)
    }

    /// Normalizes a raw cell value first, then validates it.
    pub fn parse(raw: &str) -> Option<Self> {
        normalize_pincode(raw).and_then(|value| Self::new(value).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Returns true if `value` is exactly six ASCII digits.
pub fn is_valid_pincode(value: &str) -> bool {
    PINCODE_REGEX.is_match(value)
}

/// Recovers a six-digit pincode from a dirty spreadsheet cell.
///
/// Spreadsheets routinely turn pincodes into floats (`110001.0`) or
/// scientific notation (`1.10001e+5`); both are resolved to their integer
/// value before digits are extracted. After stripping non-digits the value
/// must be exactly six digits, or a longer run whose first digit is 1-8, in
/// which case its first six digits are taken.
pub fn normalize_pincode(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let resolved = if SCIENTIFIC_REGEX.is_match(trimmed) {
        let value: f64 = trimmed.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        format!("{:.0}", value.round())
    } else if let Some(caps) = INTEGRAL_FLOAT_REGEX.captures(trimmed) {
        caps[1].to_string()
    } else {
        trimmed.to_string()
    };

    let digits: String = resolved.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        6 => Some(digits),
        n if n > 6 && matches!(digits.as_bytes()[0], b'1'..=b'8') => Some(digits[..6].to_string()),
        _ => None,
    }
}
