use super::dto::ColumnRole;
use crate::domain::pincode::value_objects::normalize_pincode;
use crate::domain::zone::value_objects::ZoneCode;

/// Header words per role. Matched against whole words of the header, with
/// camelCase and punctuation split apart.
const HEADER_KEYWORDS: &[(ColumnRole, &[&str])] = &[
    (
        ColumnRole::Pincode,
        &["pincode", "pin", "pincodes", "postal", "postcode", "zip", "zipcode"],
    ),
    (ColumnRole::Zone, &["zone", "zones", "region", "zonecode"]),
    (ColumnRole::Oda, &["oda", "remote", "isoda"]),
    (ColumnRole::State, &["state", "province", "statename"]),
    (ColumnRole::City, &["city", "district", "town", "cityname"]),
];

const TRUE_TOKENS: &[&str] = &["true", "yes", "y", "1", "t"];
const FALSE_TOKENS: &[&str] = &["false", "no", "n", "0", "f"];

/// Role named by a header cell, if any.
pub fn header_role(header: &str) -> Option<ColumnRole> {
    let words = header_words(header);
    let compact: String = words.concat();
    HEADER_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|k| words.iter().any(|w| w == k) || compact == *k)
        })
        .map(|(role, _)| *role)
}

/// Lowercase words of a header: `"isOda"` → `["is", "oda"]`,
/// `"Pin_Code"` → `["pin", "code"]`.
fn header_words(header: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in header.trim().chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// A cell that reads like a column title rather than data: several words
/// of text that is neither a known state nor any recognisable value.
pub fn looks_like_label(cell: &str, is_known_state: &dyn Fn(&str) -> bool) -> bool {
    let cell = cell.trim();
    cell.chars().count() >= 12
        && cell.contains(' ')
        && cell.chars().filter(|c| c.is_alphabetic()).count() * 2 > cell.chars().count()
        && !is_known_state(cell)
}

pub fn looks_like_pincode(value: &str) -> bool {
    normalize_pincode(value).is_some()
}

pub fn looks_like_zone(value: &str) -> bool {
    ZoneCode::parse(value).is_some()
}

pub fn parse_bool(value: &str) -> Option<bool> {
    let token = value.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Whether a sample value supports `role`. City columns have no value
/// predicate and are only found by header.
pub fn matches_role(role: ColumnRole, value: &str, is_known_state: &dyn Fn(&str) -> bool) -> bool {
    match role {
        ColumnRole::Pincode => looks_like_pincode(value),
        ColumnRole::Zone => looks_like_zone(value),
        ColumnRole::Oda => parse_bool(value).is_some(),
        ColumnRole::State => is_known_state(value),
        ColumnRole::City => false,
    }
}
