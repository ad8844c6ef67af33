//! Place-name normalization shared by the reference index, the blueprint
//! resolver and the ingestion pipeline.
//!
//! Every comparison between a state or city coming from different sources goes
//! through [`place_key`], which folds case, whitespace, `&`/`AND` spelling and
//! a static table of known aliases (renamed union territories, historical city
//! names). Names that are not in the alias table fall through unchanged apart
//! from the folding.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref PLACE_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // States and union territories
        m.insert("NCT OF DELHI", "DELHI");
        m.insert("NATIONAL CAPITAL TERRITORY OF DELHI", "DELHI");
        m.insert("ORISSA", "ODISHA");
        m.insert("PONDICHERRY", "PUDUCHERRY");
        m.insert("UTTARANCHAL", "UTTARAKHAND");
        m.insert("CHATTISGARH", "CHHATTISGARH");
        m.insert("TAMILNADU", "TAMIL NADU");
        m.insert("ANDAMAN AND NICOBAR", "ANDAMAN AND NICOBAR ISLANDS");
        m.insert("ANDAMAN NICOBAR", "ANDAMAN AND NICOBAR ISLANDS");
        m.insert("A AND N ISLANDS", "ANDAMAN AND NICOBAR ISLANDS");
        m.insert("DADRA AND NAGAR HAVELI", "DADRA AND NAGAR HAVELI AND DAMAN AND DIU");
        m.insert("DAMAN AND DIU", "DADRA AND NAGAR HAVELI AND DAMAN AND DIU");
        m.insert("J AND K", "JAMMU AND KASHMIR");
        // Historical city names
        m.insert("BANGALORE", "BENGALURU");
        m.insert("BOMBAY", "MUMBAI");
        m.insert("MADRAS", "CHENNAI");
        m.insert("CALCUTTA", "KOLKATA");
        m.insert("GURGAON", "GURUGRAM");
        m.insert("POONA", "PUNE");
        m.insert("TRIVANDRUM", "THIRUVANANTHAPURAM");
        m.insert("COCHIN", "KOCHI");
        m.insert("MYSORE", "MYSURU");
        m.insert("MANGALORE", "MANGALURU");
        m.insert("BARODA", "VADODARA");
        m.insert("ALLAHABAD", "PRAYAGRAJ");
        m.insert("BENARES", "VARANASI");
        m.insert("BANARAS", "VARANASI");
        m.insert("GAUHATI", "GUWAHATI");
        m.insert("PANJIM", "PANAJI");
        m.insert("SIMLA", "SHIMLA");
        m
    };
}

/// Placeholder values that reference tables use for "unknown".
const PLACEHOLDERS: &[&str] = &["", "NAN", "NA", "N/A", "NULL", "NONE", "-", "--"];

/// Uppercase comparison key for a state or city name.
pub fn place_key(raw: &str) -> String {
    let folded = fold(raw);
    match PLACE_ALIASES.get(folded.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => folded,
    }
}

/// Display form of a state or city name: alias-resolved and title-cased.
pub fn normalize_place_name(raw: &str) -> String {
    title_case(&place_key(raw))
}

/// Returns true for empty or sentinel values such as `NaN` or `N/A`.
pub fn is_placeholder(raw: &str) -> bool {
    let upper = raw.trim().to_uppercase();
    PLACEHOLDERS.contains(&upper.as_str())
}

fn fold(raw: &str) -> String {
    let replaced = raw.replace('&', " AND ").replace(['.', ','], " ");
    replaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn title_case(upper: &str) -> String {
    upper
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
