use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

lazy_static! {
    /// Direction prefix plus optional sub-zone number, or one of the
    /// catch-all codes used by vendors (`ROI`, `A`, `X<n>`).
    static ref ZONE_REGEX: Regex =
        Regex::new(r"^(?:(NE|NW|SE|SW|N|S|E|W|C)(\d{1,2})?|ROI|A|X(\d+))$").unwrap();
}

/// Prefix order used when sorting zone codes for display.
const PREFIX_ORDER: &[&str] = &["N", "S", "E", "W", "C", "NE", "NW", "SE", "SW", "X", "ROI", "A"];

/// A normalized pricing zone code such as `N1`, `NE2` or `X1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ZoneCode(String);

impl ZoneCode {
    /// Normalizes a raw token (`" n-1 "`, `"Zone N1"`) and validates it
    /// against the zone grammar.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut token: String = raw
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();
        if let Some(stripped) = token.strip_prefix("ZONE") {
            token = stripped.to_string();
        }
        if ZONE_REGEX.is_match(&token) {
            Some(Self(token))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Letter prefix of the code (`NE` for `NE2`, `ROI` for `ROI`).
    pub fn prefix(&self) -> &str {
        let end = self
            .0
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// Numeric sub-zone suffix, `0` when absent.
    pub fn number(&self) -> u32 {
        self.0[self.prefix().len()..].parse().unwrap_or(0)
    }

    fn sort_key(&self) -> (usize, u32) {
        let rank = PREFIX_ORDER
            .iter()
            .position(|p| *p == self.prefix())
            .unwrap_or(PREFIX_ORDER.len());
        (rank, self.number())
    }
}

impl Ord for ZoneCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ZoneCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic grouping of zones. Declaration order is the display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
    NorthEast,
    /// Islands and territories; exempt from sequential selection.
    Special,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::Central,
        Region::NorthEast,
        Region::Special,
    ];

    /// Whether zones in this region must be selected front-to-back.
    pub fn is_sequential(self) -> bool {
        self != Region::Special
    }

    /// Region implied by a zone code's direction prefix, if any.
    pub fn from_zone_prefix(code: &ZoneCode) -> Option<Self> {
        match code.prefix() {
            "N" => Some(Region::North),
            "S" => Some(Region::South),
            "E" => Some(Region::East),
            "W" => Some(Region::West),
            "C" => Some(Region::Central),
            "NE" => Some(Region::NorthEast),
            "X" => Some(Region::Special),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
            Region::Central => "Central",
            Region::NorthEast => "NorthEast",
            Region::Special => "Special",
        };
        f.write_str(name)
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "north" | "n" => Ok(Region::North),
            "south" | "s" => Ok(Region::South),
            "east" | "e" => Ok(Region::East),
            "west" | "w" => Ok(Region::West),
            "central" | "c" => Ok(Region::Central),
            "northeast" | "ne" => Ok(Region::NorthEast),
            "special" | "x" | "islands" => Ok(Region::Special),
            _ => Err(format!("Unknown region '{}'", s)),
        }
    }
}

/// How a zone claims territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ZoneKind {
    /// Only specific named cities within its states.
    Limited,
    /// Whole states, minus cities carved out by limited zones.
    Full,
    /// Non-geographic code bound to one designated state.
    Special,
}
