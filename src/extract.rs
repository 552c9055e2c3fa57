//! # Field Extraction
//!
//! Pattern-anchored extraction of wind, gust, seas and intracoastal
//! conditions from one period block. NOAA's wording drifts from office to
//! office and year to year, so each field has its own rule and a rule that
//! does not match leaves only its own field empty.
//!
//! Typical inputs:
//! - `East winds 15 to 20 kt with gusts to 25 kt.` (Miami)
//! - `Southeast to south winds near 10 knots.` (Key West)
//! - `WIND...N 10 TO 15 KT.` (older tabular style)
//! - `Seas 3 to 5 ft, occasionally to 7 ft.`
//! - `Intracoastal waters a moderate chop.`

use crate::{CompassSector, ForecastFields, ValueRange};
use regex::{Captures, Regex};
use std::sync::OnceLock;

const DIR: &str = r"NORTHEAST|NORTHWEST|SOUTHEAST|SOUTHWEST|NORTH|SOUTH|EAST|WEST|VARIABLE|NE|NW|SE|SW|N|S|E|W";
const SPEED: &str = r"(?:AROUND\s+|NEAR\s+|UP\s+TO\s+|LESS\s+THAN\s+)?(?P<low>\d{1,3})(?:\s*(?:TO|-)\s*(?P<high>\d{1,3}))?\s*(?:KT|KTS|KNOTS?)\b";

/// `East winds 15 to 20 kt`, `north to northeast winds around 10 knots`
fn wind_before_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)\b(?P<dir>{DIR})(?:\s+TO\s+(?:{DIR}))?\s+WINDS?\s+{SPEED}");
        Regex::new(&pattern).expect("wind pattern should be valid")
    })
}

/// `WIND...N 10 TO 15 KT`, `winds east 10 kt`
fn wind_after_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"(?i)\bWINDS?(?:\s*\.\.\.\s*|\s+)(?P<dir>{DIR})(?:\s+TO\s+(?:{DIR}))?\s+{SPEED}"
        );
        Regex::new(&pattern).expect("wind pattern should be valid")
    })
}

fn gust_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bGUST(?:S|ING)?\s+(?:UP\s+TO\s+|TO\s+|OF\s+|NEAR\s+|AROUND\s+)?(?P<gust>\d{1,3})\b")
            .expect("gust pattern should be valid")
    })
}

fn seas_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\bSEAS(?:\s*\.\.\.\s*|\s+)(?:AROUND\s+|NEAR\s+|UP\s+TO\s+|LESS\s+THAN\s+)?(?P<low>\d{1,2})(?:\s*(?:TO|-)\s*(?P<high>\d{1,2}))?\s*(?:FT|FEET|FOOT)\b",
        )
        .expect("seas pattern should be valid")
    })
}

fn nearshore_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:INTRACOASTAL|NEARSHORE)\s+WATERS\s+(?:WILL\s+BE\s+|ARE\s+)?(?P<note>[^.]+)")
            .expect("nearshore pattern should be valid")
    })
}

fn number(caps: &Captures<'_>, name: &str) -> Option<u8> {
    caps.name(name)?.as_str().parse().ok()
}

fn range(caps: &Captures<'_>) -> Option<ValueRange> {
    let low = number(caps, "low")?;
    let high = number(caps, "high").unwrap_or(low);
    Some(ValueRange::new(low, high))
}

/// Wind sector and sustained speed, from whichever wording matches first.
///
/// Both come back or neither does; a clause whose speed cannot be read is
/// treated as unrecognised.
pub fn extract_wind(block: &str) -> (Option<CompassSector>, Option<ValueRange>) {
    let caps = [wind_before_regex(), wind_after_regex()]
        .into_iter()
        .filter_map(|re| re.captures(block))
        .min_by_key(|caps| caps.get(0).map(|m| m.start()).unwrap_or(usize::MAX));

    let Some(caps) = caps else {
        return (None, None);
    };
    match range(&caps) {
        Some(speed) => {
            let dir = caps
                .name("dir")
                .and_then(|m| CompassSector::from_token(m.as_str()));
            (dir, Some(speed))
        }
        None => (None, None),
    }
}

/// Gust speed; "gusts to", "gusts up to" and "gusting to" are equivalent.
pub fn extract_gust(block: &str) -> Option<u8> {
    let caps = gust_regex().captures(block)?;
    number(&caps, "gust")
}

/// Sea height range anchored on the `seas` keyword.
pub fn extract_seas(block: &str) -> Option<ValueRange> {
    let caps = seas_regex().captures(block)?;
    range(&caps)
}

/// Intracoastal or nearshore clause, trimmed but otherwise verbatim.
pub fn extract_nearshore(block: &str) -> Option<String> {
    let caps = nearshore_regex().captures(block)?;
    let note = caps.name("note")?.as_str().trim();
    (!note.is_empty()).then(|| note.to_string())
}

/// Extract every field from one period block.
pub fn extract(block: &str) -> ForecastFields {
    let (wind_dir, wind_speed) = extract_wind(block);
    ForecastFields {
        wind_dir,
        wind_speed,
        gust: extract_gust(block),
        seas: extract_seas(block),
        nearshore: extract_nearshore(block),
    }
}
