//! # Marine Forecast Core Library
//!
//! This library turns NOAA Coastal Waters Forecast (CWF) bulletins into flat,
//! newsroom-friendly rows. A CWF is semi-free-form prose:
//!
//! ```text
//! .TODAY...East winds 15 to 20 kt. Seas 3 to 5 ft. Intracoastal
//! waters a moderate chop.
//! .TONIGHT...East winds 10 to 15 kt. Seas 2 to 4 ft.
//! ```
//!
//! and the job is to recover wind, seas, bay/intracoastal conditions and
//! small craft flags from it without ever refusing to produce a row.
//!
//! ## Data Flow
//! 1. **Fetch**: download the product page, strip HTML, cut out one zone ([`bulletin`])
//! 2. **Classify**: split the zone text into period blocks and keep the relevant ones ([`period`])
//! 3. **Extract**: pull wind/gust/seas/nearshore fields from each block ([`extract`])
//! 4. **Flag**: scan the whole zone text for small craft wording ([`advisory`])
//! 5. **Assemble**: one [`OutputRow`] per (zone, period) ([`assemble`])
//! 6. **Write**: CSV with a fixed header ([`output`])
//!
//! ## Degraded Extraction
//! Missing values are `None`, never zero. A bulletin whose headers cannot be
//! recognised still yields a single `UNKNOWN` row, so the advisory flags reach
//! downstream consumers even when the prose parsing fails.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

pub mod advisory;
pub mod assemble;
pub mod bulletin;
pub mod config;
pub mod extract;
pub mod output;
pub mod period;
pub mod pipeline;

pub use period::{ForecastPeriod, PeriodLabel};

/// One zone's forecast text as retrieved from NOAA.
///
/// `text` is already reduced to the zone's own block of the multi-zone
/// product (see [`bulletin::zone_block`]).
#[derive(Clone, Debug)]
pub struct Bulletin {
    /// Zone identifier as configured (e.g. `AMZ651`)
    pub zone: String,
    /// Local time the product was retrieved
    pub fetched_at: DateTime<Local>,
    /// Plain text of the zone block
    pub text: String,
}

impl Bulletin {
    pub fn new(zone: impl Into<String>, fetched_at: DateTime<Local>, text: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            fetched_at,
            text: text.into(),
        }
    }
}

/// Eight-point compass sector used for wind direction, plus NOAA's
/// "variable" winds.
///
/// # Example
/// ```
/// use marine_forecast_lib::CompassSector;
///
/// assert_eq!(CompassSector::from_token("northeast"), Some(CompassSector::NorthEast));
/// assert_eq!(CompassSector::from_token("SW"), Some(CompassSector::SouthWest));
/// assert_eq!(CompassSector::from_token("NNE"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CompassSector {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
    #[serde(rename = "VRB")]
    Variable,
}

impl CompassSector {
    /// Parse an abbreviation (`NE`) or spelled name (`Northeast`), any case.
    pub fn from_token(token: &str) -> Option<Self> {
        let sector = match token.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Self::North,
            "NE" | "NORTHEAST" => Self::NorthEast,
            "E" | "EAST" => Self::East,
            "SE" | "SOUTHEAST" => Self::SouthEast,
            "S" | "SOUTH" => Self::South,
            "SW" | "SOUTHWEST" => Self::SouthWest,
            "W" | "WEST" => Self::West,
            "NW" | "NORTHWEST" => Self::NorthWest,
            "VRB" | "VARIABLE" => Self::Variable,
            _ => return None,
        };
        Some(sector)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
            Self::Variable => "VRB",
        }
    }
}

impl fmt::Display for CompassSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric range as NOAA states it ("10 to 15 kt", "3 ft").
///
/// Always ordered so that `low <= high`; a single stated value gives
/// `low == high`.
///
/// # Example
/// ```
/// use marine_forecast_lib::ValueRange;
///
/// let r = ValueRange::new(15, 10);
/// assert_eq!((r.low, r.high), (10, 15));
/// assert_eq!(ValueRange::single(3), ValueRange::new(3, 3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueRange {
    pub low: u8,
    pub high: u8,
}

impl ValueRange {
    pub fn new(a: u8, b: u8) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn single(value: u8) -> Self {
        Self::new(value, value)
    }
}

/// Normalised fields pulled from one period block.
///
/// Every field is optional: `None` means "not reported or not recognised",
/// which is deliberately distinct from a reported zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForecastFields {
    /// Prevailing wind sector (first direction stated)
    pub wind_dir: Option<CompassSector>,
    /// Sustained wind speed in knots
    pub wind_speed: Option<ValueRange>,
    /// Gust speed in knots
    pub gust: Option<u8>,
    /// Sea height in feet
    pub seas: Option<ValueRange>,
    /// Intracoastal/nearshore clause, verbatim
    pub nearshore: Option<String>,
}

impl ForecastFields {
    /// True when both wind speed and seas were recovered.
    pub fn is_complete(&self) -> bool {
        self.wind_speed.is_some() && self.seas.is_some()
    }

    /// True when nothing at all was recovered.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Small craft flags for one zone bulletin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvisoryFlags {
    pub advisory: bool,
    pub caution: bool,
}

/// One CSV line: a (zone, period) pair with its fields and flags.
///
/// Field order here is the CSV column order; see [`output::COLUMNS`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub zone: String,
    pub period: PeriodLabel,
    pub wind_dir: Option<CompassSector>,
    pub wind_speed_low: Option<u8>,
    pub wind_speed_high: Option<u8>,
    pub gust: Option<u8>,
    pub sea_low: Option<u8>,
    pub sea_high: Option<u8>,
    pub nearshore_note: Option<String>,
    pub advisory: bool,
    pub caution: bool,
}
