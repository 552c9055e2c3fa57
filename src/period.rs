//! # Forecast Period Classification
//!
//! A CWF zone block is a run of period paragraphs, each opened by an
//! uppercase header at the start of a line:
//!
//! ```text
//! .REST OF TODAY...East winds 15 to 20 kt. Seas 3 to 5 ft.
//! .TONIGHT...East winds 10 to 15 kt. Seas 2 to 4 ft.
//! .SUN...Southeast winds 10 kt. Seas 2 to 3 ft.
//! .SUN NIGHT...
//! .MON THROUGH TUE...
//! ```
//!
//! Miami uses three-letter weekday names, Key West spells them out. Headers
//! are matched case-sensitively; prose mentioning "tonight" in lowercase is
//! never mistaken for a header.
//!
//! Which periods matter depends on the time of day: before the cutover hour
//! the newsroom wants today and tonight, from the cutover on it wants
//! tomorrow and tomorrow night.

use crate::advisory;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Calendar label assigned to a period block relative to "now".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PeriodLabel {
    #[serde(rename = "TODAY")]
    Today,
    #[serde(rename = "TONIGHT")]
    Tonight,
    #[serde(rename = "TOMORROW")]
    Tomorrow,
    #[serde(rename = "TOMORROW NIGHT")]
    TomorrowNight,
    /// Beyond tomorrow night; never reported
    #[serde(rename = "LATER")]
    Later,
    /// No recognisable header anywhere in the bulletin
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl PeriodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "TODAY",
            Self::Tonight => "TONIGHT",
            Self::Tomorrow => "TOMORROW",
            Self::TomorrowNight => "TOMORROW NIGHT",
            Self::Later => "LATER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether a period with this label is reported at the given side of
    /// the cutover hour.
    pub fn is_relevant(&self, before_cutover: bool) -> bool {
        match self {
            Self::Today | Self::Tonight => before_cutover,
            Self::Tomorrow | Self::TomorrowNight => !before_cutover,
            Self::Later => false,
            Self::Unknown => true,
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labelled slice of a bulletin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForecastPeriod {
    pub label: PeriodLabel,
    /// Header exactly as written, without dots (e.g. `SAT NIGHT`); empty for `UNKNOWN`
    pub header: String,
    /// Block text with line breaks collapsed
    pub text: String,
}

impl ForecastPeriod {
    /// The degraded period covering a whole bulletin, text untouched.
    pub fn unknown(text: &str) -> Self {
        Self {
            label: PeriodLabel::Unknown,
            header: String::new(),
            text: text.to_string(),
        }
    }
}

const DAY: &str = "(?:MONDAY|TUESDAY|WEDNESDAY|THURSDAY|FRIDAY|SATURDAY|SUNDAY|MON|TUE|WED|THU|FRI|SAT|SUN)";

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let day_span = format!("{DAY}(?: NIGHT)?(?: THROUGH {DAY}(?: NIGHT)?)?");
        let pattern = format!(
            r"(?m)^[ \t]*\.?(?P<name>REST OF TODAY|REST OF TONIGHT|THIS MORNING|THIS AFTERNOON|THIS EVENING|TOMORROW NIGHT|TOMORROW|TODAY|TONIGHT|OVERNIGHT|{day_span})\.\.\."
        );
        Regex::new(&pattern).expect("period header pattern should be valid")
    })
}

/// Label a header name relative to today's weekday.
fn label_for(name: &str, today: Weekday) -> PeriodLabel {
    match name {
        "TODAY" | "REST OF TODAY" | "THIS MORNING" | "THIS AFTERNOON" => return PeriodLabel::Today,
        "TONIGHT" | "REST OF TONIGHT" | "THIS EVENING" | "OVERNIGHT" => return PeriodLabel::Tonight,
        "TOMORROW" => return PeriodLabel::Tomorrow,
        "TOMORROW NIGHT" => return PeriodLabel::TomorrowNight,
        _ => {}
    }

    // Multi-day spans only show up in the extended outlook
    if name.contains(" THROUGH ") {
        return PeriodLabel::Later;
    }

    let (day, night) = match name.strip_suffix(" NIGHT") {
        Some(day) => (day, true),
        None => (name, false),
    };
    let Ok(weekday) = day.parse::<Weekday>() else {
        return PeriodLabel::Later;
    };

    match (weekday, night) {
        (w, false) if w == today => PeriodLabel::Today,
        (w, true) if w == today => PeriodLabel::Tonight,
        (w, false) if w == today.succ() => PeriodLabel::Tomorrow,
        (w, true) if w == today.succ() => PeriodLabel::TomorrowNight,
        _ => PeriodLabel::Later,
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a bulletin into every headed period, labelled against `now`.
///
/// Text before the first header (synopsis, headlines) is dropped, and a
/// header-looking line inside a wrapped `...headline...` is not a header.
/// Returns an empty vector when no header is recognised.
pub fn split_periods(now: NaiveDateTime, text: &str) -> Vec<ForecastPeriod> {
    let today = now.weekday();
    let headlines = advisory::headline_spans(text);
    let headers: Vec<_> = header_regex()
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?, caps.name("name")?)))
        .filter(|(whole, _)| !headlines.iter().any(|span| span.contains(&whole.start())))
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, (whole, name))| {
            let end = headers
                .get(i + 1)
                .map(|(next, _)| next.start())
                .unwrap_or(text.len());
            ForecastPeriod {
                label: label_for(name.as_str(), today),
                header: name.as_str().to_string(),
                text: collapse_whitespace(&text[whole.end()..end]),
            }
        })
        .collect()
}

/// Return the periods worth reporting at `now`, in bulletin order.
///
/// Before `cutover_hour` that is today and tonight; from the cutover on it
/// is tomorrow and tomorrow night. A bulletin with no recognisable header
/// comes back as a single `UNKNOWN` period spanning the whole input.
pub fn classify(now: NaiveDateTime, text: &str, cutover_hour: u32) -> Vec<ForecastPeriod> {
    let periods = split_periods(now, text);
    if periods.is_empty() {
        return vec![ForecastPeriod::unknown(text)];
    }

    let before_cutover = now.hour() < cutover_hour;
    periods
        .into_iter()
        .filter(|p| p.label.is_relevant(before_cutover))
        .collect()
}
