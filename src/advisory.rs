//! Small craft advisory and caution detection.
//!
//! Advisories are usually headlined once for the whole zone rather than per
//! period, so the flags are computed over the full zone text.

use crate::period::collapse_whitespace;
use crate::AdvisoryFlags;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

fn advisory_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bSMALL\W+CRAFT\W+ADVISORY\b").expect("advisory pattern should be valid")
    })
}

// NOAA's own wording is "small craft should exercise caution"
fn caution_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bSMALL\W+CRAFT\W+(?:SHOULD\W+EXERCISE\W+)?CAUTION\b")
            .expect("caution pattern should be valid")
    })
}

fn headline_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*\.\.\.(?P<text>[^.][^\n]*(?:\n[^\n.][^\n]*)*?)\.\.\.")
            .expect("headline pattern should be valid")
    })
}

/// Byte ranges of every `...HEADLINE...` statement, closing dots included.
///
/// Headlines can wrap so that a continuation line reads like a period
/// header (`TONIGHT...`); the classifier skips matches inside these spans.
pub fn headline_spans(text: &str) -> Vec<Range<usize>> {
    headline_regex().find_iter(text).map(|m| m.range()).collect()
}

/// Set the advisory and caution flags independently.
pub fn flag(text: &str) -> AdvisoryFlags {
    AdvisoryFlags {
        advisory: advisory_regex().is_match(text),
        caution: caution_regex().is_match(text),
    }
}

/// First `...HEADLINE...` statement that mentions an advisory or caution.
pub fn headline(text: &str) -> Option<String> {
    headline_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.name("text"))
        .map(|m| collapse_whitespace(m.as_str()))
        .find(|h| {
            let upper = h.to_ascii_uppercase();
            upper.contains("ADVISORY") || upper.contains("CAUTION")
        })
}
