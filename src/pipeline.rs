//! # Per-Zone Processing
//!
//! Wires the stages together for one bulletin (classify, flag, assemble)
//! and runs the configured zones one after another. A zone that cannot be
//! fetched is reported and skipped; it never stops the other zones.

use crate::advisory;
use crate::assemble::assemble;
use crate::bulletin::{self, FetchError};
use crate::config::Config;
use crate::period::classify;
use crate::{Bulletin, OutputRow};
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// Outcome of fetching and parsing every configured zone.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Rows from every zone that was fetched, zone order then period order
    pub rows: Vec<OutputRow>,
    /// Zones that produced no rows because the fetch failed, with the reason
    pub failures: Vec<(String, String)>,
    /// Number of zones tried
    pub attempted: usize,
}

impl RunSummary {
    /// True when zones were tried and none of them could be fetched.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failures.len() == self.attempted
    }
}

/// Turn one zone's text into rows. Pure apart from logging.
pub fn process_text(zone: &str, text: &str, now: NaiveDateTime, cutover_hour: u32) -> Vec<OutputRow> {
    let periods = classify(now, text, cutover_hour);
    if periods.is_empty() {
        warn!(zone = %zone, "bulletin has period headers but none for the current window");
    }

    let flags = advisory::flag(text);
    if let Some(headline) = advisory::headline(text) {
        info!(zone = %zone, %headline, "headline in effect");
    }

    assemble(zone, &periods, flags)
}

pub fn process_bulletin(bulletin: &Bulletin, now: NaiveDateTime, cutover_hour: u32) -> Vec<OutputRow> {
    info!(
        zone = %bulletin.zone,
        fetched_at = %bulletin.fetched_at.format("%Y-%m-%d %I:%M %p"),
        "parsing bulletin"
    );
    process_text(&bulletin.zone, &bulletin.text, now, cutover_hour)
}

/// Fetch and parse every configured zone in order.
///
/// Only a failure to build the HTTP client is returned as an error; per-zone
/// fetch failures are collected in [`RunSummary::failures`].
pub async fn collect(config: &Config, now: NaiveDateTime) -> Result<RunSummary, FetchError> {
    let client = bulletin::http_client(&config.http)?;
    let mut summary = RunSummary::default();

    for zone in &config.zones {
        summary.attempted += 1;
        match bulletin::fetch(&client, zone).await {
            Ok(bulletin) => {
                let rows = process_bulletin(&bulletin, now, config.forecast.cutover_hour);
                info!(zone = %zone.id, name = %zone.name, rows = rows.len(), "zone processed");
                summary.rows.extend(rows);
            }
            Err(e) => {
                warn!(zone = %zone.id, error = %e, "failed to fetch zone");
                summary.failures.push((zone.id.clone(), e.to_string()));
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneConfig;
    use crate::PeriodLabel;
    use chrono::NaiveDate;

    #[test]
    fn test_unknown_row_keeps_flags() {
        let now = NaiveDate::from_ymd_opt(2025, 10, 18)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let rows = process_text("GMZ044", "Small Craft Advisory in effect. Format changed.", now, 12);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].period, PeriodLabel::Unknown);
        assert!(rows[0].advisory);
        assert_eq!(rows[0].wind_dir, None);
    }

    #[test]
    fn test_bulletin_rows_match_text_rows() {
        let now = NaiveDate::from_ymd_opt(2025, 10, 18)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let text = ".TODAY...East winds 15 kt. Seas 3 ft.\n.TONIGHT...East winds 10 kt. Seas 2 ft.";
        let bulletin = Bulletin::new("AMZ651".to_string(), chrono::Local::now(), text.to_string());

        let rows = process_bulletin(&bulletin, now, 12);
        assert_eq!(rows, process_text("AMZ651", text, now, 12));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.zone == "AMZ651"));
    }

    #[test]
    fn test_partial_failure_is_not_all_failed() {
        let summary = RunSummary {
            rows: Vec::new(),
            failures: vec![("GMZ044".to_string(), "HTTP error".to_string())],
            attempted: 2,
        };
        assert!(!summary.all_failed());
        assert!(!RunSummary::default().all_failed());
    }

    #[tokio::test]
    async fn test_collect_skips_unreachable_zones() {
        let mut config = Config::default();
        config.http.timeout_secs = 2;
        config.zones = vec![
            ZoneConfig {
                id: "AMZ651".to_string(),
                name: "Miami".to_string(),
                url: "http://127.0.0.1:9/miami".to_string(),
                aliases: Vec::new(),
            },
            ZoneConfig {
                id: "GMZ044".to_string(),
                name: "Keys".to_string(),
                url: "http://127.0.0.1:9/keys".to_string(),
                aliases: Vec::new(),
            },
        ];
        let now = NaiveDate::from_ymd_opt(2025, 10, 18)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let summary = collect(&config, now).await.unwrap();
        assert!(summary.rows.is_empty());
        assert_eq!(summary.attempted, 2);
        assert!(summary.all_failed());
        let failed: Vec<_> = summary.failures.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(failed, vec!["AMZ651", "GMZ044"]);
    }
}
