//! Row assembly: one [`OutputRow`] per classified period.

use crate::extract::extract;
use crate::{AdvisoryFlags, ForecastFields, ForecastPeriod, OutputRow};
use tracing::warn;

/// Flatten one period's fields plus the zone-wide flags into a row.
pub fn row(zone: &str, period: &ForecastPeriod, fields: &ForecastFields, flags: AdvisoryFlags) -> OutputRow {
    OutputRow {
        zone: zone.to_string(),
        period: period.label,
        wind_dir: fields.wind_dir,
        wind_speed_low: fields.wind_speed.map(|r| r.low),
        wind_speed_high: fields.wind_speed.map(|r| r.high),
        gust: fields.gust,
        sea_low: fields.seas.map(|r| r.low),
        sea_high: fields.seas.map(|r| r.high),
        nearshore_note: fields.nearshore.clone(),
        advisory: flags.advisory,
        caution: flags.caution,
    }
}

/// Extract and flatten every period, keeping classification order.
///
/// Periods whose fields all came back empty still produce a row.
pub fn assemble(zone: &str, periods: &[ForecastPeriod], flags: AdvisoryFlags) -> Vec<OutputRow> {
    periods
        .iter()
        .map(|period| {
            let fields = extract(&period.text);
            if !fields.is_complete() {
                warn!(zone = %zone, period = %period.label, "incomplete extraction, bulletin format may have changed");
            }
            row(zone, period, &fields, flags)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompassSector, PeriodLabel};

    fn period(label: PeriodLabel, text: &str) -> ForecastPeriod {
        ForecastPeriod {
            label,
            header: label.as_str().to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_rows_follow_period_order() {
        let periods = vec![
            period(PeriodLabel::Today, "East winds 15 kt. Seas 3 ft."),
            period(PeriodLabel::Tonight, "North winds 5 to 10 kt. Seas 2 to 3 ft."),
        ];
        let flags = AdvisoryFlags {
            advisory: false,
            caution: true,
        };
        let rows = assemble("AMZ651", &periods, flags);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period, PeriodLabel::Today);
        assert_eq!(rows[0].wind_dir, Some(CompassSector::East));
        assert_eq!((rows[0].wind_speed_low, rows[0].wind_speed_high), (Some(15), Some(15)));
        assert_eq!(rows[1].period, PeriodLabel::Tonight);
        assert_eq!((rows[1].sea_low, rows[1].sea_high), (Some(2), Some(3)));
        assert!(rows.iter().all(|r| r.caution && !r.advisory && r.zone == "AMZ651"));
    }

    #[test]
    fn test_empty_fields_still_make_a_row() {
        let periods = vec![period(PeriodLabel::Unknown, "Format changed completely.")];
        let rows = assemble("GMZ044", &periods, AdvisoryFlags::default());

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.period, PeriodLabel::Unknown);
        assert_eq!(row.wind_dir, None);
        assert_eq!(row.wind_speed_low, None);
        assert_eq!(row.gust, None);
        assert_eq!(row.sea_high, None);
        assert_eq!(row.nearshore_note, None);
    }
}
