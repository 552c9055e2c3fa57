//! # CSV Output
//!
//! Rows go out with a fixed header, in the order they were assembled.
//! Missing values become empty cells and flags are written as
//! `true`/`false`. The header is written even when there are no rows so
//! downstream imports always see the same columns.

use crate::OutputRow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Column header, matching the field order of [`OutputRow`].
pub const COLUMNS: [&str; 11] = [
    "zone",
    "period",
    "wind_dir",
    "wind_speed_low",
    "wind_speed_high",
    "gust",
    "sea_low",
    "sea_high",
    "nearshore_note",
    "advisory",
    "caution",
];

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("output IO: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Serialize rows as CSV to any writer.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> Result<(), OutputError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(COLUMNS)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write (overwriting) the CSV at `path`, creating parent directories.
pub fn write_file(path: &Path, rows: &[OutputRow]) -> Result<(), OutputError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = fs::File::create(path)?;
    write_rows(io::BufWriter::new(file), rows)?;
    info!(file = %path.display(), rows = rows.len(), "wrote marine forecast CSV");
    Ok(())
}

/// Copy the finished CSV to each mirror location.
///
/// Mirrors are best-effort; returns the mirrors that were written.
pub fn copy_to_mirrors(path: &Path, mirrors: &[PathBuf]) -> Vec<PathBuf> {
    mirrors
        .iter()
        .filter(|mirror| match fs::copy(path, mirror) {
            Ok(_) => {
                info!(mirror = %mirror.display(), "copied CSV to mirror");
                true
            }
            Err(e) => {
                warn!(mirror = %mirror.display(), error = %e, "failed to copy CSV to mirror");
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompassSector, PeriodLabel};
    use tempfile::tempdir;

    fn sample_row() -> OutputRow {
        OutputRow {
            zone: "AMZ651".to_string(),
            period: PeriodLabel::TomorrowNight,
            wind_dir: Some(CompassSector::NorthEast),
            wind_speed_low: Some(10),
            wind_speed_high: Some(15),
            gust: None,
            sea_low: Some(2),
            sea_high: Some(4),
            nearshore_note: Some("a light chop, becoming choppy".to_string()),
            advisory: false,
            caution: true,
        }
    }

    #[test]
    fn test_header_and_row_layout() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[sample_row()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "zone,period,wind_dir,wind_speed_low,wind_speed_high,gust,sea_low,sea_high,nearshore_note,advisory,caution"
        );
        assert_eq!(
            lines[1],
            "AMZ651,TOMORROW NIGHT,NE,10,15,,2,4,\"a light chop, becoming choppy\",false,true"
        );
    }

    #[test]
    fn test_header_written_without_rows() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_write_file_creates_dirs_and_mirrors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/marine_forecast.csv");
        write_file(&path, &[sample_row()]).unwrap();
        assert!(path.exists());

        let good = dir.path().join("mirror.csv");
        let bad = dir.path().join("missing-dir/mirror.csv");
        let written = copy_to_mirrors(&path, &[good.clone(), bad]);
        assert_eq!(written, vec![good.clone()]);
        assert_eq!(fs::read(&path).unwrap(), fs::read(&good).unwrap());
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("marine_forecast.csv");
        write_file(&path, &[sample_row(), sample_row()]).unwrap();
        write_file(&path, &[sample_row()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
    }
}
