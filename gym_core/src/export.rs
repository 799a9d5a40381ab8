//! CSV export of recorded sessions.

use crate::types::{format_date, TIMESTAMP_FORMAT};
use crate::{Database, Result, Session};
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: i64,
    session_type: &'static str,
    date: String,
    started_at: String,
    duration_seconds: i64,
    is_partial: bool,
}

impl From<&Session> for CsvRow {
    fn from(session: &Session) -> Self {
        CsvRow {
            id: session.id,
            session_type: session.session_type.as_str(),
            date: format_date(session.date),
            started_at: session.started_at.format(TIMESTAMP_FORMAT).to_string(),
            duration_seconds: session.duration_seconds,
            is_partial: session.is_partial,
        }
    }
}

/// Write sessions dated within `[from, to]` to a CSV file
///
/// The file is replaced, written newest first, and synced to disk before
/// returning the number of sessions written.
pub fn export_sessions_csv(db: &Database, from: NaiveDate, to: NaiveDate, path: &Path) -> Result<usize> {
    let sessions = db.sessions_in_date_range(from, to)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    if sessions.is_empty() {
        writer.write_record([
            "id",
            "session_type",
            "date",
            "started_at",
            "duration_seconds",
            "is_partial",
        ])?;
    }
    for session in &sessions {
        writer.serialize(CsvRow::from(session))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sessions to {:?}", sessions.len(), path);
    Ok(sessions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionType;

    fn date(s: &str) -> NaiveDate {
        crate::types::parse_date(s).unwrap()
    }

    #[test]
    fn test_export_writes_sessions_in_range() {
        let db = Database::open_in_memory().unwrap();
        for (day, session_type, partial) in [
            ("2026-02-18", SessionType::A, false),
            ("2026-02-19", SessionType::B, true),
            ("2026-03-01", SessionType::C, false),
        ] {
            let d = date(day);
            db.insert_session(session_type, d, d.and_hms_opt(7, 30, 0).unwrap(), 1800, partial)
                .unwrap();
        }

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("sessions.csv");
        let count = export_sessions_csv(&db, date("2026-02-01"), date("2026-02-28"), &path).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "id,session_type,date,started_at,duration_seconds,is_partial"
        );
        assert_eq!(lines[1], "2,B,2026-02-19,2026-02-19T07:30:00,1800,true");
        assert_eq!(lines[2], "1,A,2026-02-18,2026-02-18T07:30:00,1800,false");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_empty_range_writes_header() {
        let db = Database::open_in_memory().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sessions.csv");

        let count = export_sessions_csv(&db, date("2026-02-01"), date("2026-02-28"), &path).unwrap();
        assert_eq!(count, 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.trim(),
            "id,session_type,date,started_at,duration_seconds,is_partial"
        );
    }
}
