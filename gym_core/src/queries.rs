//! Session, daily challenge and workout queries.
//!
//! Every operation runs under the connection lock of [`Database`]. Reads and
//! single-row writes are one statement each; the challenge upsert and
//! increment run their read-then-write inside one `IMMEDIATE` transaction so
//! concurrent increments for the same date cannot lose an update, whether
//! they come from this process or another connection to the same file.

use crate::types::{format_date, CHALLENGE_SETS_TARGET, DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::{
    DailyChallenge, Database, Exercise, Result, Session, SessionType, Workout, WorkoutExercise,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const SESSION_COLUMNS: &str = "id, sessionType, date, startedAt, durationSeconds, isPartial";

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn get_date(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn map_session(row: &Row) -> rusqlite::Result<Session> {
    let type_str: String = row.get(1)?;
    let session_type = type_str
        .parse::<SessionType>()
        .map_err(|e| conversion_error(1, e))?;

    let started_str: String = row.get(3)?;
    let started_at = NaiveDateTime::parse_from_str(&started_str, TIMESTAMP_FORMAT)
        .map_err(|e| conversion_error(3, e))?;

    Ok(Session {
        id: row.get(0)?,
        session_type,
        date: get_date(row, 2)?,
        started_at,
        duration_seconds: row.get(4)?,
        is_partial: row.get(5)?,
    })
}

fn map_challenge(row: &Row) -> rusqlite::Result<DailyChallenge> {
    Ok(DailyChallenge {
        id: row.get(0)?,
        date: get_date(row, 1)?,
        sets_completed: row.get(2)?,
    })
}

fn map_workout(row: &Row) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn map_workout_entry(row: &Row) -> rusqlite::Result<(Exercise, WorkoutExercise)> {
    let exercise = Exercise {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        advice: row.get("advice")?,
        counter_unit: row.get("counterUnit")?,
        default_value: row.get("defaultValue")?,
        is_daily_challenge: row.get("isDailyChallenge")?,
    };
    let entry = WorkoutExercise {
        id: row.get("weId")?,
        workout_id: row.get("workoutId")?,
        exercise_id: row.get("exerciseId")?,
        position: row.get("position")?,
        counter_value: row.get("counterValue")?,
        counter_label: row.get("counterLabel")?,
        rest_seconds: row.get("restSeconds")?,
        sets: row.get("sets")?,
    };
    Ok((exercise, entry))
}

/// Collect a single-column list of dates, skipping rows that do not parse
fn collect_dates(conn: &Connection, sql: &str) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut dates = Vec::new();
    for r in rows {
        let text = r?;
        match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
            Ok(date) => dates.push(date),
            Err(e) => tracing::warn!("Skipping unparseable date {:?}: {}", text, e),
        }
    }
    Ok(dates)
}

fn find_challenge(conn: &Connection, date: &str) -> rusqlite::Result<Option<DailyChallenge>> {
    conn.query_row(
        "SELECT id, date, setsCompleted FROM dailyChallenge WHERE date = ?1",
        [date],
        map_challenge,
    )
    .optional()
}

/// Overwrite or create the row for `date`; caller owns the transaction
fn write_challenge(conn: &Connection, date: NaiveDate, sets_completed: i32) -> Result<DailyChallenge> {
    let date_str = format_date(date);
    match find_challenge(conn, &date_str)? {
        Some(mut existing) => {
            conn.execute(
                "UPDATE dailyChallenge SET setsCompleted = ?1 WHERE id = ?2",
                params![sets_completed, existing.id],
            )?;
            existing.sets_completed = sets_completed;
            Ok(existing)
        }
        None => {
            conn.execute(
                "INSERT INTO dailyChallenge (date, setsCompleted) VALUES (?1, ?2)",
                params![date_str, sets_completed],
            )?;
            Ok(DailyChallenge {
                id: conn.last_insert_rowid(),
                date,
                sets_completed,
            })
        }
    }
}

impl Database {
    // ========== Sessions ==========

    /// Record a workout attempt and return it with its assigned id.
    ///
    /// Values are stored as given; no check ties `date` to `started_at`.
    pub fn insert_session(
        &self,
        session_type: SessionType,
        date: NaiveDate,
        started_at: NaiveDateTime,
        duration_seconds: i64,
        is_partial: bool,
    ) -> Result<Session> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO session (sessionType, date, startedAt, durationSeconds, isPartial)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    session_type.as_str(),
                    format_date(date),
                    started_at.format(TIMESTAMP_FORMAT).to_string(),
                    duration_seconds,
                    is_partial,
                ],
            )?;
            let session = Session {
                id: conn.last_insert_rowid(),
                session_type,
                date,
                started_at,
                duration_seconds,
                is_partial,
            };
            tracing::debug!("Inserted session {} ({})", session.id, session_type);
            Ok(session)
        })
    }

    /// Most recently inserted session, regardless of its date.
    pub fn last_session(&self) -> Result<Option<Session>> {
        self.with_conn(|conn| {
            let session = conn
                .query_row(
                    &format!("SELECT {} FROM session ORDER BY id DESC LIMIT 1", SESSION_COLUMNS),
                    [],
                    map_session,
                )
                .optional()?;
            Ok(session)
        })
    }

    /// Sessions dated within `[from, to]`, newest date first.
    pub fn sessions_in_date_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Session>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM session
                 WHERE date >= ?1 AND date <= ?2
                 ORDER BY date DESC, id DESC",
                SESSION_COLUMNS
            ))?;
            let rows = stmt.query_map([format_date(from), format_date(to)], map_session)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            tracing::debug!("Found {} sessions between {} and {}", out.len(), from, to);
            Ok(out)
        })
    }

    /// Distinct dates with at least one full session, newest first.
    pub fn non_partial_session_dates(&self) -> Result<Vec<NaiveDate>> {
        self.with_conn(|conn| {
            collect_dates(
                conn,
                "SELECT DISTINCT date FROM session WHERE isPartial = 0 ORDER BY date DESC",
            )
        })
    }

    // ========== Daily Challenge ==========

    pub fn challenge_for_date(&self, date: NaiveDate) -> Result<Option<DailyChallenge>> {
        self.with_conn(|conn| Ok(find_challenge(conn, &format_date(date))?))
    }

    /// Set the challenge counter for `date`, creating the row if needed.
    ///
    /// The value is stored as given; capping belongs to
    /// [`Database::increment_challenge`].
    pub fn upsert_challenge(&self, date: NaiveDate, sets_completed: i32) -> Result<DailyChallenge> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let challenge = write_challenge(&tx, date, sets_completed)?;
            tx.commit()?;
            tracing::debug!("Challenge for {} set to {}", date, sets_completed);
            Ok(challenge)
        })
    }

    /// Add one completed set for `date`, capped at three.
    ///
    /// At the cap the row is still rewritten with the capped value.
    pub fn increment_challenge(&self, date: NaiveDate) -> Result<DailyChallenge> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = find_challenge(&tx, &format_date(date))?
                .map(|c| c.sets_completed)
                .unwrap_or(0);
            let next = current.saturating_add(1).min(CHALLENGE_SETS_TARGET);
            let challenge = write_challenge(&tx, date, next)?;
            tx.commit()?;
            tracing::debug!("Challenge for {} incremented to {}", date, next);
            Ok(challenge)
        })
    }

    /// Dates whose challenge reached three sets, newest first.
    pub fn completed_challenge_dates(&self) -> Result<Vec<NaiveDate>> {
        self.with_conn(|conn| {
            collect_dates(
                conn,
                &format!(
                    "SELECT date FROM dailyChallenge WHERE setsCompleted = {} ORDER BY date DESC",
                    CHALLENGE_SETS_TARGET
                ),
            )
        })
    }

    /// Number of completed challenge dates within `[from, to]`.
    pub fn completed_challenge_count(&self, from: NaiveDate, to: NaiveDate) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM dailyChallenge
                 WHERE date >= ?1 AND date <= ?2 AND setsCompleted = ?3",
                params![format_date(from), format_date(to), CHALLENGE_SETS_TARGET],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    // ========== Workouts & Exercises ==========

    /// All workouts in seed order.
    pub fn all_workouts(&self) -> Result<Vec<Workout>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, description FROM workout ORDER BY id")?;
            let rows = stmt.query_map([], map_workout)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    pub fn workout_by_name(&self, name: &str) -> Result<Option<Workout>> {
        self.with_conn(|conn| {
            let workout = conn
                .query_row(
                    "SELECT id, name, description FROM workout WHERE name = ?1",
                    [name],
                    map_workout,
                )
                .optional()?;
            Ok(workout)
        })
    }

    /// Exercises of a workout joined with their per-workout overrides,
    /// ordered by position.
    pub fn exercises_for_workout(&self, workout_id: i64) -> Result<Vec<(Exercise, WorkoutExercise)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT e.id, e.name, e.description, e.advice, e.counterUnit,
                        e.defaultValue, e.isDailyChallenge,
                        we.id AS weId, we.workoutId, we.exerciseId, we.position,
                        we.counterValue, we.counterLabel, we.restSeconds, we.sets
                 FROM workoutExercise we
                 JOIN exercise e ON e.id = we.exerciseId
                 WHERE we.workoutId = ?1
                 ORDER BY we.position",
            )?;
            let rows = stmt.query_map([workout_id], map_workout_entry)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            tracing::debug!("Workout {} has {} exercises", workout_id, out.len());
            Ok(out)
        })
    }
}
