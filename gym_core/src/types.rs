//! Core record types for GymTrack.
//!
//! Each struct maps one-to-one to a table of the store:
//! - Exercises, workouts and the join rows binding them (seeded, read-only)
//! - Sessions (insert-only workout attempts)
//! - Daily challenge counters (one mutable row per date)

use crate::Error;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Counter unit marking an exercise as timed rather than rep-based
pub const TIMER_UNIT: &str = "timer";

/// Sets needed for a daily challenge to count as complete
pub const CHALLENGE_SETS_TARGET: i32 = 3;

/// Storage format of calendar dates (`date` columns)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format of session start timestamps (`startedAt` column)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Rest between sets when a workout entry does not override it
pub const DEFAULT_REST_SECONDS: i32 = 30;

// ============================================================================
// Session Types
// ============================================================================

/// The three fixed workout programs a session can follow
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionType {
    A,
    B,
    C,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [SessionType::A, SessionType::B, SessionType::C];

    /// Value stored in the `sessionType` column
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::A => "A",
            SessionType::B => "B",
            SessionType::C => "C",
        }
    }

    /// Name of the seeded workout this session type runs
    pub fn workout_name(&self) -> &'static str {
        match self {
            SessionType::A => "Day A",
            SessionType::B => "Day B",
            SessionType::C => "Day C",
        }
    }

    /// Activity kind reported to the health tracker
    pub fn activity_kind(&self) -> HealthActivityKind {
        match self {
            SessionType::A | SessionType::C => HealthActivityKind::TraditionalStrengthTraining,
            SessionType::B => HealthActivityKind::MixedCardio,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(SessionType::A),
            "B" => Ok(SessionType::B),
            "C" => Ok(SessionType::C),
            _ => Err(Error::InvalidSessionType(s.to_string())),
        }
    }
}

/// Workout activity kinds understood by the platform health tracker
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthActivityKind {
    TraditionalStrengthTraining,
    MixedCardio,
}

// ============================================================================
// Catalog Records
// ============================================================================

/// A reusable activity definition (`exercise` table)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub advice: String,
    /// `"timer"` for timed exercises, otherwise the rep unit (e.g. `"reps"`)
    pub counter_unit: String,
    pub default_value: i32,
    pub is_daily_challenge: bool,
}

impl Exercise {
    pub fn is_timed(&self) -> bool {
        self.counter_unit == TIMER_UNIT
    }
}

/// A named, ordered program of exercises (`workout` table)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Binds an exercise into a workout at a position (`workoutExercise` table)
///
/// `counter_value` and `counter_label` are overrides; when absent the
/// exercise's defaults apply. Resolution happens in [`crate::plan`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    /// Zero-based, contiguous within a workout
    pub position: i32,
    pub counter_value: Option<i32>,
    pub counter_label: Option<String>,
    pub rest_seconds: i32,
    pub sets: i32,
}

// ============================================================================
// Session and Challenge Records
// ============================================================================

/// One recorded workout attempt (`session` table)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: i64,
    pub session_type: SessionType,
    pub date: NaiveDate,
    pub started_at: NaiveDateTime,
    pub duration_seconds: i64,
    /// True when the user ended the workout early
    pub is_partial: bool,
}

/// Per-date challenge counter (`dailyChallenge` table)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyChallenge {
    pub id: i64,
    pub date: NaiveDate,
    pub sets_completed: i32,
}

impl DailyChallenge {
    pub fn is_complete(&self) -> bool {
        self.sets_completed == CHALLENGE_SETS_TARGET
    }
}

/// Format a date the way it is stored
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored or user-supplied `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_type_parse() {
        assert_eq!("A".parse::<SessionType>().unwrap(), SessionType::A);
        assert_eq!("b".parse::<SessionType>().unwrap(), SessionType::B);
        assert_eq!(" C ".parse::<SessionType>().unwrap(), SessionType::C);
        assert!(matches!(
            "D".parse::<SessionType>(),
            Err(Error::InvalidSessionType(_))
        ));
    }

    #[test]
    fn test_session_type_activity_mapping() {
        assert_eq!(
            SessionType::A.activity_kind(),
            HealthActivityKind::TraditionalStrengthTraining
        );
        assert_eq!(SessionType::B.activity_kind(), HealthActivityKind::MixedCardio);
        assert_eq!(
            SessionType::C.activity_kind(),
            HealthActivityKind::TraditionalStrengthTraining
        );
    }

    #[test]
    fn test_is_timed() {
        let mut exercise = Exercise {
            id: 1,
            name: "Plank".into(),
            description: String::new(),
            advice: String::new(),
            counter_unit: TIMER_UNIT.into(),
            default_value: 1,
            is_daily_challenge: false,
        };
        assert!(exercise.is_timed());

        exercise.counter_unit = "reps".into();
        assert!(!exercise.is_timed());
    }

    #[test]
    fn test_challenge_complete_only_at_target() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let mut challenge = DailyChallenge {
            id: 1,
            date,
            sets_completed: 2,
        };
        assert!(!challenge.is_complete());

        challenge.sets_completed = 3;
        assert!(challenge.is_complete());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2026-02-20").unwrap();
        assert_eq!(format_date(date), "2026-02-20");
        assert!(matches!(parse_date("20/02/2026"), Err(Error::InvalidDate(_))));
    }
}
