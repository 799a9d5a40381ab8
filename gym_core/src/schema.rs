//! Database schema definitions for GymTrack.
//!
//! Table and column names are part of the on-disk format and must stay
//! stable for existing data files.

/// Schema version stored in `PRAGMA user_version` once created and seeded
pub const CURRENT_VERSION: i32 = 1;

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Exercise definitions
CREATE TABLE IF NOT EXISTS exercise (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    advice TEXT NOT NULL DEFAULT '',
    counterUnit TEXT NOT NULL,
    defaultValue INTEGER NOT NULL,
    isDailyChallenge BOOLEAN NOT NULL DEFAULT 0
);

-- Workout programs
CREATE TABLE IF NOT EXISTS workout (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

-- Ordered exercises within a workout
CREATE TABLE IF NOT EXISTS workoutExercise (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    workoutId INTEGER NOT NULL REFERENCES workout(id) ON DELETE CASCADE,
    exerciseId INTEGER NOT NULL REFERENCES exercise(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    counterValue INTEGER,
    counterLabel TEXT,
    restSeconds INTEGER NOT NULL DEFAULT 30,
    sets INTEGER NOT NULL DEFAULT 1,
    UNIQUE(workoutId, position)
);

CREATE INDEX IF NOT EXISTS idx_workoutExercise_workoutId ON workoutExercise(workoutId);

-- Recorded workout attempts
CREATE TABLE IF NOT EXISTS session (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sessionType TEXT NOT NULL,
    date TEXT NOT NULL,
    startedAt TEXT NOT NULL,
    durationSeconds INTEGER NOT NULL,
    isPartial BOOLEAN NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_session_date ON session(date);

-- Daily challenge counters
CREATE TABLE IF NOT EXISTS dailyChallenge (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL UNIQUE,
    setsCompleted INTEGER NOT NULL DEFAULT 0
);
"#;

/// Tables created by [`SCHEMA`], in dependency order
pub const TABLES: [&str; 5] = [
    "exercise",
    "workout",
    "workoutExercise",
    "session",
    "dailyChallenge",
];
