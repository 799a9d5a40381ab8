//! Built-in catalog of exercises and workouts.
//!
//! This module describes the fixed program loaded into a fresh store and
//! writes it into the `exercise`, `workout` and `workoutExercise` tables.

use crate::types::{DEFAULT_REST_SECONDS, TIMER_UNIT};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use std::collections::{HashMap, HashSet};

/// Cached default catalog - built once and reused across all stores
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Exercise definition before it has a store-assigned id
#[derive(Clone, Debug)]
pub struct ExerciseDef {
    pub name: String,
    pub description: String,
    pub advice: String,
    pub counter_unit: String,
    pub default_value: i32,
    pub is_daily_challenge: bool,
}

/// One entry of a workout, referencing an exercise by name
#[derive(Clone, Debug)]
pub struct WorkoutEntryDef {
    pub exercise: String,
    pub counter_value: Option<i32>,
    pub counter_label: Option<String>,
    pub rest_seconds: i32,
    pub sets: i32,
}

impl WorkoutEntryDef {
    /// Entry with no overrides, default rest and a single set
    pub fn new(exercise: &str) -> Self {
        Self {
            exercise: exercise.into(),
            counter_value: None,
            counter_label: None,
            rest_seconds: DEFAULT_REST_SECONDS,
            sets: 1,
        }
    }

    pub fn value(mut self, value: i32) -> Self {
        self.counter_value = Some(value);
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.counter_label = Some(label.into());
        self
    }

    pub fn rest(mut self, seconds: i32) -> Self {
        self.rest_seconds = seconds;
        self
    }

    pub fn sets(mut self, sets: i32) -> Self {
        self.sets = sets;
        self
    }
}

/// A workout definition; entry order is the execution order
#[derive(Clone, Debug)]
pub struct WorkoutDef {
    pub name: String,
    pub description: String,
    pub entries: Vec<WorkoutEntryDef>,
}

/// The complete set of exercises and workouts seeded into a new store
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: Vec<ExerciseDef>,
    pub workouts: Vec<WorkoutDef>,
}

fn exercise(
    name: &str,
    description: &str,
    advice: &str,
    counter_unit: &str,
    default_value: i32,
) -> ExerciseDef {
    ExerciseDef {
        name: name.into(),
        description: description.into(),
        advice: advice.into(),
        counter_unit: counter_unit.into(),
        default_value,
        is_daily_challenge: false,
    }
}

const WARM_UP: &str = "Cardio warm-up (cycling)";
const CHALLENGE: &str = "Daily challenge (push-ups + squats)";
const GOBLET_SQUAT: &str = "Goblet squat (legs)";
const CHEST_PRESS: &str = "Dumbbell chest press (push)";
const ROW: &str = "Dumbbell row (pull)";
const DEADLIFT: &str = "Romanian deadlift (hinge)";
const PLANK: &str = "Plank (core)";
const COOL_DOWN: &str = "Cardio cool-down (walking)";
const STRETCHING: &str = "Stretching";
const INTERVALS: &str = "Interval cycling (cardio)";
const LUNGES: &str = "Walking lunges (legs)";
const SHOULDER_PRESS: &str = "Dumbbell shoulder press (push)";

/// Builds the default catalog: 12 exercises, workouts "Day A", "Day B", "Day C"
pub fn build_default_catalog() -> Catalog {
    // ========================================================================
    // Exercises
    // ========================================================================

    let exercises = vec![
        exercise(
            WARM_UP,
            "Easy pace on the bike to raise heart rate.",
            "Keep cadence steady, you should still be able to talk.",
            TIMER_UNIT,
            10,
        ),
        ExerciseDef {
            is_daily_challenge: true,
            ..exercise(
                CHALLENGE,
                "Push-ups followed immediately by bodyweight squats.",
                "Drop to the knees for push-ups when form breaks down.",
                "reps",
                10,
            )
        },
        exercise(
            GOBLET_SQUAT,
            "Squat holding one dumbbell against the chest.",
            "Elbows inside the knees at the bottom, heels down.",
            "reps",
            10,
        ),
        exercise(
            CHEST_PRESS,
            "Press two dumbbells up from a flat bench.",
            "Lower under control until elbows are just below the bench.",
            "reps",
            10,
        ),
        exercise(
            ROW,
            "One-arm row with the other hand braced on a bench.",
            "Pull the elbow towards the hip, not the shoulder.",
            "reps",
            10,
        ),
        exercise(
            DEADLIFT,
            "Hip hinge with dumbbells sliding along the thighs.",
            "Soft knees, flat back, stop when the hamstrings are stretched.",
            "reps",
            10,
        ),
        exercise(
            PLANK,
            "Forearm plank.",
            "Squeeze glutes and keep the hips level.",
            TIMER_UNIT,
            1,
        ),
        exercise(
            COOL_DOWN,
            "Slow walk to bring heart rate down.",
            "Breathe through the nose.",
            TIMER_UNIT,
            5,
        ),
        exercise(
            STRETCHING,
            "Full-body static stretching.",
            "Hold each stretch for at least 30 seconds without bouncing.",
            TIMER_UNIT,
            5,
        ),
        exercise(
            INTERVALS,
            "Alternate 1 minute hard with 1 minute easy on the bike.",
            "Hard intervals should feel like 8 out of 10.",
            TIMER_UNIT,
            20,
        ),
        exercise(
            LUNGES,
            "Alternating forward lunges while walking.",
            "Front knee tracks over the toes, torso upright.",
            "reps",
            12,
        ),
        exercise(
            SHOULDER_PRESS,
            "Seated overhead press with two dumbbells.",
            "Do not arch the lower back, ribs down.",
            "reps",
            10,
        ),
    ];

    // ========================================================================
    // Workouts
    // ========================================================================

    let workouts = vec![
        WorkoutDef {
            name: "Day A".into(),
            description: "Full-body strength.".into(),
            entries: vec![
                WorkoutEntryDef::new(WARM_UP).rest(0),
                WorkoutEntryDef::new(CHALLENGE).label("10 + 10 reps").rest(60),
                WorkoutEntryDef::new(GOBLET_SQUAT).sets(3).rest(60),
                WorkoutEntryDef::new(CHEST_PRESS).label("10 reps").sets(4).rest(90),
                WorkoutEntryDef::new(ROW).sets(4).rest(90),
                WorkoutEntryDef::new(DEADLIFT).sets(3).rest(90),
                WorkoutEntryDef::new(PLANK).sets(3),
                WorkoutEntryDef::new(COOL_DOWN).rest(0),
                WorkoutEntryDef::new(STRETCHING).rest(0),
            ],
        },
        WorkoutDef {
            name: "Day B".into(),
            description: "Cardio and legs.".into(),
            entries: vec![
                WorkoutEntryDef::new(WARM_UP).rest(0),
                WorkoutEntryDef::new(CHALLENGE).label("10 + 10 reps").rest(60),
                WorkoutEntryDef::new(INTERVALS).rest(60),
                WorkoutEntryDef::new(LUNGES).sets(3).rest(60),
                WorkoutEntryDef::new(PLANK).value(2).sets(2),
                WorkoutEntryDef::new(COOL_DOWN).rest(0),
                WorkoutEntryDef::new(STRETCHING).value(10).rest(0),
            ],
        },
        WorkoutDef {
            name: "Day C".into(),
            description: "Upper-body strength and hinge.".into(),
            entries: vec![
                WorkoutEntryDef::new(WARM_UP).rest(0),
                WorkoutEntryDef::new(CHALLENGE).label("10 + 10 reps").rest(60),
                WorkoutEntryDef::new(DEADLIFT).value(12).sets(3).rest(90),
                WorkoutEntryDef::new(SHOULDER_PRESS).sets(4).rest(90),
                WorkoutEntryDef::new(ROW).value(12).sets(3).rest(90),
                WorkoutEntryDef::new(COOL_DOWN).rest(0),
                WorkoutEntryDef::new(STRETCHING).rest(0),
            ],
        },
    ];

    Catalog {
        exercises,
        workouts,
    }
}

impl Catalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut exercise_names = HashSet::new();
        for def in &self.exercises {
            if def.name.is_empty() {
                errors.push("Exercise has empty name".to_string());
            }
            if def.counter_unit.is_empty() {
                errors.push(format!("Exercise '{}' has empty counter unit", def.name));
            }
            if !exercise_names.insert(def.name.as_str()) {
                errors.push(format!("Duplicate exercise name '{}'", def.name));
            }
        }

        let mut workout_names = HashSet::new();
        for workout in &self.workouts {
            if workout.name.is_empty() {
                errors.push("Workout has empty name".to_string());
            }
            if !workout_names.insert(workout.name.as_str()) {
                errors.push(format!("Duplicate workout name '{}'", workout.name));
            }
            if workout.entries.is_empty() {
                errors.push(format!("Workout '{}' has no exercises", workout.name));
            }

            for entry in &workout.entries {
                if !exercise_names.contains(entry.exercise.as_str()) {
                    errors.push(format!(
                        "Workout '{}' references non-existent exercise '{}'",
                        workout.name, entry.exercise
                    ));
                }
                if entry.sets < 1 {
                    errors.push(format!(
                        "Workout '{}': '{}' has {} sets",
                        workout.name, entry.exercise, entry.sets
                    ));
                }
                if entry.rest_seconds < 0 {
                    errors.push(format!(
                        "Workout '{}': '{}' has negative rest",
                        workout.name, entry.exercise
                    ));
                }
            }
        }

        errors
    }

    /// Write the catalog into an empty store
    ///
    /// Positions are assigned from entry order starting at 0. Does nothing
    /// if the store already holds exercises, so seeding twice is harmless.
    pub fn seed(&self, conn: &Connection) -> Result<()> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }

        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM exercise", [], |row| row.get(0))?;
        if existing > 0 {
            tracing::debug!("Store already seeded with {} exercises", existing);
            return Ok(());
        }

        let mut exercise_ids = HashMap::new();
        for def in &self.exercises {
            conn.execute(
                "INSERT INTO exercise (name, description, advice, counterUnit, defaultValue, isDailyChallenge)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    def.name,
                    def.description,
                    def.advice,
                    def.counter_unit,
                    def.default_value,
                    def.is_daily_challenge,
                ],
            )?;
            exercise_ids.insert(def.name.as_str(), conn.last_insert_rowid());
        }

        for workout in &self.workouts {
            conn.execute(
                "INSERT INTO workout (name, description) VALUES (?1, ?2)",
                params![workout.name, workout.description],
            )?;
            let workout_id = conn.last_insert_rowid();

            for (position, entry) in workout.entries.iter().enumerate() {
                let exercise_id = exercise_ids.get(entry.exercise.as_str()).ok_or_else(|| {
                    Error::Seed(format!("Unknown exercise '{}'", entry.exercise))
                })?;
                conn.execute(
                    "INSERT INTO workoutExercise
                     (workoutId, exerciseId, position, counterValue, counterLabel, restSeconds, sets)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        workout_id,
                        exercise_id,
                        position as i64,
                        entry.counter_value,
                        entry.counter_label,
                        entry.rest_seconds,
                        entry.sets,
                    ],
                )?;
            }
        }

        tracing::info!(
            "Seeded {} exercises and {} workouts",
            self.exercises.len(),
            self.workouts.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SCHEMA;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.exercises.len(), 12);
        assert_eq!(catalog.workouts.len(), 3);

        let sizes: Vec<usize> = catalog.workouts.iter().map(|w| w.entries.len()).collect();
        assert_eq!(sizes, vec![9, 7, 7]);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_every_exercise_is_used() {
        let catalog = get_default_catalog();
        let used: HashSet<&str> = catalog
            .workouts
            .iter()
            .flat_map(|w| w.entries.iter().map(|e| e.exercise.as_str()))
            .collect();
        assert_eq!(used.len(), catalog.exercises.len());
    }

    #[test]
    fn test_validate_reports_unknown_exercise() {
        let mut catalog = build_default_catalog();
        catalog.workouts[0]
            .entries
            .push(WorkoutEntryDef::new("Handstand push-up"));

        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Handstand push-up"));
    }

    #[test]
    fn test_validate_reports_bad_sets_and_duplicates() {
        let mut catalog = build_default_catalog();
        catalog.exercises.push(catalog.exercises[0].clone());
        catalog.workouts[1].entries[0].sets = 0;

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate exercise")));
        assert!(errors.iter().any(|e| e.contains("0 sets")));
    }

    #[test]
    fn test_seed_refuses_invalid_catalog() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let mut catalog = build_default_catalog();
        catalog.workouts[2].entries[0].exercise = "Missing".into();

        let result = catalog.seed(&conn);
        assert!(matches!(result, Err(Error::CatalogValidation(_))));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM exercise", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_seed_twice_does_not_duplicate() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let catalog = get_default_catalog();
        catalog.seed(&conn).unwrap();
        catalog.seed(&conn).unwrap();

        let exercises: i64 = conn
            .query_row("SELECT COUNT(*) FROM exercise", [], |row| row.get(0))
            .unwrap();
        let entries: i64 = conn
            .query_row("SELECT COUNT(*) FROM workoutExercise", [], |row| row.get(0))
            .unwrap();
        assert_eq!(exercises, 12);
        assert_eq!(entries, 23);
    }
}
