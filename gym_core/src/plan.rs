//! Workout plans built from the workout/exercise join.
//!
//! Resolves per-workout overrides against exercise defaults and flattens a
//! workout into one step per set.

use crate::{Database, Error, Exercise, Result, SessionType, WorkoutExercise};
use serde::Serialize;

/// An exercise as it should be performed within one workout
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PlanExercise {
    pub exercise_id: i64,
    pub name: String,
    pub description: String,
    pub advice: String,
    pub position: i32,
    pub sets: i32,
    pub rest_seconds: i32,
    /// Override value if present, otherwise the exercise default
    pub counter_value: i32,
    pub is_timed: bool,
    pub is_daily_challenge: bool,
    /// Human-readable target, e.g. `"10 min"` or `"10 reps"`
    pub display: String,
}

impl PlanExercise {
    pub fn from_entry(exercise: &Exercise, entry: &WorkoutExercise) -> Self {
        let counter_value = entry.counter_value.unwrap_or(exercise.default_value);
        let display = match &entry.counter_label {
            Some(label) => label.clone(),
            None if exercise.is_timed() => format!("{} min", counter_value),
            None => format!("{} {}", counter_value, exercise.counter_unit),
        };

        Self {
            exercise_id: exercise.id,
            name: exercise.name.clone(),
            description: exercise.description.clone(),
            advice: exercise.advice.clone(),
            position: entry.position,
            sets: entry.sets,
            rest_seconds: entry.rest_seconds,
            counter_value,
            is_timed: exercise.is_timed(),
            is_daily_challenge: exercise.is_daily_challenge,
            display,
        }
    }

    /// Timer length for timed exercises (counter values are minutes)
    pub fn duration_seconds(&self) -> Option<i64> {
        self.is_timed.then(|| i64::from(self.counter_value) * 60)
    }
}

/// One set of one exercise
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PlanStep {
    pub name: String,
    /// 1-based
    pub set_number: i32,
    pub total_sets: i32,
    pub display: String,
    pub rest_seconds: i32,
    pub is_timed: bool,
    pub is_daily_challenge: bool,
}

/// Ordered exercises of a workout
#[derive(Clone, Debug, Serialize)]
pub struct WorkoutPlan {
    pub workout_name: String,
    pub exercises: Vec<PlanExercise>,
}

impl WorkoutPlan {
    /// Load the plan of the workout a session type runs
    pub fn for_session(db: &Database, session_type: SessionType) -> Result<Self> {
        let name = session_type.workout_name();
        let workout = db
            .workout_by_name(name)?
            .ok_or_else(|| Error::Seed(format!("Workout '{}' is missing from the store", name)))?;
        let entries = db.exercises_for_workout(workout.id)?;
        Ok(Self::from_entries(&workout.name, &entries))
    }

    pub fn from_entries(workout_name: &str, entries: &[(Exercise, WorkoutExercise)]) -> Self {
        Self {
            workout_name: workout_name.to_string(),
            exercises: entries
                .iter()
                .map(|(exercise, entry)| PlanExercise::from_entry(exercise, entry))
                .collect(),
        }
    }

    /// Flatten to one step per set, in execution order
    pub fn steps(&self) -> Vec<PlanStep> {
        self.exercises
            .iter()
            .flat_map(|exercise| {
                (1..=exercise.sets).map(move |set_number| PlanStep {
                    name: exercise.name.clone(),
                    set_number,
                    total_sets: exercise.sets,
                    display: exercise.display.clone(),
                    rest_seconds: exercise.rest_seconds,
                    is_timed: exercise.is_timed,
                    is_daily_challenge: exercise.is_daily_challenge,
                })
            })
            .collect()
    }
}
