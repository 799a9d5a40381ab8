#![forbid(unsafe_code)]

//! Core storage and domain logic for GymTrack.
//!
//! This crate provides:
//! - Record types (exercises, workouts, sessions, daily challenges)
//! - SQLite schema and the built-in seed catalog
//! - Session, challenge and workout queries
//! - Workout plans, challenge streaks and CSV export
//! - The health-tracking capability contract and workout recorder

pub mod types;
pub mod error;
pub mod schema;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod database;
pub mod queries;
pub mod plan;
pub mod streak;
pub mod export;
pub mod health;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use database::Database;
pub use plan::{PlanExercise, PlanStep, WorkoutPlan};
pub use streak::{current_streak, longest_streak};
pub use export::export_sessions_csv;
pub use health::{HealthError, HealthTracker, NoopHealthTracker, WorkoutRecorder};
