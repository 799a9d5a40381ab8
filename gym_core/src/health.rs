//! Platform health-tracking integration.
//!
//! The health tracker is a best-effort side channel: its failures are logged
//! and dropped, and never prevent a session from being stored.

use crate::{Database, HealthActivityKind, Result, Session, SessionType};
use chrono::NaiveDateTime;

pub type HealthResult<T> = std::result::Result<T, HealthError>;

/// Failures reported by a health tracker
#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health tracking unavailable: {0}")]
    Unavailable(String),

    #[error("Health tracker rejected the request: {0}")]
    Rejected(String),
}

/// Capability contract of the platform health-tracking service
pub trait HealthTracker {
    /// Ask for permission to write workouts; a no-op once decided
    fn request_authorization_if_needed(&mut self);

    fn start_workout(&mut self, kind: HealthActivityKind, start: NaiveDateTime) -> HealthResult<()>;

    fn end_workout(&mut self, end: NaiveDateTime) -> HealthResult<()>;

    /// Drop the workout in progress without saving it
    fn discard_workout(&mut self);
}

impl<T: HealthTracker + ?Sized> HealthTracker for &mut T {
    fn request_authorization_if_needed(&mut self) {
        (**self).request_authorization_if_needed()
    }

    fn start_workout(&mut self, kind: HealthActivityKind, start: NaiveDateTime) -> HealthResult<()> {
        (**self).start_workout(kind, start)
    }

    fn end_workout(&mut self, end: NaiveDateTime) -> HealthResult<()> {
        (**self).end_workout(end)
    }

    fn discard_workout(&mut self) {
        (**self).discard_workout()
    }
}

/// Tracker for platforms without a health service
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHealthTracker;

impl HealthTracker for NoopHealthTracker {
    fn request_authorization_if_needed(&mut self) {}

    fn start_workout(&mut self, _kind: HealthActivityKind, _start: NaiveDateTime) -> HealthResult<()> {
        Ok(())
    }

    fn end_workout(&mut self, _end: NaiveDateTime) -> HealthResult<()> {
        Ok(())
    }

    fn discard_workout(&mut self) {}
}

/// One workout attempt in progress
///
/// Created by [`WorkoutRecorder::begin`], consumed by `finish` or `abort`,
/// each of which stores exactly one session.
pub struct WorkoutRecorder<'db, T: HealthTracker> {
    db: &'db Database,
    tracker: T,
    session_type: SessionType,
    started_at: NaiveDateTime,
    discard_threshold_seconds: i64,
}

impl<'db, T: HealthTracker> WorkoutRecorder<'db, T> {
    /// Start a workout and tell the health tracker about it
    pub fn begin(
        db: &'db Database,
        mut tracker: T,
        session_type: SessionType,
        started_at: NaiveDateTime,
        discard_threshold_seconds: i64,
    ) -> Self {
        tracker.request_authorization_if_needed();
        if let Err(e) = tracker.start_workout(session_type.activity_kind(), started_at) {
            tracing::warn!("Failed to start health workout: {}", e);
        }
        tracing::debug!("Began {} workout at {}", session_type, started_at);

        Self {
            db,
            tracker,
            session_type,
            started_at,
            discard_threshold_seconds,
        }
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    fn elapsed_seconds(&self, at: NaiveDateTime) -> i64 {
        (at - self.started_at).num_seconds().max(0)
    }

    /// Complete the workout and store a full session
    pub fn finish(mut self, ended_at: NaiveDateTime) -> Result<Session> {
        if let Err(e) = self.tracker.end_workout(ended_at) {
            tracing::warn!("Failed to end health workout: {}", e);
        }
        self.store(ended_at, false)
    }

    /// End the workout early and store a partial session
    ///
    /// The health workout is kept only if it ran for at least the discard
    /// threshold; shorter attempts are discarded from the tracker.
    pub fn abort(mut self, ended_at: NaiveDateTime) -> Result<Session> {
        if self.elapsed_seconds(ended_at) < self.discard_threshold_seconds {
            self.tracker.discard_workout();
        } else if let Err(e) = self.tracker.end_workout(ended_at) {
            tracing::warn!("Failed to end health workout: {}", e);
        }
        self.store(ended_at, true)
    }

    fn store(&self, ended_at: NaiveDateTime, is_partial: bool) -> Result<Session> {
        self.db.insert_session(
            self.session_type,
            self.started_at.date(),
            self.started_at,
            self.elapsed_seconds(ended_at),
            is_partial,
        )
    }
}
