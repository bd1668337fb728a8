//! Completed-workout hand-off record.
//!
//! When playback ends, the app records the session with its backend. This
//! module builds that payload with the same JSON keys the backend expects,
//! and the date-range filter used by the history view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sequencer::WorkoutStats;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedWorkout {
    pub id: Uuid,
    #[serde(rename = "workoutId", default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "dateCompleted")]
    pub date_completed: DateTime<Utc>,
    pub duration_hours: u64,
    pub duration_minutes: u64,
    pub duration_seconds: u64,
}

impl CompletedWorkout {
    /// Build the record for a finished session.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidValue` if `user_id` is blank.
    pub fn from_stats(
        stats: &WorkoutStats,
        workout_id: Option<String>,
        user_id: &str,
        date_completed: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "userId".into(),
                message: "must not be empty".into(),
            });
        }
        let (duration_hours, duration_minutes, duration_seconds) =
            split_duration(stats.total_elapsed_secs);
        Ok(Self {
            id: stats.session_id,
            workout_id,
            user_id: user_id.to_string(),
            date_completed,
            duration_hours,
            duration_minutes,
            duration_seconds,
        })
    }

    pub fn total_secs(&self) -> u64 {
        self.duration_hours * 3600 + self.duration_minutes * 60 + self.duration_seconds
    }
}

/// Split seconds into (hours, minutes, seconds).
pub fn split_duration(secs: u64) -> (u64, u64, u64) {
    (secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Half-open range `[start, end)` over completion dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl CompletedRange {
    /// # Errors
    /// Returns `ValidationError::InvalidRange` unless `end` is after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    pub fn filter<'a>(
        &self,
        records: &'a [CompletedWorkout],
    ) -> impl Iterator<Item = &'a CompletedWorkout> + 'a {
        let range = *self;
        records
            .iter()
            .filter(move |r| range.contains(r.date_completed))
    }
}
