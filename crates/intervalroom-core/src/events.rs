use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workout::{SequencerStatus, WorkoutStats};

/// Every observable state change in a playback session produces an Event.
/// The driver prints them; a UI would render or announce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Moved to another timer within the same repetition.
    TimerStarted {
        interval_index: usize,
        timer_index: usize,
        repetition: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Started the next pass through the current interval.
    RepetitionStarted {
        interval_index: usize,
        repetition: u32,
        repetitions: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Entered a new interval at timer 0, repetition 1.
    IntervalStarted {
        interval_index: usize,
        interval_name: Option<String>,
        repetitions: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    WorkoutResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Terminal event. No command is accepted afterwards.
    WorkoutComplete {
        stats: WorkoutStats,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: SequencerStatus,
        interval_index: usize,
        interval_name: Option<String>,
        interval_count: usize,
        timer_index: usize,
        timer_count: usize,
        repetition: u32,
        repetitions: u32,
        remaining_secs: u64,
        timer_duration_secs: u64,
        total_elapsed_secs: u64,
        total_remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_complete(&self) -> bool {
        matches!(self, Event::WorkoutComplete { .. })
    }
}
