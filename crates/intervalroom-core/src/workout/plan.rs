//! Workout plan model.
//!
//! A plan is an ordered list of intervals, each holding an ordered list of
//! timers and a repetition count. Plans are played in list order; the
//! `order` fields are carried through so the JSON the app stores survives a
//! round trip unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

/// A single countdown segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub minutes: u32,
    pub seconds: u32,
    /// Position within the owning interval.
    #[serde(default)]
    pub order: u32,
}

impl Timer {
    pub fn new(minutes: u32, seconds: u32, order: u32) -> Self {
        Self {
            minutes,
            seconds,
            order,
        }
    }

    /// Timer duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    fn validate(&self, interval: usize, timer: usize) -> Result<(), ValidationError> {
        if self.minutes > MAX_MINUTES {
            return Err(ValidationError::OutOfRange {
                field: format!("intervals[{interval}].timers[{timer}].minutes"),
                value: u64::from(self.minutes),
                min: 0,
                max: u64::from(MAX_MINUTES),
            });
        }
        if self.seconds > MAX_SECONDS {
            return Err(ValidationError::OutOfRange {
                field: format!("intervals[{interval}].timers[{timer}].seconds"),
                value: u64::from(self.seconds),
                min: 0,
                max: u64::from(MAX_SECONDS),
            });
        }
        Ok(())
    }
}

/// A group of timers played `repetitions` times in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub repetitions: u32,
    #[serde(default)]
    pub order: u32,
    pub timers: Vec<Timer>,
}

impl Interval {
    pub fn new(name: Option<&str>, repetitions: u32, order: u32, timers: Vec<Timer>) -> Self {
        Self {
            id: None,
            name: name.map(str::to_string),
            repetitions,
            order,
            timers,
        }
    }

    /// Duration of one pass through the timers.
    pub fn repetition_secs(&self) -> u64 {
        self.timers.iter().map(Timer::duration_secs).sum()
    }

    /// Duration of all repetitions.
    pub fn total_secs(&self) -> u64 {
        self.repetition_secs()
            .saturating_mul(u64::from(self.repetitions))
    }

    /// Display label: the name if set, otherwise "Interval N".
    pub fn label(&self, index: usize) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Interval {}", index + 1),
        }
    }

    fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.repetitions == 0 {
            return Err(ValidationError::OutOfRange {
                field: format!("intervals[{index}].repetitions"),
                value: 0,
                min: 1,
                max: u64::from(u32::MAX),
            });
        }
        if self.timers.is_empty() {
            return Err(ValidationError::EmptyCollection(format!(
                "intervals[{index}].timers"
            )));
        }
        for (i, timer) in self.timers.iter().enumerate() {
            timer.validate(index, i)?;
        }
        Ok(())
    }
}

/// The complete, immutable definition of a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub intervals: Vec<Interval>,
}

impl WorkoutPlan {
    pub fn new(name: Option<&str>, intervals: Vec<Interval>) -> Self {
        Self {
            name: name.map(str::to_string),
            intervals,
        }
    }

    /// Parse a plan from JSON. Does not validate.
    ///
    /// Accepts a full plan object, or the bare interval list the playback
    /// screen receives. The root shape picks the target type, so field
    /// errors are reported as-is.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim_start().starts_with('[') {
            let intervals: Vec<Interval> = serde_json::from_str(json)?;
            return Ok(Self {
                name: None,
                intervals,
            });
        }
        serde_json::from_str(json)
    }

    /// Read and parse a plan file. Does not validate.
    ///
    /// # Errors
    /// Returns `CoreError::Io` if the file can't be read and
    /// `CoreError::Json` if it isn't a plan.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let plan = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), intervals = plan.intervals.len(), "plan loaded");
        Ok(plan)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the structural invariants playback relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.intervals.is_empty() {
            return Err(ValidationError::EmptyCollection("intervals".into()));
        }
        for (i, interval) in self.intervals.iter().enumerate() {
            interval.validate(i)?;
        }
        Ok(())
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.intervals.iter().map(Interval::total_secs).sum()
    }

    pub fn total_repetitions(&self) -> u64 {
        self.intervals
            .iter()
            .map(|i| u64::from(i.repetitions))
            .sum()
    }

    /// Number of timer runs a full playback goes through.
    pub fn timer_runs(&self) -> u64 {
        self.intervals
            .iter()
            .map(|i| i.timers.len() as u64 * u64::from(i.repetitions))
            .sum()
    }
}

/// Render seconds as `m:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
