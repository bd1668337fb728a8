//! Workout playback sequencer.
//!
//! The sequencer is a tick-driven state machine. It has no internal timing:
//! the caller invokes `tick()` once per second of wall-clock time while the
//! workout is running.
//!
//! ## Transitions on timer expiry
//!
//! ```text
//! next timer -> next repetition -> next interval -> WorkoutComplete
//! ```
//!
//! Each rule is tried in order; the first that applies wins. The user-facing
//! skips are narrower: `skip_to_next_timer()` never leaves the current
//! repetition, and `skip_to_next_interval()` on the last interval ends the
//! workout outright.
//!
//! ## Usage
//!
//! ```ignore
//! let mut seq = Sequencer::new(plan)?;
//! loop {
//!     if let Some(event) = seq.tick()? {
//!         if event.is_complete() { break; }
//!     }
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::{Interval, Timer, WorkoutPlan};
use crate::error::PlaybackError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencerStatus {
    Running,
    Paused,
    Complete,
}

/// Playback cursor. Owned by a single [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub interval_index: usize,
    pub timer_index: usize,
    /// 1-based pass number through the current interval.
    pub repetition: u32,
    pub remaining_secs: u64,
    pub running: bool,
}

/// Aggregates handed to the completion screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub session_id: Uuid,
    pub total_elapsed_secs: u64,
    pub interval_count: usize,
    pub total_repetitions: u64,
    /// Finished through `skip_to_next_interval()` on the last interval.
    pub ended_early: bool,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    plan: WorkoutPlan,
    state: PlaybackState,
    session_id: Uuid,
    elapsed_secs: u64,
    complete: bool,
    ended_early: bool,
}

impl Sequencer {
    /// Create a sequencer for `plan`, positioned on the first timer and running.
    ///
    /// # Errors
    /// Returns `PlaybackError::InvalidPlan` if the plan has no intervals, an
    /// interval has no timers or zero repetitions, or a timer is out of range.
    pub fn new(plan: WorkoutPlan) -> Result<Self, PlaybackError> {
        plan.validate()?;
        let remaining_secs = plan.intervals[0].timers[0].duration_secs();
        tracing::debug!(
            intervals = plan.intervals.len(),
            total_secs = plan.total_duration_secs(),
            "sequencer created"
        );
        Ok(Self {
            plan,
            state: PlaybackState {
                interval_index: 0,
                timer_index: 0,
                repetition: 1,
                remaining_secs,
                running: true,
            },
            session_id: Uuid::new_v4(),
            elapsed_secs: 0,
            complete: false,
            ended_early: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn status(&self) -> SequencerStatus {
        if self.complete {
            SequencerStatus::Complete
        } else if self.state.running {
            SequencerStatus::Running
        } else {
            SequencerStatus::Paused
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current_interval(&self) -> &Interval {
        &self.plan.intervals[self.state.interval_index]
    }

    pub fn current_timer(&self) -> &Timer {
        &self.current_interval().timers[self.state.timer_index]
    }

    /// Seconds actually ticked down so far. Skipped time is not counted.
    pub fn total_elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Seconds left if playback runs to the end without skips.
    ///
    /// Derived from the cursor on every call.
    pub fn total_remaining_secs(&self) -> u64 {
        if self.complete {
            return 0;
        }
        let interval = self.current_interval();
        let rest_of_pass: u64 = interval.timers[self.state.timer_index + 1..]
            .iter()
            .map(Timer::duration_secs)
            .sum();
        let later_passes = u64::from(interval.repetitions - self.state.repetition)
            * interval.repetition_secs();
        let later_intervals: u64 = self.plan.intervals[self.state.interval_index + 1..]
            .iter()
            .map(Interval::total_secs)
            .sum();
        self.state.remaining_secs + rest_of_pass + later_passes + later_intervals
    }

    pub fn stats(&self) -> WorkoutStats {
        WorkoutStats {
            session_id: self.session_id,
            total_elapsed_secs: self.elapsed_secs,
            interval_count: self.plan.intervals.len(),
            total_repetitions: self.plan.total_repetitions(),
            ended_early: self.ended_early,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let interval = self.current_interval();
        Event::StateSnapshot {
            status: self.status(),
            interval_index: self.state.interval_index,
            interval_name: interval.name.clone(),
            interval_count: self.plan.intervals.len(),
            timer_index: self.state.timer_index,
            timer_count: interval.timers.len(),
            repetition: self.state.repetition,
            repetitions: interval.repetitions,
            remaining_secs: self.state.remaining_secs,
            timer_duration_secs: self.current_timer().duration_secs(),
            total_elapsed_secs: self.elapsed_secs,
            total_remaining_secs: self.total_remaining_secs(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Count down one second. The tick that reaches zero advances the timer.
    pub fn tick(&mut self) -> Result<Option<Event>, PlaybackError> {
        self.ensure_active("tick")?;
        if !self.state.running {
            return Ok(None);
        }
        if self.state.remaining_secs > 0 {
            self.state.remaining_secs -= 1;
            self.elapsed_secs += 1;
        }
        if self.state.remaining_secs == 0 {
            return self.advance_timer();
        }
        Ok(None)
    }

    /// Natural expiry of the active timer.
    pub fn advance_timer(&mut self) -> Result<Option<Event>, PlaybackError> {
        self.ensure_active("advance_timer")?;
        let interval = self.current_interval();
        let timer_count = interval.timers.len();
        let repetitions = interval.repetitions;

        if self.state.timer_index + 1 < timer_count {
            return Ok(Some(self.enter_timer(self.state.timer_index + 1)));
        }

        if self.state.repetition < repetitions {
            self.state.repetition += 1;
            self.state.timer_index = 0;
            self.state.remaining_secs = self.current_timer().duration_secs();
            tracing::debug!(
                interval = self.state.interval_index,
                repetition = self.state.repetition,
                "repetition started"
            );
            return Ok(Some(Event::RepetitionStarted {
                interval_index: self.state.interval_index,
                repetition: self.state.repetition,
                repetitions,
                duration_secs: self.state.remaining_secs,
                at: Utc::now(),
            }));
        }

        if self.state.interval_index + 1 < self.plan.intervals.len() {
            return Ok(Some(self.enter_interval(self.state.interval_index + 1)));
        }

        Ok(Some(self.finish(false)))
    }

    /// Move to the next timer of the current repetition. No-op on the last timer.
    pub fn skip_to_next_timer(&mut self) -> Result<Option<Event>, PlaybackError> {
        self.ensure_active("skip_to_next_timer")?;
        if self.state.timer_index + 1 >= self.current_interval().timers.len() {
            return Ok(None);
        }
        Ok(Some(self.enter_timer(self.state.timer_index + 1)))
    }

    /// Jump to the next interval, or end the workout if this is the last one.
    pub fn skip_to_next_interval(&mut self) -> Result<Option<Event>, PlaybackError> {
        self.ensure_active("skip_to_next_interval")?;
        if self.state.interval_index + 1 >= self.plan.intervals.len() {
            return Ok(Some(self.finish(true)));
        }
        Ok(Some(self.enter_interval(self.state.interval_index + 1)))
    }

    pub fn pause(&mut self) -> Result<Option<Event>, PlaybackError> {
        self.ensure_active("pause")?;
        if !self.state.running {
            return Ok(None);
        }
        self.state.running = false;
        Ok(Some(Event::WorkoutPaused {
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }))
    }

    pub fn resume(&mut self) -> Result<Option<Event>, PlaybackError> {
        self.ensure_active("resume")?;
        if self.state.running {
            return Ok(None);
        }
        self.state.running = true;
        Ok(Some(Event::WorkoutResumed {
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn ensure_active(&self, command: &str) -> Result<(), PlaybackError> {
        if self.complete {
            tracing::warn!(command, "rejected: workout already complete");
            return Err(PlaybackError::WorkoutFinished);
        }
        Ok(())
    }

    fn enter_timer(&mut self, timer_index: usize) -> Event {
        self.state.timer_index = timer_index;
        self.state.remaining_secs = self.current_timer().duration_secs();
        tracing::debug!(
            interval = self.state.interval_index,
            timer = timer_index,
            repetition = self.state.repetition,
            "timer started"
        );
        Event::TimerStarted {
            interval_index: self.state.interval_index,
            timer_index,
            repetition: self.state.repetition,
            duration_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    fn enter_interval(&mut self, interval_index: usize) -> Event {
        self.state.interval_index = interval_index;
        self.state.timer_index = 0;
        self.state.repetition = 1;
        self.state.remaining_secs = self.current_timer().duration_secs();
        let interval = self.current_interval();
        tracing::debug!(interval = interval_index, "interval started");
        Event::IntervalStarted {
            interval_index,
            interval_name: interval.name.clone(),
            repetitions: interval.repetitions,
            duration_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    fn finish(&mut self, ended_early: bool) -> Event {
        self.complete = true;
        self.ended_early = ended_early;
        self.state.running = false;
        self.state.remaining_secs = 0;
        let stats = self.stats();
        tracing::info!(
            session = %stats.session_id,
            elapsed_secs = stats.total_elapsed_secs,
            ended_early,
            "workout complete"
        );
        Event::WorkoutComplete {
            stats,
            at: Utc::now(),
        }
    }
}
