//! # Intervalroom Core Library
//!
//! Core logic for the Intervalroom interval timer. The CLI is a thin driver
//! over this crate.
//!
//! ## Architecture
//!
//! - **Workout plans**: intervals of timers, repeated a fixed number of
//!   times, loaded from the app's JSON format
//! - **Sequencer**: a tick-driven state machine; the caller invokes `tick()`
//!   once per second and receives [`Event`]s on every transition
//! - **Completion**: the record handed to the backend when a workout ends
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Sequencer`]: playback state machine
//! - [`WorkoutPlan`]: immutable plan input
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod workout;

pub use error::{ConfigError, CoreError, PlaybackError, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use workout::{
    format_clock, CompletedRange, CompletedWorkout, Interval, PlaybackState, Sequencer,
    SequencerStatus, Timer, WorkoutPlan, WorkoutStats,
};
