mod completion;
mod plan;
mod sequencer;

pub use completion::{split_duration, CompletedRange, CompletedWorkout};
pub use plan::{format_clock, Interval, Timer, WorkoutPlan, MAX_MINUTES, MAX_SECONDS};
pub use sequencer::{PlaybackState, Sequencer, SequencerStatus, WorkoutStats};
