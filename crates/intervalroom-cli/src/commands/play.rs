//! Workout playback driver.
//!
//! Owns the only `Sequencer` for the session and calls `tick()` once per
//! period from a tokio interval on a current-thread runtime. Controls are
//! read one per line from stdin:
//!
//! ```text
//! p  pause        r  resume
//! n  next timer   i  next interval
//! q  quit (no completion record)
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use intervalroom_core::storage::{CountdownSound, PlaybackConfig};
use intervalroom_core::{
    format_clock, CompletedWorkout, Config, Event, PlaybackError, Sequencer, WorkoutStats,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use super::load_plan;

#[derive(Args)]
pub struct PlayArgs {
    /// Path to the plan JSON
    file: PathBuf,
    /// Milliseconds per tick (overrides playback.tick_ms)
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
    /// User id for the completion record
    #[arg(long, default_value = "1")]
    user_id: String,
    /// Workout id for the completion record
    #[arg(long)]
    workout_id: Option<String>,
}

/// A user command read from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    NextTimer,
    NextInterval,
    Quit,
}

impl Control {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "n" | "next" => Some(Self::NextTimer),
            "i" | "interval" => Some(Self::NextInterval),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }

    fn apply(self, seq: &mut Sequencer) -> Result<Option<Event>, PlaybackError> {
        match self {
            Self::Pause => seq.pause(),
            Self::Resume => seq.resume(),
            Self::NextTimer => seq.skip_to_next_timer(),
            Self::NextInterval => seq.skip_to_next_interval(),
            Self::Quit => Ok(None),
        }
    }
}

/// Renders sequencer events as text or JSON lines.
struct Printer {
    json: bool,
    playback: PlaybackConfig,
}

impl Printer {
    fn start(&self, seq: &Sequencer) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string(&seq.snapshot())?);
            return Ok(());
        }
        let plan = seq.plan();
        println!(
            "{} ({} total)",
            plan.name.as_deref().unwrap_or("Workout"),
            format_clock(seq.total_remaining_secs())
        );
        self.announce_interval(seq);
        self.announce_timer(seq);
        Ok(())
    }

    fn event(&self, seq: &Sequencer, event: &Event) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }
        match event {
            Event::IntervalStarted { .. } => {
                self.announce_interval(seq);
                self.announce_timer(seq);
            }
            Event::RepetitionStarted {
                repetition,
                repetitions,
                ..
            } => {
                println!("  Repetition {repetition} of {repetitions}");
                self.announce_timer(seq);
            }
            Event::TimerStarted { .. } => self.announce_timer(seq),
            Event::WorkoutPaused { remaining_secs, .. } => {
                println!("  Paused ({} left in timer)", format_clock(*remaining_secs));
            }
            Event::WorkoutResumed { .. } => println!("  Resumed"),
            Event::WorkoutComplete { stats, .. } => {
                println!(
                    "Workout complete! Total time {}, intervals {}, repetitions {}",
                    format_clock(stats.total_elapsed_secs),
                    stats.interval_count,
                    stats.total_repetitions
                );
            }
            _ => {}
        }
        Ok(())
    }

    /// Countdown cue for the last seconds of a timer.
    fn countdown(&self, remaining_secs: u64) -> Result<(), serde_json::Error> {
        let sound = self.playback.countdown_sound;
        if sound == CountdownSound::None
            || remaining_secs == 0
            || remaining_secs > self.playback.countdown_seconds
        {
            return Ok(());
        }
        if self.json {
            let cue = serde_json::json!({
                "type": "Countdown",
                "sound": sound,
                "remaining_secs": remaining_secs,
            });
            println!("{}", serde_json::to_string(&cue)?);
        } else if sound == CountdownSound::Voice {
            println!("    {remaining_secs}...");
        } else {
            println!("    beep ({remaining_secs})");
        }
        Ok(())
    }

    fn stopped(&self, seq: &Sequencer) -> Result<(), serde_json::Error> {
        if self.json {
            let line = serde_json::json!({ "type": "Stopped", "stats": seq.stats() });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!(
                "Workout stopped after {}",
                format_clock(seq.total_elapsed_secs())
            );
        }
        Ok(())
    }

    fn record(&self, record: &CompletedWorkout) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        Ok(())
    }

    fn announce_interval(&self, seq: &Sequencer) {
        let state = seq.state();
        let interval = seq.current_interval();
        if self.playback.announce_interval_name {
            println!(
                "Interval {} of {}: {} x{}",
                state.interval_index + 1,
                seq.plan().intervals.len(),
                interval.label(state.interval_index),
                interval.repetitions
            );
        } else {
            println!(
                "Interval {} of {}",
                state.interval_index + 1,
                seq.plan().intervals.len()
            );
        }
    }

    fn announce_timer(&self, seq: &Sequencer) {
        let state = seq.state();
        let count = seq.current_interval().timers.len();
        if self.playback.announce_time_at_timer_start {
            println!(
                "  Timer {} of {} ({})",
                state.timer_index + 1,
                count,
                format_clock(state.remaining_secs)
            );
        } else {
            println!("  Timer {} of {}", state.timer_index + 1, count);
        }
    }
}

/// Run the session to completion. Returns `None` if the user quit.
async fn drive(
    mut seq: Sequencer,
    period: Duration,
    printer: &Printer,
) -> Result<Option<WorkoutStats>, Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    printer.start(&seq)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        let event = tokio::select! {
            _ = ticker.tick() => match seq.tick()? {
                Some(event) => event,
                None => {
                    printer.countdown(seq.state().remaining_secs)?;
                    continue;
                }
            },
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed, controls disabled");
                    stdin_open = false;
                    continue;
                };
                let Some(control) = Control::parse(&line) else {
                    if !line.trim().is_empty() {
                        tracing::warn!(input = %line.trim(), "unknown control (p, r, n, i, q)");
                    }
                    continue;
                };
                tracing::debug!(?control, "control received");
                if control == Control::Quit {
                    printer.stopped(&seq)?;
                    return Ok(None);
                }
                match control.apply(&mut seq)? {
                    Some(event) => event,
                    None => continue,
                }
            }
        };

        printer.event(&seq, &event)?;
        if let Event::WorkoutComplete { stats, .. } = event {
            return Ok(Some(stats));
        }
    }
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tick_ms = args.tick_ms.unwrap_or(config.playback.tick_ms);
    if tick_ms == 0 {
        return Err("--tick-ms must be greater than 0".into());
    }

    let plan = load_plan(&args.file)?;
    let seq = Sequencer::new(plan)?;
    tracing::info!(session = %seq.session_id(), tick_ms, "starting playback");

    let printer = Printer {
        json: args.json || config.display.json,
        playback: config.playback,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let outcome = runtime.block_on(drive(seq, Duration::from_millis(tick_ms), &printer));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    let Some(stats) = outcome? else {
        return Ok(());
    };

    let record = CompletedWorkout::from_stats(&stats, args.workout_id, &args.user_id, Utc::now())?;
    printer.record(&record)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intervalroom_core::{Interval, Timer, WorkoutPlan};

    fn two_intervals() -> Sequencer {
        Sequencer::new(WorkoutPlan::new(
            None,
            vec![
                Interval::new(None, 2, 0, vec![Timer::new(0, 5, 0), Timer::new(0, 5, 1)]),
                Interval::new(None, 1, 1, vec![Timer::new(0, 4, 0)]),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn parses_short_and_long_controls() {
        assert_eq!(Control::parse("p"), Some(Control::Pause));
        assert_eq!(Control::parse(" Resume \n"), Some(Control::Resume));
        assert_eq!(Control::parse("n"), Some(Control::NextTimer));
        assert_eq!(Control::parse("interval"), Some(Control::NextInterval));
        assert_eq!(Control::parse("q"), Some(Control::Quit));
        assert_eq!(Control::parse("x"), None);
        assert_eq!(Control::parse(""), None);
    }

    #[test]
    fn controls_drive_the_sequencer() {
        let mut seq = two_intervals();
        assert!(matches!(
            Control::Pause.apply(&mut seq),
            Ok(Some(Event::WorkoutPaused { .. }))
        ));
        assert!(matches!(
            Control::Resume.apply(&mut seq),
            Ok(Some(Event::WorkoutResumed { .. }))
        ));
        assert!(matches!(
            Control::NextTimer.apply(&mut seq),
            Ok(Some(Event::TimerStarted { timer_index: 1, .. }))
        ));
        assert!(matches!(
            Control::NextInterval.apply(&mut seq),
            Ok(Some(Event::IntervalStarted { interval_index: 1, .. }))
        ));
        let done = Control::NextInterval.apply(&mut seq).unwrap().unwrap();
        assert!(done.is_complete());
        assert_eq!(
            Control::Pause.apply(&mut seq),
            Err(PlaybackError::WorkoutFinished)
        );
    }
}
