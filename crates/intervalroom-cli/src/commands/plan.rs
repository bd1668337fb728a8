use std::path::PathBuf;

use clap::Subcommand;
use intervalroom_core::{format_clock, WorkoutPlan};
use serde::Serialize;

use super::load_plan;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Check that a plan file can be played
    Validate {
        /// Path to the plan JSON
        file: PathBuf,
    },
    /// Print the intervals, timers and durations of a plan
    Show {
        /// Path to the plan JSON
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct IntervalSummary {
    label: String,
    repetitions: u32,
    timer_secs: Vec<u64>,
    repetition_secs: u64,
    total_secs: u64,
}

#[derive(Serialize)]
struct PlanSummary {
    name: Option<String>,
    intervals: Vec<IntervalSummary>,
    total_repetitions: u64,
    total_secs: u64,
}

impl PlanSummary {
    fn new(plan: &WorkoutPlan) -> Self {
        Self {
            name: plan.name.clone(),
            intervals: plan
                .intervals
                .iter()
                .enumerate()
                .map(|(i, interval)| IntervalSummary {
                    label: interval.label(i),
                    repetitions: interval.repetitions,
                    timer_secs: interval.timers.iter().map(|t| t.duration_secs()).collect(),
                    repetition_secs: interval.repetition_secs(),
                    total_secs: interval.total_secs(),
                })
                .collect(),
            total_repetitions: plan.total_repetitions(),
            total_secs: plan.total_duration_secs(),
        }
    }

    fn print_text(&self) {
        println!("{}", self.name.as_deref().unwrap_or("Workout"));
        for (i, interval) in self.intervals.iter().enumerate() {
            println!(
                "  {}. {} x{} ({} per round, {} total)",
                i + 1,
                interval.label,
                interval.repetitions,
                format_clock(interval.repetition_secs),
                format_clock(interval.total_secs),
            );
            for secs in &interval.timer_secs {
                println!("     - {}", format_clock(*secs));
            }
        }
        println!(
            "Total: {} ({} intervals, {} repetitions)",
            format_clock(self.total_secs),
            self.intervals.len(),
            self.total_repetitions
        );
    }
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Validate { file } => {
            let plan = load_plan(&file)?;
            plan.validate()?;
            println!(
                "ok: {} intervals, {} timer runs, {} total",
                plan.intervals.len(),
                plan.timer_runs(),
                format_clock(plan.total_duration_secs())
            );
        }
        PlanAction::Show { file, json } => {
            let plan = load_plan(&file)?;
            plan.validate()?;
            let summary = PlanSummary::new(&plan);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                summary.print_text();
            }
        }
    }
    Ok(())
}
