//! Integration tests for workout playback.
//!
//! Drives the sequencer the way the CLI does: build a plan from the app's
//! JSON, tick until `WorkoutComplete`, and hand off a completion record.

use chrono::Utc;
use intervalroom_core::{
    CompletedWorkout, Event, PlaybackError, Sequencer, SequencerStatus, WorkoutPlan,
};

const TWO_INTERVALS: &str = r#"{
    "name": "Leg day",
    "intervals": [
        {"id": "iv-1", "name": "Squats", "order": 0, "repetitions": 1,
         "timers": [{"minutes": 0, "seconds": 3, "order": 0}]},
        {"id": "iv-2", "order": 1, "repetitions": 1,
         "timers": [{"minutes": 0, "seconds": 4, "order": 0}]}
    ]
}"#;

/// Tick until completion, returning the tick count and every event seen.
fn run_to_completion(seq: &mut Sequencer) -> (u64, Vec<Event>) {
    let mut ticks = 0;
    let mut events = Vec::new();
    loop {
        ticks += 1;
        if let Some(event) = seq.tick().unwrap() {
            let done = event.is_complete();
            events.push(event);
            if done {
                return (ticks, events);
            }
        }
        assert!(ticks < 100_000, "sequencer never completed");
    }
}

#[test]
fn test_repeated_interval_sequence() {
    let json = r#"[{"order": 0, "repetitions": 2, "timers": [
        {"minutes": 0, "seconds": 5, "order": 0},
        {"minutes": 0, "seconds": 2, "order": 1}
    ]}]"#;
    let mut seq = Sequencer::new(WorkoutPlan::from_json(json).unwrap()).unwrap();

    let mut visited = vec![];
    loop {
        let s = *seq.state();
        visited.push((s.interval_index, s.timer_index, s.repetition, s.remaining_secs));
        if seq.advance_timer().unwrap().unwrap().is_complete() {
            break;
        }
    }
    assert_eq!(
        visited,
        vec![(0, 0, 1, 5), (0, 1, 1, 2), (0, 0, 2, 5), (0, 1, 2, 2)]
    );

    let mut seq = Sequencer::new(WorkoutPlan::from_json(json).unwrap()).unwrap();
    let (ticks, _) = run_to_completion(&mut seq);
    assert_eq!(ticks, 14);
    assert_eq!(seq.total_elapsed_secs(), 14);
}

#[test]
fn test_skip_first_interval() {
    let mut seq = Sequencer::new(WorkoutPlan::from_json(TWO_INTERVALS).unwrap()).unwrap();
    seq.skip_to_next_interval().unwrap();
    let s = seq.state();
    assert_eq!((s.interval_index, s.timer_index, s.repetition), (1, 0, 1));
    assert_eq!(s.remaining_secs, 4);

    let (ticks, _) = run_to_completion(&mut seq);
    assert_eq!(ticks, 4);
}

#[test]
fn test_interval_events_carry_names() {
    let mut seq = Sequencer::new(WorkoutPlan::from_json(TWO_INTERVALS).unwrap()).unwrap();
    let (_, events) = run_to_completion(&mut seq);
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::IntervalStarted {
            interval_index,
            interval_name,
            ..
        } => {
            assert_eq!(*interval_index, 1);
            assert!(interval_name.is_none());
        }
        other => panic!("Expected IntervalStarted, got {other:?}"),
    }
    assert!(events[1].is_complete());
}

#[test]
fn test_completion_hand_off() {
    let plan = WorkoutPlan::from_json(TWO_INTERVALS).unwrap();
    let mut seq = Sequencer::new(plan).unwrap();
    let (_, events) = run_to_completion(&mut seq);

    let stats = match events.last() {
        Some(Event::WorkoutComplete { stats, .. }) => stats.clone(),
        other => panic!("Expected WorkoutComplete, got {other:?}"),
    };
    assert_eq!(stats.total_elapsed_secs, 7);
    assert_eq!(stats.interval_count, 2);
    assert_eq!(stats.total_repetitions, 2);
    assert!(!stats.ended_early);
    assert_eq!(stats.session_id, seq.session_id());

    let record = CompletedWorkout::from_stats(&stats, Some("w-42".into()), "1", Utc::now()).unwrap();
    assert_eq!(record.duration_seconds, 7);
    assert_eq!(record.total_secs(), stats.total_elapsed_secs);
}

#[test]
fn test_finished_sequencer_stays_finished() {
    let mut seq = Sequencer::new(WorkoutPlan::from_json(TWO_INTERVALS).unwrap()).unwrap();
    seq.skip_to_next_interval().unwrap();
    assert!(seq.skip_to_next_interval().unwrap().unwrap().is_complete());
    assert_eq!(seq.status(), SequencerStatus::Complete);
    assert_eq!(seq.tick(), Err(PlaybackError::WorkoutFinished));
    // Queries keep working after completion.
    assert!(matches!(
        seq.snapshot(),
        Event::StateSnapshot {
            status: SequencerStatus::Complete,
            total_remaining_secs: 0,
            ..
        }
    ));
}

#[test]
fn test_events_serialize_with_type_tag() {
    let mut seq = Sequencer::new(WorkoutPlan::from_json(TWO_INTERVALS).unwrap()).unwrap();
    let event = seq.pause().unwrap().unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "WorkoutPaused");
    assert_eq!(json["remaining_secs"], 3);
    let back: Event = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_malformed_plan_rejected() {
    let json = r#"{"intervals": [{"order": 0, "repetitions": 1, "timers": []}]}"#;
    let plan = WorkoutPlan::from_json(json).unwrap();
    assert!(matches!(
        Sequencer::new(plan),
        Err(PlaybackError::InvalidPlan(_))
    ));
}
