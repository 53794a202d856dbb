#![no_main]

//! Drives a `MotionTimeline` with arbitrary direction changes, ticks, and
//! forced jumps, checking that progress stays bounded and every completion
//! event names a canonical state pair.

use std::time::Duration;

use arbitrary::Arbitrary;
use dais_core::motion::{Easing, MotionConfig, MotionState, MotionTimeline};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    StartOpening,
    StartClosing,
    Tick { millis: u16 },
    ForceOpen,
    ForceClose,
    SetReducedMotion { on: bool },
}

#[derive(Debug, Arbitrary)]
struct Plan {
    enter_millis: u16,
    exit_millis: u16,
    respect_reduced: bool,
    ops: Vec<Op>,
}

fuzz_target!(|plan: Plan| {
    let config = MotionConfig::default()
        .enter_duration(Duration::from_millis(u64::from(plan.enter_millis)))
        .exit_duration(Duration::from_millis(u64::from(plan.exit_millis)))
        .enter_easing(Easing::Back)
        .respect_reduced_motion(plan.respect_reduced);

    let mut timeline = MotionTimeline::new();
    for op in plan.ops {
        let event = match op {
            Op::StartOpening => timeline.start_opening(),
            Op::StartClosing => timeline.start_closing(),
            Op::Tick { millis } => {
                timeline.tick(Duration::from_millis(u64::from(millis)), &config)
            }
            Op::ForceOpen => {
                timeline.force_open();
                None
            }
            Op::ForceClose => {
                timeline.force_close();
                None
            }
            Op::SetReducedMotion { on } => {
                timeline.set_reduced_motion(on);
                None
            }
        };

        if let Some(event) = event {
            assert_ne!(event.from, event.to, "events must describe a move");
            assert!(
                !matches!(event.to, MotionState::Other(_)),
                "timeline only produces canonical states"
            );
        }

        let progress = timeline.progress();
        assert!(
            (0.0..=1.0).contains(&progress),
            "progress out of range: {progress}"
        );
        let eased = timeline.eased_progress(&config);
        assert!(eased.is_finite(), "eased progress must stay finite");
    }
});
