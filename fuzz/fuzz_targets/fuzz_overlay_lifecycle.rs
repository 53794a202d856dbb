#![no_main]

//! Feeds the overlay host arbitrary interleavings of attaches, exits,
//! transition events, scheduler turns, and focus churn, checking the
//! host never panics and its slot/phase bookkeeping stays coherent.

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use dais_a11y::{FocusNode, FocusRegistry, FocusSurface, NodeId};
use dais_core::emitter::Emitter;
use dais_core::motion::{MotionEvent, MotionState};
use dais_core::Scheduler;
use dais_overlay::{ComponentPortal, FocusPhase, OverlayConfig, OverlayContainer, OverlayContent};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Attach,
    Exit,
    SetConfig { auto_focus: bool },
    StartEnter,
    FinishEnter,
    StartLeave,
    FinishLeave,
    CustomStart { name_seed: u8 },
    CustomDone { name_seed: u8 },
    RunScheduler,
    FocusNode { which: u8 },
    RemoveNode { which: u8 },
    InsertNode { which: u8 },
}

const HOST: NodeId = NodeId::new(1000);

struct NullContent {
    events: Emitter<MotionEvent>,
}

impl OverlayContent for NullContent {
    fn events(&self) -> Emitter<MotionEvent> {
        self.events.clone()
    }

    fn request_exit(&mut self) {}
}

fn node(which: u8) -> NodeId {
    NodeId::new(u64::from(which % 8))
}

fn custom(seed: u8) -> MotionState {
    MotionState::Other(format!("state-{}", seed % 4))
}

fuzz_target!(|ops: Vec<Op>| {
    let registry = FocusRegistry::new();
    registry.insert(FocusNode::new(HOST));
    let scheduler = Scheduler::new();
    let container = OverlayContainer::new(
        HOST,
        Rc::new(registry.clone()),
        Rc::new(registry.clone()),
        scheduler.clone(),
    );

    let outbound = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&outbound);
    let _sub = container
        .animation_state_changed()
        .subscribe(move |_: &MotionEvent| sink.set(sink.get() + 1));

    let mut fed = 0usize;
    for op in ops {
        match op {
            Op::Attach => {
                let _ = container.attach_component_portal(ComponentPortal::new(|| {
                    Box::new(NullContent {
                        events: Emitter::new(),
                    })
                }));
            }
            Op::Exit => {
                let _ = container.start_exit_animation();
            }
            Op::SetConfig { auto_focus } => {
                container.set_config(OverlayConfig::generated().auto_focus(auto_focus));
            }
            Op::StartEnter => {
                container.on_animation_start(MotionEvent::opening());
                fed += 1;
            }
            Op::FinishEnter => {
                container.on_animation_done(MotionEvent::opened());
                fed += 1;
            }
            Op::StartLeave => {
                container.on_animation_start(MotionEvent::closing());
                fed += 1;
            }
            Op::FinishLeave => {
                container.on_animation_done(MotionEvent::closed());
                fed += 1;
            }
            Op::CustomStart { name_seed } => {
                container
                    .on_animation_start(MotionEvent::start(MotionState::Open, custom(name_seed)));
                fed += 1;
            }
            Op::CustomDone { name_seed } => {
                container
                    .on_animation_done(MotionEvent::done(MotionState::Open, custom(name_seed)));
                fed += 1;
            }
            Op::RunScheduler => {
                scheduler.run_pending();
            }
            Op::FocusNode { which } => {
                let _ = registry.focus(node(which));
            }
            Op::RemoveNode { which } => {
                registry.remove(node(which));
            }
            Op::InsertNode { which } => {
                registry.insert(FocusNode::new(node(which)));
            }
        }

        assert_eq!(
            container.has_attached(),
            container.focus_phase() != FocusPhase::Idle,
            "slot and focus phase must agree"
        );
        assert!(registry.trap_depth() <= 1, "at most one live trap");
        assert_eq!(outbound.get(), fed, "every event mirrored outbound");
    }
});
