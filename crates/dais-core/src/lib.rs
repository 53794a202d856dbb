#![forbid(unsafe_code)]

//! Core primitives for dais: event streams, deferred scheduling, cell
//! geometry, and the motion vocabulary shared by overlay hosts and their
//! mounted content.

pub mod emitter;
pub mod geometry;
pub mod motion;
pub mod schedule;

pub use emitter::{Emitter, Subscription};
pub use geometry::{Point, Size};
pub use motion::{
    Easing, MotionConfig, MotionEvent, MotionHook, MotionState, MotionTimeline, PointerSample,
    ZoomOrigin,
};
pub use schedule::{Scheduler, TaskHandle};
