//! Time subsystem.
//!
//! Frame timing utilities that do not depend on the runtime.
//! One `FrameClock` per render loop; call `tick()` once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
