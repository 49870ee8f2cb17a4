//! Play/pause timing loop around the grid engine.
//!
//! The simulator never sleeps or spawns threads itself: a host event loop
//! owns the passage of time through a [`Clock`] and calls
//! [`Simulator::pump`] whenever timers may have come due.

pub mod clock;
pub mod fps;
pub mod render;
pub mod simulator;

pub use clock::{Clock, Firing, ManualClock, SystemClock, TimerHandle, TimerQueue};
pub use fps::FpsEstimator;
pub use render::{PixelBuffer, RenderSink, TextSink};
pub use simulator::{Simulator, SimulatorState};
