//! Time seams shared by the process core and its drivers.
//!
//! The core never reads a clock on its own: elapsed time is pushed into it by
//! a driver holding a [`Clock`], and report timestamps come from a [`WallClock`].
pub mod clock;
pub mod wall;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use wall::{FixedWallClock, SystemWallClock, WallClock};
