//! Core abstractions for docket.
//!
//! This module provides the clock the timer engine reads wall-clock time from.

mod clock;

pub(crate) use clock::span_ms;
pub use clock::{Clock, ManualClock, SystemClock};
