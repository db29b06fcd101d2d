//! docket - a work timer for legal case management
//!
//! One timer runs at a time against a task. Running time, excluding pauses,
//! is saved as a time entry when the timer stops. Long sessions are warned
//! about at 5 hours and stopped automatically at 6.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod features;
pub mod notify;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::DocketError;
pub use features::timer::{TimerEngine, TimerService, TimerSnapshot, TimerState};
