//! Configuration management for docket.
//!
//! Settings and data live in `~/.docket/`, or in `$DOCKET_HOME` when set.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, GeneralConfig, NotificationConfig, TimerConfig};
