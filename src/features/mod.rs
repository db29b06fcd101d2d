//! Feature implementations for docket.

pub mod shell;
pub mod timer;
