//! Logger setup.
//!
//! Everything in this workspace logs through the `log` facade; this module
//! only decides which backend receives those records and how they are filtered.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
