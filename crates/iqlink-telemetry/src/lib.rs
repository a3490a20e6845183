//! Structured logging for the iqlink feed bridge.
//!
//! Every observable signal in the bridge is a `tracing` event; this
//! crate owns subscriber initialization.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
