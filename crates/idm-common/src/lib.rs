//! Shared runtime helpers for the IDM services.

pub mod logging;

pub use logging::{init_logging, LogFormat};
