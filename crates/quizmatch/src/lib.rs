//! Result matching for multi-question quiz and personality tests.
//!
//! The [`matching`] module holds the pure engine plus the repository, service and HTTP
//! adapters that feed it. Configuration, telemetry and the top-level error type live beside it.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
