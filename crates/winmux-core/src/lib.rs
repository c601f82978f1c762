#![forbid(unsafe_code)]

//! Core: geometry, the event taxonomy, and the ordered event queue.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod queue;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
