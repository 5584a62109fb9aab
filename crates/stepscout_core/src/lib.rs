//! stepscout_core: Pure step-discovery and matching algorithms used by the
//! StepScout engine and editor boundary.
//! Keep this crate platform-agnostic and free of I/O.

pub mod matching;
pub mod step_catalog;

/// Returns the crate version at compile time (useful for debugging).
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
