//! Build orchestration and coordination.
//!
//! - [`orchestrator`] - [`Orchestrator`] driving SDK builds and merges per umbrella target
//! - [`tool_detection`] - External tool availability checking

mod orchestrator;
pub mod tool_detection;

pub use orchestrator::{BuildReport, Orchestrator};
pub use tool_detection::ensure_toolchain;
