//! Game Logic Module
//!
//! The world, its step function and session recordings. 100% deterministic
//! apart from the file system side of `recording`.
//!
//! ## Module Structure
//!
//! - `input`: Per-frame player input
//! - `state`: World configuration, character, food and obstacles
//! - `tick`: Step function and replay verification
//! - `recording`: Session codec, recording store and failure policy

pub mod input;
pub mod state;
pub mod tick;
pub mod recording;

// Re-export key types
pub use input::PlayerInput;
pub use state::{Character, Food, Intent, World, WorldConfig};
pub use tick::{replay, step, tick, verify_replay, StepOutcome};
pub use recording::{FailurePolicy, Recording, RecordingStore};
