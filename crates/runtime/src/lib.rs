//! Wine invocation and host platform checks.
//!
//! Implements the `WineRunner` collaborator from `gamedock-tasks`:
//! non-native run tasks are handed over here and spawned through the
//! configured wine binary with the right prefix and environment.

pub mod platform;
pub mod wine;

pub use platform::{is_native, is_native_on};
pub use wine::{WineInvoker, WineSettings};
