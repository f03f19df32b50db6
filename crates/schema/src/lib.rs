//! Data model for custom game libraries.
//!
//! A custom library is a user-supplied JSON document describing games
//! outside the supported storefronts. Each game carries two ordered,
//! declarative task lists (install, uninstall) interpreted by the
//! `gamedock-tasks` runner. Types here are immutable descriptions parsed
//! from JSON, never mutated after parsing.

pub mod library;
pub mod task;

pub use library::{CustomLibrary, GameEntry, library_slug, namespaced_app_id};
pub use task::Task;
