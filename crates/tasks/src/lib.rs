//! Install task execution for custom library games.
//!
//! A game's install or uninstall procedure is an ordered list of
//! declarative tasks (download, extract, run) from `gamedock-schema`.
//! This crate executes one list strictly sequentially, shelling out to
//! the external tools users already have (`unzip`, `tar`, `7z`, wine)
//! and reporting progress over an `mpsc` channel.

pub mod download;
pub mod error;
pub mod extract;
pub mod progress;
pub mod run;
pub mod runner;

pub use error::TaskError;
pub use progress::{EventSender, InstallEvent, event_channel};
pub use run::{GAME_FOLDER_PLACEHOLDER, WineCommand, WineRunner};
pub use runner::{InstallContext, TaskRunner};
