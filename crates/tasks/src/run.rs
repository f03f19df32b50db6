//! Run task executor.
//!
//! Launches a game-folder executable either natively or through a wine
//! runner supplied by the embedding application. Waits for completion;
//! no retry, no timeout.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::process::Command;
use tracing::debug;

use crate::error::TaskError;

/// Placeholder substituted with the absolute game folder path in task args.
pub const GAME_FOLDER_PLACEHOLDER: &str = "{gameFolder}";

/// A fully resolved request to run an executable under wine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WineCommand {
    /// Absolute path to the executable inside the game folder.
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub game_folder: PathBuf,
}

/// Wine invocation collaborator.
///
/// The embedding application decides which wine binary, prefix and
/// environment to use; the task layer only hands over the resolved
/// command. Same shape as the other collaborator traits: a boxed future
/// so implementations stay object-safe.
pub trait WineRunner: Send + Sync {
    fn run_wine(
        &self,
        command: WineCommand,
    ) -> Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + '_>>;
}

/// Replaces [`GAME_FOLDER_PLACEHOLDER`] in each argument.
pub fn substitute_game_folder(args: &[String], game_folder: &Path) -> Vec<String> {
    let folder = game_folder.to_string_lossy();
    args.iter()
        .map(|a| a.replace(GAME_FOLDER_PLACEHOLDER, &folder))
        .collect()
}

/// Executes a run task against a game folder.
///
/// Native platforms spawn the executable directly with the game folder as
/// working directory; everything else goes through the [`WineRunner`] and
/// a native spawn never occurs.
pub async fn run_executable_task(
    game_folder: &Path,
    executable: &str,
    args: &[String],
    native: bool,
    wine: &dyn WineRunner,
) -> Result<(), TaskError> {
    let exe = game_folder.join(executable);
    if !exe.is_file() {
        return Err(TaskError::ExecutableMissing(
            exe.to_string_lossy().into_owned(),
        ));
    }

    let args = substitute_game_folder(args, game_folder);

    if !native {
        debug!(exe = %exe.display(), "running through wine");
        return wine
            .run_wine(WineCommand {
                executable: exe,
                args,
                game_folder: game_folder.to_path_buf(),
            })
            .await;
    }

    debug!(exe = %exe.display(), "running natively");
    let output = Command::new(&exe)
        .args(&args)
        .current_dir(game_folder)
        .output()
        .await
        .map_err(|e| TaskError::Spawn {
            program: exe.to_string_lossy().into_owned(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(TaskError::ProcessFailed {
            program: exe.to_string_lossy().into_owned(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
