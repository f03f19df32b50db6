//! Wine command construction and spawning.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use gamedock_tasks::{TaskError, WineCommand, WineRunner};
use tokio::process::Command;
use tracing::debug;

/// How to reach wine on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WineSettings {
    /// Wine binary, resolved through `PATH` when not absolute.
    pub binary: PathBuf,
    /// `WINEPREFIX` to run under; wine's default prefix when absent.
    pub prefix: Option<PathBuf>,
    /// Extra environment variables (e.g. `WINEDEBUG`, DXVK switches).
    pub env: Vec<(String, String)>,
}

impl Default for WineSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("wine"),
            prefix: None,
            env: Vec::new(),
        }
    }
}

/// Spawns executables through wine. Implements the tasks crate's
/// [`WineRunner`] collaborator.
pub struct WineInvoker {
    settings: WineSettings,
}

impl WineInvoker {
    pub fn new(settings: WineSettings) -> Self {
        Self { settings }
    }
}

impl WineRunner for WineInvoker {
    fn run_wine(
        &self,
        command: WineCommand,
    ) -> Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + '_>> {
        Box::pin(async move {
            debug!(
                wine = %self.settings.binary.display(),
                exe = %command.executable.display(),
                "spawning through wine"
            );

            let mut process = Command::new(&self.settings.binary);
            process
                .arg(&command.executable)
                .args(&command.args)
                .current_dir(&command.game_folder);
            if let Some(prefix) = &self.settings.prefix {
                process.env("WINEPREFIX", prefix);
            }
            for (key, value) in &self.settings.env {
                process.env(key, value);
            }

            let output = process.output().await.map_err(|e| TaskError::Spawn {
                program: self.settings.binary.to_string_lossy().into_owned(),
                source: e,
            })?;

            if !output.status.success() {
                return Err(TaskError::ProcessFailed {
                    program: self.settings.binary.to_string_lossy().into_owned(),
                    code: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            Ok(())
        })
    }
}
