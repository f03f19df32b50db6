use serde::{Deserialize, Serialize};

/// One declarative step in a game's install or uninstall procedure.
///
/// Discriminated by the `type` field in JSON. Unknown `type` values are a
/// parse error, so adding a variant here forces every `match` over tasks
/// to be extended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Task {
    /// Fetch a remote resource into the game folder.
    Download {
        url: String,
        /// Explicit target filename. When absent the filename is derived
        /// from the URL by the download executor.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        /// Subdirectory of the game folder to download into.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
    },
    /// Unpack an archive that already sits inside the game folder.
    Extract {
        /// Archive path, relative to the game folder.
        source: String,
        /// Subdirectory of the game folder to extract into.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
    },
    /// Execute a program from the game folder.
    Run {
        /// Executable path, relative to the game folder.
        executable: String,
        /// Arguments. The literal `{gameFolder}` is substituted with the
        /// absolute game folder path at execution time.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
    },
}

impl Task {
    /// Short human-readable label for progress reporting and logs.
    pub fn label(&self) -> String {
        match self {
            Task::Download { url, .. } => format!("download {url}"),
            Task::Extract { source, .. } => format!("extract {source}"),
            Task::Run { executable, .. } => format!("run {executable}"),
        }
    }
}
