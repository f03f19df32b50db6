//! Extract task executor.
//!
//! Delegates archive unpacking to the external programs users already
//! have (`unzip`, `tar`, `7z`), selected by file extension. On success the
//! source archive is deleted; a failed extraction leaves whatever the
//! external program already wrote (no rollback).

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::error::TaskError;

/// External program invocation for one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

/// Selects the extraction program and argument list for an archive.
///
/// Multi-part extensions are matched before their prefixes, so
/// `a.tar.gz` resolves to `tar -xzf`, not plain `tar -xf`.
pub fn extraction_command(source: &Path, dest: &Path) -> Result<ExtractCommand, TaskError> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let src = source.to_string_lossy().into_owned();
    let dest_str = dest.to_string_lossy().into_owned();

    let command = if name.ends_with(".zip") {
        ExtractCommand {
            program: "unzip",
            args: vec!["-o".into(), src, "-d".into(), dest_str],
        }
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        tar_command("-xzf", src, dest_str)
    } else if name.ends_with(".tar.bz2") {
        tar_command("-xjf", src, dest_str)
    } else if name.ends_with(".tar.xz") {
        tar_command("-xJf", src, dest_str)
    } else if name.ends_with(".tar") {
        tar_command("-xf", src, dest_str)
    } else if name.ends_with(".7z") {
        ExtractCommand {
            program: "7z",
            args: vec!["x".into(), src, format!("-o{dest_str}"), "-y".into()],
        }
    } else {
        return Err(TaskError::UnsupportedArchive(
            source.to_string_lossy().into_owned(),
        ));
    };

    Ok(command)
}

fn tar_command(flags: &str, src: String, dest: String) -> ExtractCommand {
    ExtractCommand {
        program: "tar",
        args: vec![flags.into(), src, "-C".into(), dest],
    }
}

/// Executes an extract task against a game folder.
///
/// `source` is resolved relative to the game folder and must exist before
/// any process is spawned. Returns the destination directory.
pub async fn run_extract_task(
    game_folder: &Path,
    source: &str,
    destination: Option<&str>,
) -> Result<PathBuf, TaskError> {
    let src = game_folder.join(source);
    if !src.is_file() {
        return Err(TaskError::SourceMissing(src.to_string_lossy().into_owned()));
    }

    let dest = match destination {
        Some(dir) if !dir.is_empty() => game_folder.join(dir),
        _ => game_folder.to_path_buf(),
    };
    tokio::fs::create_dir_all(&dest).await?;

    let command = extraction_command(&src, &dest)?;
    debug!(program = command.program, src = %src.display(), "extracting archive");

    let output = Command::new(command.program)
        .args(&command.args)
        .output()
        .await
        .map_err(|e| TaskError::Spawn {
            program: command.program.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(TaskError::ProcessFailed {
            program: command.program.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tokio::fs::remove_file(&src).await?;
    Ok(dest)
}
