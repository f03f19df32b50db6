//! Download task executor.
//!
//! Resolves a target filename from the task description or the URL shape,
//! then streams the remote resource to disk while reporting progress.
//! Transfer failures are surfaced to the caller, never retried; a partial
//! file left by a failed transfer is removed.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::TaskError;
use crate::progress::{EventSender, InstallEvent};

/// Emit a progress event at most once per this many bytes.
const PROGRESS_STEP: u64 = 256 * 1024;

/// Resolves the filename a download task should write to.
///
/// Order: explicit `filename` from the task, else the last path segment of
/// the URL. Redirect-style endpoints (a `.php` path segment with a `url`
/// query parameter) resolve to the basename of the parameter target
/// instead of the script name.
pub fn resolve_filename(url: &str, explicit: Option<&str>) -> Result<String, TaskError> {
    if let Some(name) = explicit
        && !name.is_empty()
    {
        return Ok(name.to_string());
    }

    let segment = last_path_segment(url);

    if segment.to_ascii_lowercase().ends_with(".php")
        && let Some(target) = query_param(url, "url")
    {
        let decoded = percent_decode(&target);
        let base = last_path_segment(&decoded);
        if !base.is_empty() {
            return Ok(base.to_string());
        }
    }

    if !segment.is_empty() {
        return Ok(segment.to_string());
    }

    Err(TaskError::NoFilename(url.to_string()))
}

/// Joins the game folder, the optional destination subdirectory and the
/// resolved filename into the final download path.
pub fn resolve_download_path(
    game_folder: &Path,
    destination: Option<&str>,
    filename: &str,
) -> PathBuf {
    match destination {
        Some(dir) if !dir.is_empty() => game_folder.join(dir).join(filename),
        _ => game_folder.join(filename),
    }
}

/// Executes a download task against a game folder.
///
/// Returns the path the resource was written to.
pub async fn run_download_task(
    client: &reqwest::Client,
    game_folder: &Path,
    url: &str,
    filename: Option<&str>,
    destination: Option<&str>,
    app_id: &str,
    events: &EventSender,
) -> Result<PathBuf, TaskError> {
    let name = resolve_filename(url, filename)?;
    let dest = resolve_download_path(game_folder, destination, &name);
    debug!(url, dest = %dest.display(), "starting download");
    download_file(client, url, &dest, app_id, events).await?;
    Ok(dest)
}

/// Streams `url` to `dest`, emitting [`InstallEvent::DownloadProgress`].
///
/// A failed transfer removes the partial file before returning the error.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    app_id: &str,
    events: &EventSender,
) -> Result<(), TaskError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TaskError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(TaskError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    match stream_body(response, url, dest, app_id, events).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = tokio::fs::remove_file(dest).await;
            Err(e)
        }
    }
}

async fn stream_body(
    response: reqwest::Response,
    url: &str,
    dest: &Path,
    app_id: &str,
    events: &EventSender,
) -> Result<(), TaskError> {
    let total = response.content_length();
    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut bytes: u64 = 0;
    let mut last_emit: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| TaskError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        file.write_all(&chunk).await?;
        bytes += chunk.len() as u64;

        if bytes - last_emit >= PROGRESS_STEP {
            last_emit = bytes;
            send_progress(events, app_id, bytes, total).await;
        }
    }
    file.flush().await?;

    // Transfers shorter than the advertised length are an error, not a
    // silently truncated file.
    if let Some(expected) = total
        && bytes != expected
    {
        return Err(TaskError::Download {
            url: url.to_string(),
            reason: format!("transfer truncated at {bytes} of {expected} bytes"),
        });
    }

    send_progress(events, app_id, bytes, total).await;
    Ok(())
}

async fn send_progress(events: &EventSender, app_id: &str, bytes: u64, total: Option<u64>) {
    let percent = total
        .filter(|t| *t > 0)
        .map(|t| (bytes as f64 / t as f64) * 100.0);
    let _ = events
        .send(InstallEvent::DownloadProgress {
            app_id: app_id.to_string(),
            bytes,
            total,
            percent,
        })
        .await;
}

/// Returns the last path segment of a URL, without query or fragment.
fn last_path_segment(url: &str) -> &str {
    let trimmed = url.split(['?', '#']).next().unwrap_or("");
    let after_scheme = match trimmed.find("://") {
        Some(i) => &trimmed[i + 3..],
        None => trimmed,
    };
    match after_scheme.find('/') {
        Some(i) => after_scheme[i..].rsplit('/').next().unwrap_or(""),
        // Bare host, no path.
        None => "",
    }
}

/// Returns the raw value of a query parameter, if present.
fn query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or("");
    for pair in query.split('&') {
        let Some((k, v)) = pair.split_once('=') else {
            continue;
        };
        if k == key {
            return Some(v.to_string());
        }
    }
    None
}

/// Decodes `%XX` escapes; invalid escapes pass through untouched.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2]))
        {
            out.push(hi * 16 + lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
