//! Playtime and session tracking.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{KvStore, StoreError};

const PLAYTIME_KEY: &str = "playtime";

/// Accumulated playtime for one game.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaytimeRecord {
    pub total_seconds: i64,
    pub session_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
}

/// App id → playtime record.
pub type PlaytimeMap = BTreeMap<String, PlaytimeRecord>;

/// Loads the stored playtime map, empty if never written.
pub fn load_playtime(store: &KvStore) -> Result<PlaytimeMap, StoreError> {
    Ok(store.get(PLAYTIME_KEY)?.unwrap_or_default())
}

/// Persists the playtime map.
pub fn save_playtime(store: &KvStore, map: &PlaytimeMap) -> Result<(), StoreError> {
    store.set(PLAYTIME_KEY, map)
}

/// Records one finished play session for `app_id`.
///
/// Sessions with `end < start` (clock adjustments mid-session) count as
/// zero-length but still bump the session count and `last_played`.
pub fn record_session(
    map: &mut PlaytimeMap,
    app_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) {
    let seconds = (end - start).num_seconds().max(0);
    let record = map.entry(app_id.to_string()).or_default();
    record.total_seconds += seconds;
    record.session_count += 1;
    record.last_played = Some(end);
}
