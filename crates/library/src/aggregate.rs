//! Library aggregation: fetch sources, merge, enrich, cache.
//!
//! A linear fetch → merge → enrich pipeline. Source failures are isolated
//! and skipped; the pipeline itself never fails, it just returns whatever
//! it could assemble.

use std::collections::{HashMap, HashSet};

use futures_util::StreamExt;
use gamedock_schema::{CustomLibrary, GameEntry, namespaced_app_id};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{CachedMetadata, MetadataCache};
use crate::error::LibraryError;
use crate::metadata::{GameMetadata, MetadataLookup};
use crate::source::{LibrarySource, SourceFetcher};

/// Default number of in-flight source fetches / metadata lookups.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// One game in the unified, enriched library list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryGame {
    /// Namespaced app identifier (`<library-slug>-<app_name>`).
    pub app_id: String,
    /// Name of the owning library.
    pub library: String,
    pub entry: GameEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// Merges configured library sources into one enriched game list.
pub struct LibraryAggregator {
    concurrency: usize,
}

impl Default for LibraryAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_CONCURRENCY)
    }
}

impl LibraryAggregator {
    /// Creates an aggregator with the given fan-out bound (minimum 1).
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Runs the full pipeline.
    ///
    /// Sources that fail to fetch or parse are logged and skipped.
    /// Libraries are de-duplicated by name, first occurrence wins. Games
    /// whose cache entry matches their upstream version string reuse it;
    /// everything else is enriched through `lookup` (best-effort) and
    /// written back to `cache`. Output order follows source order.
    pub async fn aggregate(
        &self,
        sources: &[LibrarySource],
        fetcher: &dyn SourceFetcher,
        lookup: &dyn MetadataLookup,
        cache: &mut MetadataCache,
    ) -> Vec<LibraryGame> {
        let fetched: Vec<Option<CustomLibrary>> =
            futures_util::stream::iter(sources.iter().cloned().enumerate())
                .map(|(index, source)| async move {
                    match load_source(source, fetcher).await {
                        Ok(library) => {
                            debug!(index, name = %library.name, games = library.games.len(), "loaded library source");
                            Some(library)
                        }
                        Err(e) => {
                            warn!(index, error = %e, "skipping library source");
                            None
                        }
                    }
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut seen = HashSet::new();
        let mut libraries = Vec::new();
        for library in fetched.into_iter().flatten() {
            if seen.insert(library.name.clone()) {
                libraries.push(library);
            } else {
                warn!(name = %library.name, "duplicate library name, keeping first");
            }
        }

        self.enrich(libraries, lookup, cache).await
    }

    async fn enrich(
        &self,
        libraries: Vec<CustomLibrary>,
        lookup: &dyn MetadataLookup,
        cache: &mut MetadataCache,
    ) -> Vec<LibraryGame> {
        struct Slot {
            library: String,
            entry: GameEntry,
            app_id: String,
            cached: Option<CachedMetadata>,
        }

        let mut slots = Vec::new();
        for library in libraries {
            for entry in library.games {
                let app_id = namespaced_app_id(&library.name, &entry.app_name);
                let cached = cache.get_fresh(&app_id, entry.version.as_deref()).cloned();
                slots.push(Slot {
                    library: library.name.clone(),
                    entry,
                    app_id,
                    cached,
                });
            }
        }

        // Remote lookups only for games that are stale in the cache and
        // whose entry does not already carry complete metadata.
        let pending: Vec<(usize, String)> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.cached.is_none() && !has_full_metadata(&slot.entry))
            .map(|(i, slot)| (i, slot.entry.title.clone()))
            .collect();

        let looked_up: Vec<(usize, GameMetadata)> = futures_util::stream::iter(pending)
            .map(|(i, title)| async move {
                let metadata = match lookup.lookup(title.clone()).await {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(title, error = %e, "metadata lookup failed");
                        GameMetadata::default()
                    }
                };
                (i, metadata)
            })
            .buffered(self.concurrency)
            .collect()
            .await;
        let mut looked_up: HashMap<usize, GameMetadata> = looked_up.into_iter().collect();

        let mut games = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            let metadata = match slot.cached {
                Some(cached) => cached,
                None => {
                    let remote = looked_up.remove(&i).unwrap_or_default();
                    let merged = CachedMetadata {
                        version: slot.entry.version.clone(),
                        art_cover: slot.entry.art_cover.clone().or(remote.art_cover),
                        description: slot.entry.description.clone().or(remote.description),
                        genre: slot.entry.genre.clone().or(remote.genre),
                    };
                    cache.insert(slot.app_id.clone(), merged.clone());
                    merged
                }
            };

            games.push(LibraryGame {
                app_id: slot.app_id,
                library: slot.library,
                art_cover: metadata.art_cover,
                description: metadata.description,
                genre: metadata.genre,
                entry: slot.entry,
            });
        }
        games
    }
}

fn has_full_metadata(entry: &GameEntry) -> bool {
    entry.art_cover.is_some() && entry.description.is_some() && entry.genre.is_some()
}

async fn load_source(
    source: LibrarySource,
    fetcher: &dyn SourceFetcher,
) -> Result<CustomLibrary, LibraryError> {
    let text = match source {
        LibrarySource::Url(url) => fetcher.fetch(url).await?,
        LibrarySource::Inline(json) => json,
    };
    Ok(CustomLibrary::parse(&text)?)
}
