//! Metadata lookup collaborator.

use std::future::Future;
use std::pin::Pin;

use crate::error::LibraryError;

/// Display metadata fetched from an auxiliary lookup service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMetadata {
    pub art_cover: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

/// Abstract auxiliary lookup service (wiki, artwork database, ...).
///
/// Lookups are best-effort: the aggregator logs and swallows individual
/// failures, so implementations should not retry internally.
pub trait MetadataLookup: Send + Sync {
    fn lookup(
        &self,
        title: String,
    ) -> Pin<Box<dyn Future<Output = Result<GameMetadata, LibraryError>> + Send + '_>>;
}

/// Lookup that always returns empty metadata.
///
/// Used when no metadata service is configured; game entries then carry
/// only what their library document provides.
pub struct NoMetadata;

impl MetadataLookup for NoMetadata {
    fn lookup(
        &self,
        _title: String,
    ) -> Pin<Box<dyn Future<Output = Result<GameMetadata, LibraryError>> + Send + '_>> {
        Box::pin(async { Ok(GameMetadata::default()) })
    }
}
