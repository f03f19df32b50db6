//! Custom library aggregation.
//!
//! Reads the configured library sources (remote URLs, inline JSON),
//! merges them into a unified game list, enriches entries with display
//! metadata from an auxiliary lookup service and caches the results in an
//! explicit, caller-owned [`MetadataCache`].

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod metadata;
pub mod source;

pub use aggregate::{DEFAULT_FETCH_CONCURRENCY, LibraryAggregator, LibraryGame};
pub use cache::{CachedMetadata, MetadataCache};
pub use error::LibraryError;
pub use metadata::{GameMetadata, MetadataLookup, NoMetadata};
pub use source::{HttpFetcher, LibrarySource, SourceFetcher};
