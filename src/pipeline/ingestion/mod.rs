// Pipeline ingestion: metadata feed, existing dataset and request pacing

pub mod existing;
pub mod metadata;
pub mod rate_limiter;

pub use existing::{ExistingStationSet, ExistingStationSource};
pub use metadata::MetadataFetcher;
