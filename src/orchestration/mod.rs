//! Host side of the indexer: watch list and the ingest loop.

pub mod indexer;
pub mod watch;

pub use indexer::{Indexer, IndexerError, IndexerReport};
pub use watch::WatchList;
