pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod store;

pub use config::Config;
pub use datasource::{EventSource, JsonlEventSource, MockEventSource, SourceError};
pub use db::{init_db, Repository};
pub use domain::{
    Address, Amount, EventId, EventKind, EventRecord, Factory, LendingEvent, Pool, RawEvent,
    RecordDetail, TxHash, User,
};
pub use engine::{Projection, ProjectionError, Projector};
pub use error::AppError;
pub use orchestration::{Indexer, IndexerReport, WatchList};
pub use store::{Changeset, EntityStore, IndexerState, MemoryStore, StoreError};
