//! Event projection engine.
//!
//! - `resolver` - get-or-create for Factory, Pool, and User aggregates
//! - `projector` - per-event handlers producing aggregate writes, one record,
//!   and registration intents

pub mod projector;
pub mod resolver;

pub use projector::{Projection, ProjectionError, Projector};
pub use resolver::{get_or_create_factory, get_or_create_pool, get_or_create_user};
