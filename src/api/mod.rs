pub mod entities;
pub mod events;
pub mod health;

use crate::db::Repository;
use crate::domain::Address;
use crate::error::AppError;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/factories/:id", get(entities::get_factory))
        .route("/v1/pools/:id", get(entities::get_pool))
        .route("/v1/users/:id", get(entities::get_user))
        .route("/v1/events", get(events::list_events))
        .route("/v1/events/:id", get(events::get_event))
        .layer(cors)
        .with_state(state)
}

fn parse_address_param(name: &str, value: &str) -> Result<Address, AppError> {
    Address::parse(value).map_err(|e| AppError::BadRequest(format!("Invalid {}: {}", name, e)))
}
