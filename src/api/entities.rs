//! Aggregate lookups by address.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::{parse_address_param, AppState};
use crate::domain::{Factory, Pool, User};
use crate::error::AppError;

pub async fn get_factory(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Factory>, AppError> {
    let id = parse_address_param("factory id", &id)?;
    state
        .repo
        .get_factory(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("factory {}", id)))
}

pub async fn get_pool(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Pool>, AppError> {
    let id = parse_address_param("pool id", &id)?;
    state
        .repo
        .get_pool(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("pool {}", id)))
}

pub async fn get_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let id = parse_address_param("user id", &id)?;
    state
        .repo
        .get_user(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
}
