use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_address_param, AppState};
use crate::db::RecordFilter;
use crate::domain::{EventId, EventRecord};
use crate::error::AppError;

const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub pool: Option<String>,
    pub user: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

pub async fn get_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<EventRecord>, AppError> {
    let id: EventId = id
        .parse()
        .map_err(|e| AppError::BadRequest(format!("{}", e)))?;

    state
        .repo
        .get_event_record(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("event {}", id)))
}

pub async fn list_events(
    Query(params): Query<EventsQuery>,
    State(state): State<AppState>,
) -> Result<Json<EventsResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let filter = RecordFilter {
        pool: params
            .pool
            .as_deref()
            .map(|p| parse_address_param("pool", p))
            .transpose()?,
        user: params
            .user
            .as_deref()
            .map(|u| parse_address_param("user", u))
            .transpose()?,
        limit,
    };

    let events = state.repo.query_event_records(&filter).await?;
    Ok(Json(EventsResponse {
        count: events.len(),
        events,
    }))
}
