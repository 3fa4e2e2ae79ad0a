use std::sync::Arc;

use apikit::ProblemResponse;
use authn::AuthUser;
use axum::{extract::OriginalUri, response::Json, Extension};
use tracing::{error, info};

use crate::api::rest::dto::{MoodEntryDto, MoodStatsDto, UpsertMoodReq};
use crate::api::rest::error::map_domain_error;
use crate::contract::model::MoodUpsert;
use crate::domain::service::Service;

/// Mood entries from the last 30 days, newest first
#[utoipa::path(
    get,
    path = "/api/moods",
    tag = "moods",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recent entries", body = [MoodEntryDto]),
        (status = 401, description = "Unauthorized", body = apikit::Problem)
    )
)]
pub async fn list_moods(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
) -> Result<Json<Vec<MoodEntryDto>>, ProblemResponse> {
    match svc.list_recent(user.user_id).await {
        Ok(entries) => Ok(Json(entries.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list moods for {}: {}", user.user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Record the mood for a day, replacing that day's entry if there is one
#[utoipa::path(
    post,
    path = "/api/moods",
    tag = "moods",
    security(("bearer_auth" = [])),
    request_body = UpsertMoodReq,
    responses(
        (status = 200, description = "Created or updated entry", body = MoodEntryDto),
        (status = 400, description = "Validation error", body = apikit::Problem),
        (status = 401, description = "Unauthorized", body = apikit::Problem)
    )
)]
pub async fn upsert_mood(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
    Json(req_body): Json<UpsertMoodReq>,
) -> Result<Json<MoodEntryDto>, ProblemResponse> {
    let result = match MoodUpsert::try_from(req_body) {
        Ok(upsert) => svc.upsert(user.user_id, upsert).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(entry) => Ok(Json(entry.into())),
        Err(e) => {
            info!("Mood rejected: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Per-mood totals and per-day counts for the last 30 days
#[utoipa::path(
    get,
    path = "/api/moods/stats",
    tag = "moods",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Mood statistics", body = MoodStatsDto),
        (status = 401, description = "Unauthorized", body = apikit::Problem)
    )
)]
pub async fn mood_stats(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
) -> Result<Json<MoodStatsDto>, ProblemResponse> {
    match svc.stats(user.user_id).await {
        Ok(stats) => Ok(Json(stats.into())),
        Err(e) => {
            error!("Failed to compute mood stats for {}: {}", user.user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
