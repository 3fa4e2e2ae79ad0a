use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::list_moods, handlers::upsert_mood, handlers::mood_stats),
    components(schemas(
        dto::MoodDto,
        dto::SymptomDto,
        dto::UpsertMoodReq,
        dto::MoodEntryDto,
        dto::OverallStatDto,
        dto::MonthlyKeyDto,
        dto::MonthlyStatDto,
        dto::MoodStatsDto,
        apikit::Problem,
        apikit::ValidationError,
    )),
    tags((name = "moods", description = "Daily mood entries and statistics"))
)]
pub struct MoodsApi;
