//! Release dashboard endpoints.
//!
//! Each view is recomputed from the shared, immutable dataset on request.

use axum::{extract::State, Json};

use crate::models::{
    CalendarData, ContributorData, DashboardData, DatasetSummary, ReleaseRecord, ReleaseTypeData,
    TimeDistributionData, TimelineData, WeekdayData, WordCloudData,
};
use crate::releases;
use crate::AppState;

/// GET /api/dashboard - All chart views in one object.
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardData> {
    Json(releases::dashboard(&state.releases))
}

/// GET /api/timeline
pub async fn get_timeline(State(state): State<AppState>) -> Json<Vec<TimelineData>> {
    Json(releases::timeline(&state.releases))
}

/// GET /api/calendar
pub async fn get_calendar(State(state): State<AppState>) -> Json<Vec<CalendarData>> {
    Json(releases::calendar(&state.releases))
}

/// GET /api/weekday
pub async fn get_weekday(State(state): State<AppState>) -> Json<Vec<WeekdayData>> {
    Json(releases::weekday(&state.releases))
}

/// GET /api/time-distribution
pub async fn get_time_distribution(
    State(state): State<AppState>,
) -> Json<Vec<TimeDistributionData>> {
    Json(releases::time_distribution(&state.releases))
}

/// GET /api/contributors
pub async fn get_contributors(State(state): State<AppState>) -> Json<Vec<ContributorData>> {
    Json(releases::contributors(&state.releases))
}

/// GET /api/release-types
pub async fn get_release_types(State(state): State<AppState>) -> Json<Vec<ReleaseTypeData>> {
    Json(releases::release_types(&state.releases))
}

/// GET /api/word-cloud
pub async fn get_word_cloud(State(state): State<AppState>) -> Json<Vec<WordCloudData>> {
    Json(releases::word_cloud(&state.releases))
}

/// GET /api/releases - The parsed records as loaded.
pub async fn list_releases(State(state): State<AppState>) -> Json<Vec<ReleaseRecord>> {
    Json(state.releases.records().to_vec())
}

/// GET /api/releases/summary - Record and skipped-row counts.
pub async fn get_release_summary(State(state): State<AppState>) -> Json<DatasetSummary> {
    Json(releases::summary(&state.releases))
}
