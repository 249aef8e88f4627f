//! Chart-ready aggregate views served to the dashboard.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineData {
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarData {
    pub day: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayData {
    pub name: String,
    pub count: u64,
}

/// Releases published in one UTC hour; `hour` is formatted as `"H:00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeDistributionData {
    pub hour: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorData {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseTypeData {
    pub repository: String,
    pub regular: u64,
    pub prerelease: u64,
    pub draft: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCloudData {
    pub text: String,
    pub value: u64,
}

/// All seven views computed against the same dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub timeline: Vec<TimelineData>,
    pub calendar: Vec<CalendarData>,
    pub weekday: Vec<WeekdayData>,
    pub time_distribution: Vec<TimeDistributionData>,
    pub contributors: Vec<ContributorData>,
    pub release_types: Vec<ReleaseTypeData>,
    pub word_cloud: Vec<WordCloudData>,
}

/// Data-quality metrics for the loaded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub records: usize,
    pub skipped_rows: usize,
    pub repositories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_published: Option<String>,
}
