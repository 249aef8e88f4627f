//! Line-oriented parser for the release CSV snapshot.
//!
//! Fields are split on a bare comma. Quoting is not supported, so a value that
//! itself contains a comma shifts the column count and the row is dropped.

use super::ReleaseDataset;
use crate::models::ReleaseRecord;

const DELIMITER: char = ',';

/// Known header names. Columns with any other name are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Repository,
    ReleaseId,
    TagName,
    ReleaseName,
    PublishedAt,
    CreatedAt,
    AuthorUsername,
    IsDraft,
    IsPrerelease,
    Description,
    ReleaseUrl,
    IsWeekday,
    Year,
    Month,
    Week,
    DayOfWeek,
    Unknown,
}

impl Column {
    fn from_header(name: &str) -> Self {
        match name {
            "Repository" => Column::Repository,
            "Release ID" => Column::ReleaseId,
            "Tag Name" => Column::TagName,
            "Release Name" => Column::ReleaseName,
            "Published At" => Column::PublishedAt,
            "Created At" => Column::CreatedAt,
            "Author Username" => Column::AuthorUsername,
            "Is Draft" => Column::IsDraft,
            "Is Prerelease" => Column::IsPrerelease,
            "Description" => Column::Description,
            "Release URL" => Column::ReleaseUrl,
            "Is Weekday" => Column::IsWeekday,
            "Year" => Column::Year,
            "Month" => Column::Month,
            "Week" => Column::Week,
            "Day of Week" => Column::DayOfWeek,
            _ => Column::Unknown,
        }
    }
}

/// Parse raw snapshot text into a dataset.
///
/// The first non-empty line is the header. A data line whose field count
/// differs from the header's is skipped and counted, never reported as an error.
pub fn parse(text: &str) -> ReleaseDataset {
    let mut lines = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let Some(header_line) = lines.next() else {
        return ReleaseDataset::default();
    };

    let columns: Vec<Column> = header_line
        .split(DELIMITER)
        .map(|name| Column::from_header(name.trim()))
        .collect();

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for line in lines {
        let values: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
        if values.len() != columns.len() {
            tracing::debug!(
                expected = columns.len(),
                got = values.len(),
                "Skipping release row: {}",
                line
            );
            skipped_rows += 1;
            continue;
        }

        let mut record = ReleaseRecord::default();
        for (column, value) in columns.iter().zip(values) {
            set_field(&mut record, *column, value);
        }
        records.push(record);
    }

    ReleaseDataset::new(records, skipped_rows)
}

fn set_field(record: &mut ReleaseRecord, column: Column, value: &str) {
    if value.is_empty() || value == "null" {
        return;
    }

    let text = || Some(value.to_string());

    match column {
        Column::Repository => record.repository = text(),
        Column::ReleaseId => record.release_id = value.parse().ok(),
        Column::TagName => record.tag_name = text(),
        Column::ReleaseName => record.release_name = text(),
        Column::PublishedAt => record.published_at = text(),
        Column::CreatedAt => record.created_at = text(),
        Column::AuthorUsername => record.author_username = text(),
        Column::IsDraft => record.is_draft = parse_bool(value),
        Column::IsPrerelease => record.is_prerelease = parse_bool(value),
        Column::Description => record.description = text(),
        Column::ReleaseUrl => record.release_url = text(),
        Column::IsWeekday => record.is_weekday = parse_bool(value),
        Column::Year => record.year = text(),
        Column::Month => record.month = text(),
        Column::Week => record.week = text(),
        Column::DayOfWeek => record.day_of_week = value.parse().ok(),
        Column::Unknown => {}
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
