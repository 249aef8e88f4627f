//! Chart aggregations over a loaded [`ReleaseDataset`].
//!
//! Each view is a pure function of the dataset. Where two keys have the same
//! count, the key seen first in the dataset comes first.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};

use super::ReleaseDataset;
use crate::models::{
    CalendarData, ContributorData, DashboardData, DatasetSummary, ReleaseKind, ReleaseTypeData,
    TimeDistributionData, TimelineData, WeekdayData, WordCloudData,
};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Format of `Published At` used for the hour-of-day view.
const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Offset-less timestamp shapes accepted for the calendar view.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const TOP_CONTRIBUTORS: usize = 5;
const OTHERS_LABEL: &str = "Others";
const TOP_WORDS: usize = 50;
const MIN_WORD_LEN: usize = 3;

const STOP_WORDS: &[&str] = &[
    // common English function words
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me",
    // release-note boilerplate
    "fix", "fixed", "bug", "issue", "update", "updated", "change", "changed", "add", "added",
    "remove", "removed", "improve", "improved", "enhancement", "feature", "version", "release",
    "changelog", "readme", "documentation", "implement", "implemented", "support", "supported",
];

/// Releases per month, ascending by month. Months without releases are omitted.
pub fn timeline(dataset: &ReleaseDataset) -> Vec<TimelineData> {
    let mut months: BTreeMap<&str, u64> = BTreeMap::new();
    for month in dataset.records().iter().filter_map(|r| r.month.as_deref()) {
        *months.entry(month).or_default() += 1;
    }

    months
        .into_iter()
        .map(|(month, count)| TimelineData {
            month: month.to_string(),
            count,
        })
        .collect()
}

/// Releases per UTC calendar day, ascending by day.
pub fn calendar(dataset: &ReleaseDataset) -> Vec<CalendarData> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for published in dataset
        .records()
        .iter()
        .filter_map(|r| r.published_at.as_deref())
    {
        match published_day(published) {
            Some(day) => *days.entry(day).or_default() += 1,
            None => tracing::debug!("Skipping unparsable publish date: {}", published),
        }
    }

    days.into_iter()
        .map(|(day, value)| CalendarData {
            day: day.format("%Y-%m-%d").to_string(),
            value,
        })
        .collect()
}

/// Releases per ISO weekday, always seven rows from Monday to Sunday.
pub fn weekday(dataset: &ReleaseDataset) -> Vec<WeekdayData> {
    let mut counts = [0u64; 7];
    for day in dataset.records().iter().filter_map(|r| r.day_of_week) {
        if (1..=7).contains(&day) {
            counts[(day - 1) as usize] += 1;
        }
    }

    WEEKDAYS
        .iter()
        .zip(counts)
        .map(|(name, count)| WeekdayData {
            name: name.to_string(),
            count,
        })
        .collect()
}

/// Releases per UTC hour of day, always 24 rows from `0:00` to `23:00`.
pub fn time_distribution(dataset: &ReleaseDataset) -> Vec<TimeDistributionData> {
    let mut counts = [0u64; 24];
    for published in dataset
        .records()
        .iter()
        .filter_map(|r| r.published_at.as_deref())
    {
        if let Ok(at) = NaiveDateTime::parse_from_str(published, PUBLISHED_AT_FORMAT) {
            counts[at.hour() as usize] += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(hour, count)| TimeDistributionData {
            hour: format!("{}:00", hour),
            count,
        })
        .collect()
}

/// Releases per author, descending. Beyond the top five, the remaining
/// authors are folded into a single "Others" entry.
pub fn contributors(dataset: &ReleaseDataset) -> Vec<ContributorData> {
    let mut ranked = tally(
        dataset
            .records()
            .iter()
            .filter_map(|r| r.author_username.as_deref()),
    );
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let others: u64 = ranked.iter().skip(TOP_CONTRIBUTORS).map(|(_, n)| n).sum();
    ranked.truncate(TOP_CONTRIBUTORS);

    let mut data: Vec<ContributorData> = ranked
        .into_iter()
        .map(|(name, value)| ContributorData {
            name: name.to_string(),
            value,
        })
        .collect();

    if others > 0 {
        data.push(ContributorData {
            name: OTHERS_LABEL.to_string(),
            value: others,
        });
    }

    data
}

/// Draft, prerelease and regular counts per repository, in first-seen order.
pub fn release_types(dataset: &ReleaseDataset) -> Vec<ReleaseTypeData> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut data: Vec<ReleaseTypeData> = Vec::new();

    for record in dataset.records() {
        let Some(repository) = record.repository.as_deref() else {
            continue;
        };

        let slot = *index.entry(repository).or_insert_with(|| {
            data.push(ReleaseTypeData {
                repository: repository.to_string(),
                regular: 0,
                prerelease: 0,
                draft: 0,
            });
            data.len() - 1
        });

        let entry = &mut data[slot];
        match record.kind() {
            ReleaseKind::Draft => entry.draft += 1,
            ReleaseKind::Prerelease => entry.prerelease += 1,
            ReleaseKind::Regular => entry.regular += 1,
        }
    }

    data
}

/// The 50 most frequent meaningful words across release descriptions.
pub fn word_cloud(dataset: &ReleaseDataset) -> Vec<WordCloudData> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();

    let lowered: Vec<String> = dataset
        .records()
        .iter()
        .filter_map(|r| r.description.as_deref())
        .map(str::to_lowercase)
        .collect();

    let words = lowered
        .iter()
        .flat_map(|text| text.split(|c: char| !c.is_ascii_lowercase()))
        .filter(|word| {
            word.len() >= MIN_WORD_LEN
                && !word.bytes().all(|b| b.is_ascii_digit())
                && !stop_words.contains(word)
        });

    let mut ranked = tally(words);
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_WORDS);

    ranked
        .into_iter()
        .map(|(text, value)| WordCloudData {
            text: text.to_string(),
            value,
        })
        .collect()
}

/// Compute every chart view against the same dataset.
pub fn dashboard(dataset: &ReleaseDataset) -> DashboardData {
    DashboardData {
        timeline: timeline(dataset),
        calendar: calendar(dataset),
        weekday: weekday(dataset),
        time_distribution: time_distribution(dataset),
        contributors: contributors(dataset),
        release_types: release_types(dataset),
        word_cloud: word_cloud(dataset),
    }
}

/// Record counts and publish range of the loaded snapshot.
pub fn summary(dataset: &ReleaseDataset) -> DatasetSummary {
    let repositories = tally(
        dataset
            .records()
            .iter()
            .filter_map(|r| r.repository.as_deref()),
    )
    .into_iter()
    .map(|(repository, _)| repository.to_string())
    .collect();

    let published: Vec<DateTime<Utc>> = dataset
        .records()
        .iter()
        .filter_map(|r| r.published_at.as_deref())
        .filter_map(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|at| at.with_timezone(&Utc))
        .collect();

    let format = |at: &DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Secs, true);

    DatasetSummary {
        records: dataset.len(),
        skipped_rows: dataset.skipped_rows(),
        repositories,
        first_published: published.iter().min().map(format),
        last_published: published.iter().max().map(format),
    }
}

/// Count occurrences, keeping keys in first-seen order.
fn tally<K: Hash + Eq + Copy>(keys: impl IntoIterator<Item = K>) -> Vec<(K, u64)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, u64)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts
}

/// UTC date of an ISO-8601 timestamp, or of a bare `YYYY-MM-DD` date.
/// Timestamps without an offset are read as UTC.
fn published_day(value: &str) -> Option<NaiveDate> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc).date_naive());
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|at| at.date())
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}
