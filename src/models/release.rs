//! Release record model, one row of the release CSV snapshot.

use serde::Serialize;

/// A single source-control release.
///
/// Every field is optional because an empty or unparsable cell leaves the
/// field absent instead of rejecting the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prerelease: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_weekday: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<i64>,
}

/// How a release is counted in the release-type breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Draft,
    Prerelease,
    Regular,
}

impl ReleaseRecord {
    /// Draft wins over prerelease; an absent flag counts as false.
    pub fn kind(&self) -> ReleaseKind {
        if self.is_draft.unwrap_or(false) {
            ReleaseKind::Draft
        } else if self.is_prerelease.unwrap_or(false) {
            ReleaseKind::Prerelease
        } else {
            ReleaseKind::Regular
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_precedence() {
        let mut record = ReleaseRecord {
            is_draft: Some(true),
            is_prerelease: Some(true),
            ..Default::default()
        };
        assert_eq!(record.kind(), ReleaseKind::Draft);

        record.is_draft = Some(false);
        assert_eq!(record.kind(), ReleaseKind::Prerelease);

        record.is_prerelease = None;
        assert_eq!(record.kind(), ReleaseKind::Regular);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let record = ReleaseRecord {
            repository: Some("stackflow".to_string()),
            day_of_week: Some(3),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["repository"], "stackflow");
        assert_eq!(json["dayOfWeek"], 3);
        assert!(json.get("description").is_none());
    }
}
